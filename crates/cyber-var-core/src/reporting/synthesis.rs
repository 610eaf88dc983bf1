//! Result synthesis: breach classification, ranked risk drivers, and
//! the executive narrative.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fraction of the risk appetite limit at which a warning is raised.
const WARNING_FRACTION: f64 = 0.8;

/// Classification of VaR95 against the configured risk appetite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BreachStatus {
    Safe,
    Warning,
    Breach,
}

impl fmt::Display for BreachStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BreachStatus::Safe => "SAFE",
            BreachStatus::Warning => "WARNING",
            BreachStatus::Breach => "BREACH",
        };
        f.write_str(s)
    }
}

/// Kind of driver surfaced in the ranked list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriverKind {
    Asset,
    Threat,
    Tech,
    Control,
}

/// One entry in the ranked driver list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskDriver {
    pub name: String,
    /// Coarse relative impact score in [0,1].
    pub impact: f64,
    pub kind: DriverKind,
}

/// Classify VaR95 against the risk appetite limit.
///
/// Breach iff the limit is exceeded; warning above 80% of the limit;
/// safe otherwise. Exhaustive and mutually exclusive.
pub fn classify_breach(var95: f64, risk_appetite_limit: f64) -> BreachStatus {
    if var95 > risk_appetite_limit {
        BreachStatus::Breach
    } else if var95 > risk_appetite_limit * WARNING_FRACTION {
        BreachStatus::Warning
    } else {
        BreachStatus::Safe
    }
}

/// Ranked driver list: the top contributing asset, the lead threat
/// headline, and a fixed capital-sensitivity entry.
pub fn rank_drivers(top_asset: Option<&str>, lead_threat: Option<&str>) -> Vec<RiskDriver> {
    vec![
        RiskDriver {
            name: top_asset.unwrap_or("Asset Loss").to_string(),
            impact: 0.75,
            kind: DriverKind::Asset,
        },
        RiskDriver {
            name: lead_threat.unwrap_or("Threat Feed").to_string(),
            impact: 0.55,
            kind: DriverKind::Threat,
        },
        RiskDriver {
            name: "Capital Sensitivity".to_string(),
            impact: 0.4,
            kind: DriverKind::Control,
        },
    ]
}

/// Executive narrative embedding the critical VaR, the implied capital
/// buffer, and the breach status.
pub fn narrative(var99: f64, economic_capital: f64, status: BreachStatus) -> String {
    format!(
        "Neural engine complete. Critical VaR (99%) \u{20ac}{:.2}M requires an Economic Capital buffer of \u{20ac}{:.2}M. Status: {status}.",
        var99 / 1_000_000.0,
        economic_capital / 1_000_000.0,
    )
}
