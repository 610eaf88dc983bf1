use serde::{Deserialize, Serialize};

use crate::error::CyberVarError;
use crate::types::Asset;
use crate::CyberVarResult;

/// Baseline maturity before control credit.
const BASELINE_MATURITY: f64 = 0.5;

/// Fraction of each control's VaR reduction credited to maturity.
const REDUCTION_WEIGHT: f64 = 0.1;

/// Hard cap on the derived maturity score.
const MATURITY_CAP: f64 = 0.99;

/// Control framework mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlFramework {
    #[serde(rename = "NIST")]
    Nist,
    #[serde(rename = "ISO27001")]
    Iso27001,
    #[serde(rename = "DORA")]
    Dora,
}

/// A deployable security control.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Control {
    pub id: String,
    pub name: String,
    /// Annual cost of running the control.
    pub cost: f64,
    /// Fractional VaR reduction attributed to the control, in [0,1].
    pub var_reduction: f64,
    pub framework: ControlFramework,
    pub implemented: bool,
}

/// Recompute every asset's maturity score from the implemented control
/// set: baseline 0.5 plus a weighted credit per implemented control,
/// capped at 0.99. Returns adjusted copies; the inputs are left
/// untouched.
pub fn apply_control_posture(
    assets: &[Asset],
    controls: &[Control],
) -> CyberVarResult<Vec<Asset>> {
    for control in controls {
        if !(0.0..=1.0).contains(&control.var_reduction) {
            return Err(CyberVarError::InvalidInput {
                field: format!("control:{} var_reduction", control.id),
                reason: "Must be between 0 and 1".into(),
            });
        }
        if control.cost < 0.0 {
            return Err(CyberVarError::InvalidInput {
                field: format!("control:{} cost", control.id),
                reason: "Must be non-negative".into(),
            });
        }
    }

    let credit: f64 = controls
        .iter()
        .filter(|c| c.implemented)
        .map(|c| c.var_reduction * REDUCTION_WEIGHT)
        .sum();
    let maturity = (BASELINE_MATURITY + credit).min(MATURITY_CAP);

    Ok(assets
        .iter()
        .map(|a| Asset {
            maturity_score: maturity,
            ..a.clone()
        })
        .collect())
}
