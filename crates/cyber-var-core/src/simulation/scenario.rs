use serde::{Deserialize, Serialize};

/// Named stress scenario amplifying trigger frequency and loss severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StressScenario {
    #[default]
    None,
    RansomwareWave,
    ZeroDayMassive,
    SupplyChainCollapse,
}

/// Frequency and severity multipliers applied by a stress scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioMultipliers {
    /// Scales every asset's risk-adjusted trigger probability.
    pub frequency: f64,
    /// Scales the sampled incident duration.
    pub severity: f64,
}

impl StressScenario {
    /// Multiplier pair for this scenario. Total over the closed
    /// enumeration; no fallback path.
    pub fn multipliers(self) -> ScenarioMultipliers {
        match self {
            StressScenario::None => ScenarioMultipliers {
                frequency: 1.0,
                severity: 1.0,
            },
            StressScenario::RansomwareWave => ScenarioMultipliers {
                frequency: 3.0,
                severity: 1.8,
            },
            StressScenario::ZeroDayMassive => ScenarioMultipliers {
                frequency: 2.2,
                severity: 4.0,
            },
            StressScenario::SupplyChainCollapse => ScenarioMultipliers {
                frequency: 1.6,
                severity: 7.0,
            },
        }
    }
}
