use serde::{Deserialize, Serialize};

/// Tail statistics for one simulated horizon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HorizonRecord {
    /// Horizon length in days.
    pub days: u32,
    /// 95% Value-at-Risk of the recorded loss sample.
    pub var_value: f64,
    /// 95% Conditional VaR (expected loss beyond the VaR threshold).
    pub cvar_value: f64,
    /// 95% VaR of the classic-model sample, for comparison.
    pub classic_var_value: f64,
}

/// Order-statistic tail measures extracted from a sorted sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TailStatistics {
    pub var95: f64,
    pub var99: f64,
    pub cvar95: f64,
}

/// Sort a loss sample ascending.
pub fn sort_sample(mut losses: Vec<f64>) -> Vec<f64> {
    losses.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    losses
}

/// Historical-simulation VaR and CVaR on a **sorted** sample.
///
/// No interpolation: the VaR at confidence p is the value at index
/// floor(p * n). CVaR at 95% is the arithmetic mean of the sorted tail
/// from that index to the end. An empty sample yields all-zero
/// statistics.
pub fn tail_statistics(sorted: &[f64]) -> TailStatistics {
    let n = sorted.len();
    if n == 0 {
        return TailStatistics {
            var95: 0.0,
            var99: 0.0,
            cvar95: 0.0,
        };
    }

    let idx95 = var_index(n, 0.95);
    let idx99 = var_index(n, 0.99);
    let var95 = sorted[idx95];
    let var99 = sorted[idx99];

    let tail = &sorted[idx95..];
    let cvar95 = if tail.is_empty() {
        var95
    } else {
        tail.iter().sum::<f64>() / tail.len() as f64
    };

    TailStatistics {
        var95,
        var99,
        cvar95,
    }
}

/// Index of the VaR order statistic at the given confidence level.
fn var_index(n: usize, confidence: f64) -> usize {
    ((n as f64 * confidence).floor() as usize).min(n - 1)
}
