//! Economic capital and per-asset return attribution.
//!
//! Covers:
//! 1. **Economic Capital** -- EC = VaR95 * regulatory buffer multiplier
//! 2. **Capital Allocation** -- EC split by each asset's share of simulated loss
//! 3. **RAROC** -- annualized notional return proxy / allocated capital

use serde::{Deserialize, Serialize};

use crate::types::Asset;

/// Regulatory buffer applied on top of VaR95.
pub const CAPITAL_BUFFER_MULTIPLIER: f64 = 1.25;

/// Proxy annual return rate on an asset's notional value.
const NOTIONAL_RETURN_RATE: f64 = 0.1;

/// Hours per year, for annualizing hourly loss values.
const HOURS_PER_YEAR: f64 = 24.0 * 365.0;

/// Per-asset capital and return attribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetBreakdown {
    pub asset_name: String,
    /// Expected per-trial loss attributable to this asset.
    pub contribution: f64,
    /// Share of economic capital charged to this asset.
    pub allocated_capital: f64,
    /// Risk-adjusted return on the allocated capital.
    pub raroc: f64,
}

/// Economic capital implied by the 95% Value-at-Risk.
pub fn economic_capital(var95: f64) -> f64 {
    var95 * CAPITAL_BUFFER_MULTIPLIER
}

/// Allocate economic capital across assets in proportion to their
/// accumulated simulated losses, and attach the RAROC proxy.
///
/// `accumulated_losses` is keyed by asset index and additive across
/// trials. A zero total is treated as 1 so every weight collapses to
/// zero instead of dividing by zero; `iterations == 0` yields zero
/// contributions. The result is sorted descending by contribution.
pub fn allocate_capital(
    assets: &[Asset],
    accumulated_losses: &[f64],
    iterations: u32,
    economic_capital: f64,
) -> Vec<AssetBreakdown> {
    let total: f64 = accumulated_losses.iter().sum();
    let total = if total > 0.0 { total } else { 1.0 };

    let mut breakdown: Vec<AssetBreakdown> = assets
        .iter()
        .zip(accumulated_losses)
        .map(|(asset, &accumulated)| {
            let contribution = if iterations == 0 {
                0.0
            } else {
                accumulated / f64::from(iterations)
            };
            let allocated = economic_capital * (accumulated / total);
            let raroc = if contribution > 0.0 && allocated > 0.0 {
                asset.hourly_loss_value * HOURS_PER_YEAR * NOTIONAL_RETURN_RATE / allocated
            } else {
                0.0
            };
            AssetBreakdown {
                asset_name: asset.name.clone(),
                contribution,
                allocated_capital: allocated,
                raroc,
            }
        })
        .collect();

    breakdown.sort_by(|a, b| {
        b.contribution
            .partial_cmp(&a.contribution)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    breakdown
}
