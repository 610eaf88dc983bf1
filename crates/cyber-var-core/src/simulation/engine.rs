use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use statrs::distribution::Uniform;
use std::time::Instant;

use crate::capital_allocation::attribution::{allocate_capital, economic_capital, AssetBreakdown};
use crate::error::CyberVarError;
use crate::reporting::synthesis::{
    classify_breach, narrative, rank_drivers, BreachStatus, RiskDriver,
};
use crate::simulation::contagion::DependencyGraph;
use crate::simulation::scenario::{ScenarioMultipliers, StressScenario};
use crate::simulation::tail::{sort_sample, tail_statistics, HorizonRecord};
use crate::types::{with_metadata, Asset, ComputationOutput, Threat};
use crate::CyberVarResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Hard ceiling on trials per horizon.
pub const MAX_ITERATIONS: u32 = 1_000_000;

/// Hard ceiling on portfolio size.
pub const MAX_ASSETS: usize = 10_000;

/// Risk-adjusted trigger probabilities are clamped here before sampling.
const PROBABILITY_CLAMP: f64 = 0.99;

/// Minimum incident duration in hours.
const MIN_DURATION_HOURS: f64 = 0.5;

/// Incident duration band (hours) before severity scaling.
const DURATION_MIN_HOURS: f64 = 2.0;
const DURATION_MAX_HOURS: f64 = 6.0;

const DAYS_PER_YEAR: f64 = 365.0;

fn default_iterations() -> u32 {
    10_000
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Run parameters. Immutable for the duration of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Trials per horizon (maximum 1,000,000).
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Primary analysis horizon in days.
    pub horizon_days: u32,
    /// Stress scenario applied to the risk-adjusted model.
    #[serde(default)]
    pub stress_scenario: StressScenario,
    /// VaR95 level above which the run is classified as a breach.
    pub risk_appetite_limit: f64,
    /// Insurance reimbursement cap above the deductible.
    pub insurance_coverage: f64,
    /// Self-retained layer; losses below it are never reimbursed.
    pub insurance_deductible: f64,
    /// Dependency contagion strength in [0,1].
    pub contagion_factor: f64,
    /// Record the risk-adjusted (insured) loss instead of the classic total.
    pub use_neural_adjustments: bool,
    /// Optional seed for reproducibility.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Output of a full simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub var95: f64,
    pub var99: f64,
    pub cvar95: f64,
    /// Mean of the primary horizon's recorded losses.
    pub expected_loss: f64,
    /// Largest recorded loss over the primary horizon.
    pub max_loss: f64,
    /// Full sorted loss sample for the primary horizon.
    pub total_losses: Vec<f64>,
    /// Per-asset attribution, sorted descending by contribution.
    pub asset_breakdown: Vec<AssetBreakdown>,
    /// One record per analysis horizon.
    pub horizons: Vec<HorizonRecord>,
    /// Ranked risk drivers.
    pub drivers: Vec<RiskDriver>,
    pub narrative: String,
    pub breach_status: BreachStatus,
    pub economic_capital: f64,
}

/// Accumulated state for one horizon, merged by the caller.
struct HorizonOutcome {
    recorded_losses: Vec<f64>,
    classic_losses: Vec<f64>,
    /// Realized risk-adjusted loss per asset index, additive across trials.
    asset_losses: Vec<f64>,
}

// ---------------------------------------------------------------------------
// Insurance layer
// ---------------------------------------------------------------------------

/// Insurance transform: reimburses the layer above the deductible up to
/// the coverage cap. Everything below the deductible and above
/// deductible + coverage stays with the insured party.
pub fn apply_insurance(loss: f64, deductible: f64, coverage: f64) -> f64 {
    let insured_portion = (loss - deductible).max(0.0);
    (loss - insured_portion.min(coverage)).max(0.0)
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the Monte Carlo loss simulation over the asset portfolio.
///
/// For each horizon in {1, 10, 30, `horizon_days`} the engine runs
/// `iterations` independent trials under a baseline (classic) model and
/// a risk-adjusted (neural) model, propagates failures across the
/// dependency graph, applies the insurance layer to the risk-adjusted
/// total, and extracts order-statistic tail measures. Capital
/// allocation and result synthesis are derived from the primary
/// horizon.
///
/// The computation is pure and synchronous: it reads only its three
/// arguments, allocates only local working state, and is safe to call
/// concurrently from independent callers.
pub fn run_simulation(
    assets: &[Asset],
    threats: &[Threat],
    config: &SimulationConfig,
) -> CyberVarResult<ComputationOutput<SimulationResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate(assets, threats, config)?;

    if assets.is_empty() {
        warnings.push("No assets supplied; losses are identically zero".into());
    }
    if config.iterations > 0 && config.iterations < 1_000 {
        warnings.push(format!(
            "Only {} iterations; tail estimates may be unstable below 1,000",
            config.iterations
        ));
    }

    let mut rng = match config.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let duration_hours =
        Uniform::new(DURATION_MIN_HOURS, DURATION_MAX_HOURS).map_err(|e| {
            CyberVarError::InvalidInput {
                field: "duration".into(),
                reason: format!("Invalid duration band: {e}"),
            }
        })?;

    let multipliers = config.stress_scenario.multipliers();
    let graph = DependencyGraph::from_assets(assets);

    // Threat amplification is horizon-independent: the product of the
    // impact modifiers of every threat targeting one of the asset's
    // technologies.
    let threat_factors: Vec<f64> = assets
        .iter()
        .map(|asset| {
            threats
                .iter()
                .filter(|t| asset.technologies.contains(&t.target_technology))
                .map(|t| t.impact_modifier)
                .product()
        })
        .collect();

    // Short horizons are always simulated alongside the primary one.
    // The list is not deduplicated; when the primary horizon collides
    // with a short one, the later run wins, as a re-run would.
    let horizons = [1, 10, 30, config.horizon_days];

    let mut horizon_records = Vec::with_capacity(horizons.len());
    let mut primary_sorted: Vec<f64> = Vec::new();
    let mut primary_var95 = 0.0;
    let mut primary_var99 = 0.0;
    let mut primary_cvar95 = 0.0;
    let mut primary_asset_losses = vec![0.0; assets.len()];

    for &days in &horizons {
        let outcome = run_horizon(
            assets,
            &threat_factors,
            &graph,
            multipliers,
            config,
            days,
            duration_hours,
            &mut rng,
        );

        let recorded_sorted = sort_sample(outcome.recorded_losses);
        let classic_sorted = sort_sample(outcome.classic_losses);

        let stats = tail_statistics(&recorded_sorted);
        let classic_stats = tail_statistics(&classic_sorted);

        horizon_records.push(HorizonRecord {
            days,
            var_value: stats.var95,
            cvar_value: stats.cvar95,
            classic_var_value: classic_stats.var95,
        });

        if days == config.horizon_days {
            primary_var95 = stats.var95;
            primary_var99 = stats.var99;
            primary_cvar95 = stats.cvar95;
            primary_sorted = recorded_sorted;
            primary_asset_losses = outcome.asset_losses;
        }
    }

    let ec = economic_capital(primary_var95);
    let asset_breakdown =
        allocate_capital(assets, &primary_asset_losses, config.iterations, ec);

    let expected_loss = if primary_sorted.is_empty() {
        0.0
    } else {
        primary_sorted.iter().sum::<f64>() / primary_sorted.len() as f64
    };
    let max_loss = primary_sorted.last().copied().unwrap_or(0.0);

    let breach_status = classify_breach(primary_var95, config.risk_appetite_limit);
    let drivers = rank_drivers(
        asset_breakdown.first().map(|b| b.asset_name.as_str()),
        threats.first().map(|t| t.title.as_str()),
    );
    let narrative_text = narrative(primary_var99, ec, breach_status);

    let result = SimulationResult {
        var95: primary_var95,
        var99: primary_var99,
        cvar95: primary_cvar95,
        expected_loss,
        max_loss,
        total_losses: primary_sorted,
        asset_breakdown,
        horizons: horizon_records,
        drivers,
        narrative: narrative_text,
        breach_status,
        economic_capital: ec,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Cyber Loss Monte Carlo Simulation",
        &serde_json::json!({
            "iterations": config.iterations,
            "horizon_days": config.horizon_days,
            "stress_scenario": config.stress_scenario,
            "contagion_factor": config.contagion_factor,
            "use_neural_adjustments": config.use_neural_adjustments,
            "insurance": {
                "deductible": config.insurance_deductible,
                "coverage": config.insurance_coverage,
            },
            "asset_count": assets.len(),
            "threat_count": threats.len(),
            "seed": config.seed,
        }),
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Trial loop
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
fn run_horizon(
    assets: &[Asset],
    threat_factors: &[f64],
    graph: &DependencyGraph,
    multipliers: ScenarioMultipliers,
    config: &SimulationConfig,
    horizon_days: u32,
    duration_hours: Uniform,
    rng: &mut StdRng,
) -> HorizonOutcome {
    let n = assets.len();
    let iterations = config.iterations as usize;
    let horizon_scale = f64::from(horizon_days) / DAYS_PER_YEAR;

    // Per-asset trigger probabilities for this horizon. The classic
    // model uses the raw base rate; the risk-adjusted model layers the
    // stress frequency, the vulnerability/maturity posture, and threat
    // amplification on top, clamped before sampling.
    let classic_probs: Vec<f64> = assets
        .iter()
        .map(|a| a.base_probability * horizon_scale)
        .collect();
    let neural_probs: Vec<f64> = assets
        .iter()
        .zip(threat_factors)
        .map(|(a, &factor)| {
            let p = a.base_probability
                * horizon_scale
                * multipliers.frequency
                * (1.0 + a.vulnerability_score - a.maturity_score)
                * factor;
            p.min(PROBABILITY_CLAMP)
        })
        .collect();

    let mut outcome = HorizonOutcome {
        recorded_losses: Vec::with_capacity(iterations),
        classic_losses: Vec::with_capacity(iterations),
        asset_losses: vec![0.0; n],
    };

    let mut classic_triggered = vec![false; n];
    let mut neural_triggered = vec![false; n];

    for _ in 0..iterations {
        classic_triggered.fill(false);
        neural_triggered.fill(false);

        for i in 0..n {
            if rng.gen::<f64>() < classic_probs[i] {
                classic_triggered[i] = true;
            }
            if rng.gen::<f64>() < neural_probs[i] {
                neural_triggered[i] = true;
            }
        }

        if config.contagion_factor > 0.0 {
            graph.propagate(&mut neural_triggered, config.contagion_factor, rng);
        }

        let mut neural_total = 0.0;
        let mut classic_total = 0.0;
        for i in 0..n {
            if neural_triggered[i] {
                let base: f64 = rng.sample(duration_hours);
                let duration = (base * multipliers.severity).max(MIN_DURATION_HOURS);
                let loss = duration * assets[i].hourly_loss_value;
                neural_total += loss;
                outcome.asset_losses[i] += loss;
            }
            if classic_triggered[i] {
                let base: f64 = rng.sample(duration_hours);
                let duration = base.max(MIN_DURATION_HOURS);
                classic_total += duration * assets[i].hourly_loss_value;
            }
        }

        let recorded = if config.use_neural_adjustments {
            apply_insurance(
                neural_total,
                config.insurance_deductible,
                config.insurance_coverage,
            )
        } else {
            classic_total
        };
        outcome.recorded_losses.push(recorded);
        outcome.classic_losses.push(classic_total);
    }

    outcome
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(
    assets: &[Asset],
    threats: &[Threat],
    config: &SimulationConfig,
) -> CyberVarResult<()> {
    if config.iterations > MAX_ITERATIONS {
        return Err(CyberVarError::InvalidInput {
            field: "iterations".into(),
            reason: format!("Must not exceed {MAX_ITERATIONS}"),
        });
    }
    if config.horizon_days == 0 {
        return Err(CyberVarError::InvalidInput {
            field: "horizon_days".into(),
            reason: "Must be at least 1".into(),
        });
    }
    if !(0.0..=1.0).contains(&config.contagion_factor) {
        return Err(CyberVarError::InvalidInput {
            field: "contagion_factor".into(),
            reason: "Must be between 0 and 1".into(),
        });
    }
    if config.risk_appetite_limit < 0.0 {
        return Err(CyberVarError::InvalidInput {
            field: "risk_appetite_limit".into(),
            reason: "Must be non-negative".into(),
        });
    }
    if config.insurance_coverage < 0.0 {
        return Err(CyberVarError::InvalidInput {
            field: "insurance_coverage".into(),
            reason: "Must be non-negative".into(),
        });
    }
    if config.insurance_deductible < 0.0 {
        return Err(CyberVarError::InvalidInput {
            field: "insurance_deductible".into(),
            reason: "Must be non-negative".into(),
        });
    }
    if assets.len() > MAX_ASSETS {
        return Err(CyberVarError::InvalidInput {
            field: "assets".into(),
            reason: format!("Portfolio exceeds {MAX_ASSETS} assets"),
        });
    }

    for asset in assets {
        if !(0.0..=1.0).contains(&asset.base_probability) {
            return Err(CyberVarError::InvalidInput {
                field: format!("asset:{} base_probability", asset.id),
                reason: "Must be between 0 and 1".into(),
            });
        }
        if !(0.0..=1.0).contains(&asset.vulnerability_score) {
            return Err(CyberVarError::InvalidInput {
                field: format!("asset:{} vulnerability_score", asset.id),
                reason: "Must be between 0 and 1".into(),
            });
        }
        if !(0.0..=1.0).contains(&asset.maturity_score) {
            return Err(CyberVarError::InvalidInput {
                field: format!("asset:{} maturity_score", asset.id),
                reason: "Must be between 0 and 1".into(),
            });
        }
        if asset.hourly_loss_value < 0.0 {
            return Err(CyberVarError::InvalidInput {
                field: format!("asset:{} hourly_loss_value", asset.id),
                reason: "Must be non-negative".into(),
            });
        }
    }

    for threat in threats {
        if threat.impact_modifier < 1.0 {
            return Err(CyberVarError::InvalidInput {
                field: format!("threat:{} impact_modifier", threat.id),
                reason: "Must be at least 1.0".into(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
