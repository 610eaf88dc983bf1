use pretty_assertions::assert_eq;

use cyber_var_core::capital_allocation::attribution::{
    allocate_capital, economic_capital, CAPITAL_BUFFER_MULTIPLIER,
};
use cyber_var_core::controls::posture::{apply_control_posture, Control, ControlFramework};
use cyber_var_core::simulation::engine::{run_simulation, SimulationConfig};
use cyber_var_core::simulation::scenario::StressScenario;
use cyber_var_core::types::{Asset, AssetType};

// ===========================================================================
// Capital allocation and control-posture tests against the public API.
// ===========================================================================

const SEED: u64 = 7;

fn make_asset(id: &str, name: &str, hourly_loss_value: f64, base_probability: f64) -> Asset {
    Asset {
        id: id.into(),
        name: name.into(),
        asset_type: AssetType::Database,
        hourly_loss_value,
        base_probability,
        technologies: vec!["Linux".into()],
        dependencies: None,
        vulnerability_score: 0.5,
        maturity_score: 0.5,
    }
}

fn make_config() -> SimulationConfig {
    SimulationConfig {
        iterations: 2_000,
        horizon_days: 365,
        stress_scenario: StressScenario::None,
        risk_appetite_limit: 8_500_000.0,
        insurance_coverage: 0.0,
        insurance_deductible: 0.0,
        contagion_factor: 0.0,
        use_neural_adjustments: true,
        seed: Some(SEED),
    }
}

// ---------------------------------------------------------------------------
// Capital allocation through the engine
// ---------------------------------------------------------------------------

#[test]
fn test_allocated_capital_sums_to_economic_capital() {
    let assets = vec![
        make_asset("a1", "Trading Engine", 3_000_000.0, 1.0),
        make_asset("a2", "PII Vault", 450_000.0, 1.0),
    ];
    let out = run_simulation(&assets, &[], &make_config()).unwrap();
    let r = &out.result;

    let allocated: f64 = r.asset_breakdown.iter().map(|b| b.allocated_capital).sum();
    assert!(
        (allocated - r.economic_capital).abs() < 1e-6 * r.economic_capital.max(1.0),
        "allocated {} vs economic capital {}",
        allocated,
        r.economic_capital
    );
}

#[test]
fn test_largest_asset_dominates_attribution() {
    let assets = vec![
        make_asset("a1", "Trading Engine", 3_000_000.0, 1.0),
        make_asset("a2", "PII Vault", 450_000.0, 1.0),
    ];
    let out = run_simulation(&assets, &[], &make_config()).unwrap();
    let r = &out.result;

    assert_eq!(r.asset_breakdown[0].asset_name, "Trading Engine");
    assert!(r.asset_breakdown[0].contribution > r.asset_breakdown[1].contribution);
    assert!(r.asset_breakdown[0].allocated_capital > r.asset_breakdown[1].allocated_capital);
    assert!(r.asset_breakdown[0].raroc > 0.0);
}

#[test]
fn test_economic_capital_is_buffered_var() {
    let assets = vec![make_asset("a1", "Trading Engine", 3_000_000.0, 1.0)];
    let out = run_simulation(&assets, &[], &make_config()).unwrap();
    let r = &out.result;
    assert_eq!(r.economic_capital, r.var95 * CAPITAL_BUFFER_MULTIPLIER);
    assert_eq!(economic_capital(r.var95), r.economic_capital);
}

#[test]
fn test_untriggered_asset_gets_no_capital() {
    let assets = vec![
        make_asset("a1", "Trading Engine", 3_000_000.0, 1.0),
        make_asset("a2", "Cold Archive", 450_000.0, 0.0),
    ];
    let out = run_simulation(&assets, &[], &make_config()).unwrap();
    let archive = out
        .result
        .asset_breakdown
        .iter()
        .find(|b| b.asset_name == "Cold Archive")
        .unwrap();
    assert_eq!(archive.contribution, 0.0);
    assert_eq!(archive.allocated_capital, 0.0);
    assert_eq!(archive.raroc, 0.0);
}

#[test]
fn test_direct_allocation_weights() {
    let assets = vec![
        make_asset("a1", "A", 100.0, 0.01),
        make_asset("a2", "B", 100.0, 0.01),
    ];
    let breakdown = allocate_capital(&assets, &[75_000.0, 25_000.0], 1_000, 1_000_000.0);
    assert_eq!(breakdown[0].asset_name, "A");
    assert_eq!(breakdown[0].allocated_capital, 750_000.0);
    assert_eq!(breakdown[1].allocated_capital, 250_000.0);
    assert_eq!(breakdown[0].contribution, 75.0);
}

// ---------------------------------------------------------------------------
// Control posture feeding the engine
// ---------------------------------------------------------------------------

fn make_control(id: &str, var_reduction: f64, implemented: bool) -> Control {
    Control {
        id: id.into(),
        name: format!("Control {id}"),
        cost: 80_000.0,
        var_reduction,
        framework: ControlFramework::Dora,
        implemented,
    }
}

#[test]
fn test_posture_shifts_maturity_before_simulation() {
    let assets = vec![make_asset("a1", "PII Vault", 450_000.0, 0.2)];
    let controls = vec![
        make_control("c1", 0.15, true),
        make_control("c2", 0.25, true),
        make_control("c3", 0.20, false),
    ];
    let adjusted = apply_control_posture(&assets, &controls).unwrap();
    assert!((adjusted[0].maturity_score - 0.54).abs() < 1e-12);

    // Higher maturity lowers the risk-adjusted trigger probability, so
    // the expected loss cannot increase under the same seed.
    let mut hardened = assets.clone();
    hardened[0].maturity_score = 0.9;
    let base = run_simulation(&assets, &[], &make_config()).unwrap();
    let better = run_simulation(&hardened, &[], &make_config()).unwrap();
    assert!(better.result.expected_loss <= base.result.expected_loss);
}

#[test]
fn test_posture_is_pure() {
    let assets = vec![make_asset("a1", "PII Vault", 450_000.0, 0.2)];
    let snapshot = serde_json::to_string(&assets).unwrap();
    let _ = apply_control_posture(&assets, &[make_control("c1", 0.3, true)]).unwrap();
    assert_eq!(serde_json::to_string(&assets).unwrap(), snapshot);
}
