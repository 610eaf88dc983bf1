use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of a monitored digital asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetType {
    #[serde(rename = "Payment System")]
    PaymentSystem,
    #[serde(rename = "Database")]
    Database,
    #[serde(rename = "Trading Algorithm")]
    TradingAlgo,
    #[serde(rename = "Cloud Infrastructure")]
    CloudInfra,
    #[serde(rename = "IAM Provider")]
    IdentityProvider,
}

/// A monitored system in the institution's digital estate.
///
/// Assets are read-only inputs for one simulation run: the engine never
/// mutates them and keeps no state between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub asset_type: AssetType,
    /// Loss per hour of unavailability, in portfolio currency.
    pub hourly_loss_value: f64,
    /// Annualized single-event trigger probability, in [0,1].
    pub base_probability: f64,
    /// Technology tags matched against threat intelligence.
    pub technologies: Vec<String>,
    /// Upstream dependency asset ids. Cycles are tolerated; unresolved
    /// ids are ignored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,
    /// Exposure score in [0,1].
    pub vulnerability_score: f64,
    /// Control maturity score in [0,1].
    pub maturity_score: f64,
}

/// Severity band reported by the intelligence feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreatSeverity {
    Low,
    Medium,
    High,
    Critical,
}

/// An external threat-intelligence signal.
///
/// The trial loop consumes `target_technology` and `impact_modifier`;
/// result synthesis additionally reads `title`. How the record was
/// produced (feed parsing, analyst triage, model extraction) is the
/// upstream collaborator's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Threat {
    pub id: String,
    pub title: String,
    pub description: String,
    pub severity: ThreatSeverity,
    /// Technology tag this threat targets.
    pub target_technology: String,
    /// Multiplicative factor >= 1.0 applied to matching assets' trigger
    /// probability.
    pub impact_modifier: f64,
    /// When the signal was observed.
    pub timestamp: DateTime<Utc>,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "ieee754_f64".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_asset() -> Asset {
        Asset {
            id: "a1".into(),
            name: "SWIFT Gateway".into(),
            asset_type: AssetType::PaymentSystem,
            hourly_loss_value: 1_200_000.0,
            base_probability: 0.001,
            technologies: vec!["Swift".into(), "Oracle".into()],
            dependencies: Some(vec!["a2".into()]),
            vulnerability_score: 0.4,
            maturity_score: 0.7,
        }
    }

    #[test]
    fn test_asset_type_wire_names() {
        let json = serde_json::to_string(&AssetType::PaymentSystem).unwrap();
        assert_eq!(json, "\"Payment System\"");
        let json = serde_json::to_string(&AssetType::IdentityProvider).unwrap();
        assert_eq!(json, "\"IAM Provider\"");
    }

    #[test]
    fn test_asset_roundtrip() {
        let asset = make_asset();
        let json = serde_json::to_string(&asset).unwrap();
        let back: Asset = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, asset.id);
        assert_eq!(back.dependencies, asset.dependencies);
    }

    #[test]
    fn test_asset_omits_absent_dependencies() {
        let mut asset = make_asset();
        asset.dependencies = None;
        let json = serde_json::to_string(&asset).unwrap();
        assert!(!json.contains("dependencies"));
    }

    #[test]
    fn test_threat_roundtrip() {
        let threat = Threat {
            id: "t1".into(),
            title: "Zero-Day Oracle exploit".into(),
            description: "Detected on darkweb".into(),
            severity: ThreatSeverity::Critical,
            target_technology: "Oracle".into(),
            impact_modifier: 3.5,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&threat).unwrap();
        let back: Threat = serde_json::from_str(&json).unwrap();
        assert_eq!(back.target_technology, "Oracle");
        assert_eq!(back.severity, ThreatSeverity::Critical);
    }

    #[test]
    fn test_metadata_precision_field() {
        let out = with_metadata("Test", &serde_json::json!({}), vec![], 1, 42.0_f64);
        assert_eq!(out.metadata.precision, "ieee754_f64");
    }
}
