pub mod error;
pub mod types;

#[cfg(feature = "capital_allocation")]
pub mod capital_allocation;

#[cfg(feature = "controls")]
pub mod controls;

#[cfg(feature = "reporting")]
pub mod reporting;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use error::CyberVarError;
pub use types::*;

/// Standard result type for all cyber-var operations
pub type CyberVarResult<T> = Result<T, CyberVarError>;
