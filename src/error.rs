use std::fmt;

/// Errors surfaced by the optimization core.
///
/// Configuration and input problems are rejected before any generation
/// runs; distance provider failures abort the run wherever they occur.
/// Residual constraint violations in a finished run are *not* errors, they
/// are reported in the result's `residual_violations`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// A configuration value the solver cannot run with.
    InvalidConfiguration(String),
    /// Input data no assignment can be built for.
    InfeasibleInput(String),
    /// Failure propagated from the injected distance provider.
    DistanceProvider(String),
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::InvalidConfiguration(msg) => {
                write!(f, "invalid configuration: {}", msg)
            }
            SolverError::InfeasibleInput(msg) => write!(f, "infeasible input: {}", msg),
            SolverError::DistanceProvider(msg) => {
                write!(f, "distance provider failure: {}", msg)
            }
        }
    }
}

impl std::error::Error for SolverError {}
