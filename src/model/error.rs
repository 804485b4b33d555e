use thiserror::Error;

/// Errors raised by the valuation engine. These are contract violations,
/// never transient faults; callers decide whether to re-prompt or abort.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValuationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The target-price iteration exhausted its budget. The carried estimate
    /// is the closest price found and should be presented as approximate.
    #[error("target price did not converge after {iterations} iterations, best estimate {estimate:.4}")]
    NonConvergence { estimate: f64, iterations: u32 },
}
