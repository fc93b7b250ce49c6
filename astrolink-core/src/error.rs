use crate::parser::ParseError;
use thiserror::Error;

/// Errors raised while building or stepping a simulation
#[derive(Debug, Error)]
pub enum SimError {
    /// A body was constructed with non-positive or non-finite physical parameters
    #[error("invalid body '{id}': {reason}")]
    InvalidBody { id: String, reason: String },

    /// Two bodies occupy the same point, so the force law divides by zero
    #[error("degenerate configuration: '{a}' and '{b}' are coincident")]
    DegenerateConfiguration { a: String, b: String },

    #[error("invalid timestep {0}: dt must be finite and non-negative")]
    InvalidTimestep(f32),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("unknown body '{0}'")]
    UnknownBody(String),

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The scenario parsed but failed static analysis
    #[error("scenario rejected: {0}")]
    Analysis(String),
}
