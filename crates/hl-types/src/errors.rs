use thiserror::Error;

/// Main error type for the HedgeLens engine.
///
/// Every component fails fast and loud on bad input; nothing is silently
/// defaulted to zero. A missing root is signalled distinctly so callers can
/// never confuse "no solution in bracket" with "target delta reached at 0".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HlError {
    #[error("Invalid input: {field} = {value}")]
    InvalidInput { field: &'static str, value: String },

    #[error("No sign change for target delta {target_delta} in bracket [{lo:.2}, {hi:.2}]")]
    RootNotFound {
        target_delta: f64,
        lo: f64,
        hi: f64,
    },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

impl HlError {
    /// Shorthand for an `InvalidInput` with a displayable offending value.
    pub fn invalid_input(field: &'static str, value: impl ToString) -> Self {
        HlError::InvalidInput {
            field,
            value: value.to_string(),
        }
    }
}

/// Result type alias for HedgeLens operations.
pub type HlResult<T> = Result<T, HlError>;
