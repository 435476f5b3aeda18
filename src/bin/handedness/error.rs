//! CLI error type and exit codes.
//!
//! Exit codes:
//! - 0: success
//! - 1: I/O, rendering or serialization failure
//! - 2: rejected parameters (invalid or degenerate)

use std::process::ExitCode;

use handedness_models::{DistributionError, InputError, RenderError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid parameters: {0}")]
    Input(#[from] InputError),
    #[error("cannot compute distributions: {0}")]
    Distribution(#[from] DistributionError),
    #[error("cannot render figure: {0}")]
    Render(#[from] RenderError),
    #[error("cannot parse `{line}`: {reason}")]
    Parse { line: String, reason: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CliExitCode {
    Success = 0,
    Failure = 1,
    Rejected = 2,
}

impl From<CliExitCode> for ExitCode {
    fn from(code: CliExitCode) -> Self {
        Self::from(code as u8)
    }
}

impl From<&CliError> for CliExitCode {
    fn from(err: &CliError) -> Self {
        match err {
            CliError::Input(_) | CliError::Distribution(_) | CliError::Parse { .. } => {
                Self::Rejected
            }
            CliError::Render(_) | CliError::Io(_) | CliError::Json(_) => Self::Failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_parameters_map_to_exit_code_two() {
        let err = CliError::from(InputError::ZeroPopulation);
        assert_eq!(CliExitCode::from(&err), CliExitCode::Rejected);
    }

    #[test]
    fn io_failures_map_to_exit_code_one() {
        let err = CliError::from(std::io::Error::other("disk full"));
        assert_eq!(CliExitCode::from(&err), CliExitCode::Failure);
    }
}
