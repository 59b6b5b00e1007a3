use thiserror::Error;

use crate::context::Interrupt;

/// Failures that stop the pipeline before any SMTP connection. The message
/// is exactly what the verdict reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HardFailure {
    #[error("Invalid email format")]
    Format,
    #[error("Invalid domain")]
    Domain,
    #[error("No MX records found")]
    NoMx,
}

/// Returned only by the context-aware entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("verification cancelled")]
    Cancelled,
    #[error("verification deadline exceeded")]
    DeadlineExceeded,
}

impl From<Interrupt> for VerifyError {
    fn from(interrupt: Interrupt) -> Self {
        match interrupt {
            Interrupt::Cancelled => Self::Cancelled,
            Interrupt::DeadlineExceeded => Self::DeadlineExceeded,
        }
    }
}
