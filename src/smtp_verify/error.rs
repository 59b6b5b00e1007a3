use std::io;

use thiserror::Error;

use super::types::ProbeOutcome;

/// Failures inside a probe session. They never leave the probe: each one is
/// folded into a [`ProbeOutcome`] with `valid = false`.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("no socket address for {exchange}")]
    NoAddress { exchange: String },
    #[error("connection to {addr} failed: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("I/O error: {source}")]
    Io {
        #[source]
        source: io::Error,
    },
    #[error("connection closed by peer")]
    Closed,
    #[error("deadline elapsed")]
    Timeout,
    #[error("cancelled")]
    Cancelled,
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl ProbeError {
    pub(crate) fn io(source: io::Error) -> Self {
        if is_timeout(&source) {
            Self::Timeout
        } else {
            Self::Io { source }
        }
    }

    pub(crate) fn connect(addr: impl ToString, source: io::Error) -> Self {
        if is_timeout(&source) {
            Self::Timeout
        } else {
            Self::Connect {
                addr: addr.to_string(),
                source,
            }
        }
    }
}

pub(crate) fn is_timeout(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
    )
}

impl From<ProbeError> for ProbeOutcome {
    fn from(err: ProbeError) -> Self {
        match err {
            ProbeError::Closed => Self::PeerClosed,
            ProbeError::Timeout => Self::TimedOut,
            ProbeError::Cancelled => Self::Cancelled,
            other => Self::Failed {
                reason: other.to_string(),
            },
        }
    }
}
