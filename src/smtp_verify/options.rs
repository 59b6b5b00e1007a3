use std::time::Duration;

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

use super::types::Command;

pub const DEFAULT_PORT: u16 = 25;
pub const DEFAULT_HELO: &str = "localhost";
pub const DEFAULT_MAIL_FROM: &str = "test@example.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);

/// Identity and limits of a probe session.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOptions {
    pub port: u16,
    pub helo_name: String,
    pub mail_from: String,
    /// Whole-session deadline: connect, every write and every read.
    pub timeout: Duration,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            helo_name: DEFAULT_HELO.to_string(),
            mail_from: DEFAULT_MAIL_FROM.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ProbeOptions {
    /// Name announced with `HELO`; falls back to `localhost` when blank.
    pub fn helo_name(&self) -> &str {
        let trimmed = self.helo_name.trim();
        if trimmed.is_empty() { DEFAULT_HELO } else { trimmed }
    }

    /// A zero timeout would make every probe time out before connecting.
    pub fn timeout(&self) -> Duration {
        if self.timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            self.timeout
        }
    }

    pub(crate) fn render(&self, command: Command, recipient: &str) -> String {
        match command {
            Command::Helo => format!("HELO {}", self.helo_name()),
            // empty sender is the null reverse-path
            Command::MailFrom => format!("MAIL FROM:<{}>", self.mail_from.trim()),
            Command::RcptTo => format!("RCPT TO:<{recipient}>"),
        }
    }
}
