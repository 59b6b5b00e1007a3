use std::fmt;
use std::net::SocketAddr;

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

/// Dialog stage of one probe session.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStage {
    Connecting,
    AwaitGreeting,
    AwaitHelo,
    AwaitMailOk,
    AwaitRcpt,
    Done,
}

/// Command sent by the probe. Rendered with the configured identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    Helo,
    MailFrom,
    RcptTo,
}

/// What a single reply does to the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Transition {
    /// Send `command`, then wait in `next`.
    Advance { command: Command, next: ProbeStage },
    /// Send `QUIT` and resolve.
    Finish(ProbeOutcome),
}

impl ProbeStage {
    /// One complete reply drives exactly one transition.
    pub(crate) fn on_reply(self, reply: &SmtpReply) -> Transition {
        match (self, reply.code) {
            (Self::AwaitGreeting, 220) => Transition::Advance {
                command: Command::Helo,
                next: Self::AwaitHelo,
            },
            (Self::AwaitHelo, 250) => Transition::Advance {
                command: Command::MailFrom,
                next: Self::AwaitMailOk,
            },
            (Self::AwaitMailOk, 250) => Transition::Advance {
                command: Command::RcptTo,
                next: Self::AwaitRcpt,
            },
            (Self::AwaitRcpt, 250 | 251) => Transition::Finish(ProbeOutcome::Accepted),
            (Self::AwaitGreeting | Self::AwaitHelo | Self::AwaitMailOk | Self::AwaitRcpt, code) => {
                Transition::Finish(ProbeOutcome::Rejected { stage: self, code })
            }
            (Self::Connecting | Self::Done, code) => Transition::Finish(ProbeOutcome::Failed {
                reason: format!("reply {code} received in stage {self:?}"),
            }),
        }
    }
}

/// A complete SMTP reply: status code plus the text of every line.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpReply {
    pub code: u16,
    pub lines: Vec<String>,
}

impl SmtpReply {
    pub fn message(&self) -> String {
        self.lines.join("\n")
    }
}

/// Terminal resolution of a probe session.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// `RCPT TO` answered with 250/251.
    Accepted,
    /// The server answered `code` where the dialog expected success.
    Rejected { stage: ProbeStage, code: u16 },
    /// The peer closed the connection before the recipient was accepted.
    PeerClosed,
    /// Transport error or malformed reply.
    Failed { reason: String },
    TimedOut,
    Cancelled,
}

impl ProbeOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted => f.write_str("accepted"),
            Self::Rejected { stage, code } => write!(f, "rejected {code} ({stage:?})"),
            Self::PeerClosed => f.write_str("closed by peer"),
            Self::Failed { reason } => write!(f, "failed ({reason})"),
            Self::TimedOut => f.write_str("timed out"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Mail exchanger a probe connects to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    pub exchange: String,
    pub addrs: Vec<SocketAddr>,
}

impl ProbeTarget {
    pub fn new(exchange: impl Into<String>, addrs: Vec<SocketAddr>) -> Self {
        Self {
            exchange: exchange.into(),
            addrs,
        }
    }
}

/// Result of one probe. `valid` is true only for [`ProbeOutcome::Accepted`].
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub valid: bool,
    pub outcome: ProbeOutcome,
    pub exchange: String,
    pub transcript: Vec<String>,
}

impl ProbeReport {
    pub fn new(
        outcome: ProbeOutcome,
        exchange: impl Into<String>,
        transcript: Vec<String>,
    ) -> Self {
        Self {
            valid: outcome.is_accepted(),
            outcome,
            exchange: exchange.into(),
            transcript,
        }
    }
}
