//! SMTP recipient probing.
//!
//! [`probe_recipient`] runs one bounded `HELO` / `MAIL FROM` / `RCPT TO` /
//! `QUIT` dialog against a single mail exchanger and reduces whatever happens
//! to a [`ProbeReport`]. [`detect_catch_all`] reuses it with a synthetic
//! recipient.

mod catch_all;
mod error;
mod options;
mod probe;
mod session;
mod types;

pub use catch_all::{detect_catch_all, probe_catch_all, random_token, synthetic_recipient};
pub use error::ProbeError;
pub use options::{DEFAULT_HELO, DEFAULT_MAIL_FROM, DEFAULT_PORT, DEFAULT_TIMEOUT, ProbeOptions};
pub use probe::probe_recipient;
pub use types::{ProbeOutcome, ProbeReport, ProbeStage, ProbeTarget, SmtpReply};
