#![forbid(unsafe_code)]
//! mailverify_lib — e-mail deliverability verification
//!
//! [`verify_email`] runs the whole pipeline (syntax, DNS, MX, SMTP `RCPT TO`
//! probe, catch-all probe, heuristics) and always returns a
//! [`VerificationVerdict`].

pub mod context;
pub mod heuristics;
pub mod mx;
pub mod smtp_verify;
pub mod validator;
pub mod verify;

pub use context::{CancelToken, VerifyContext};
pub use heuristics::{is_role_based, is_spam_trap};
pub use mx::{DnsError, DnsLookup, MxRecord, SystemResolver, check_mx};
pub use smtp_verify::{
    ProbeError, ProbeOptions, ProbeOutcome, ProbeReport, ProbeTarget, detect_catch_all,
    probe_recipient,
};
pub use validator::{EmailAddress, is_valid_syntax};
pub use verify::{
    HardFailure, VerificationStatus, VerificationVerdict, Verifier, VerifyError, VerifyOptions,
    verify_email, verify_email_with_context, verify_email_with_options, verify_with_resolver,
};
