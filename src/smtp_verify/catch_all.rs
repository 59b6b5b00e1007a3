use rand::{Rng, distributions::Alphanumeric};

use crate::context::VerifyContext;

use super::options::ProbeOptions;
use super::probe::probe_recipient;
use super::types::{ProbeReport, ProbeTarget};

const TOKEN_LEN: usize = 16;

/// Lowercase alphanumeric token. `len` is clamped to `8..=32`, so
/// `random_token(4)` yields 8 characters.
pub fn random_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len.clamp(8, 32))
        .map(|byte| char::from(byte).to_ascii_lowercase())
        .collect()
}

/// A recipient on `domain` that no one was ever issued.
pub fn synthetic_recipient(domain: &str) -> String {
    format!("random.{}@{domain}", random_token(TOKEN_LEN))
}

/// Probes a synthetic recipient on `domain`. Acceptance means the exchanger
/// takes mail for any local part.
pub fn probe_catch_all(
    target: &ProbeTarget,
    domain: &str,
    options: &ProbeOptions,
    ctx: &VerifyContext,
) -> ProbeReport {
    let recipient = synthetic_recipient(domain);
    probe_recipient(target, &recipient, options, ctx)
}

pub fn detect_catch_all(
    target: &ProbeTarget,
    domain: &str,
    options: &ProbeOptions,
    ctx: &VerifyContext,
) -> bool {
    let report = probe_catch_all(target, domain, options, ctx);
    tracing::debug!(domain, catch_all = report.valid, "catch-all probe done");
    report.valid
}
