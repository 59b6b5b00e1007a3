//! The verification pipeline.
//!
//! Syntax, domain presence and MX lookup can each end the run with an
//! `invalid` verdict. Once a preferred exchanger is known the address is
//! probed, the domain is checked for catch-all behaviour and the static
//! heuristics are applied.

mod error;
mod options;
mod types;

pub use error::{HardFailure, VerifyError};
pub use options::{DEFAULT_DNS_ATTEMPTS, DEFAULT_DNS_TIMEOUT, VerifyOptions};
pub use types::{MSG_POTENTIALLY_VALID, MSG_VALID, VerificationStatus, VerificationVerdict};

use std::thread;
use std::time::Instant;

use crate::context::VerifyContext;
use crate::heuristics::{is_role_based, is_spam_trap};
use crate::mx::{
    DnsLookup, SystemResolver, domain_has_any_record, preferred_exchange,
    resolve_exchange_addrs, resolve_mx,
};
use crate::smtp_verify::{ProbeTarget, detect_catch_all, probe_recipient};
use crate::validator::{EmailAddress, is_valid_syntax};

use types::SmtpChecks;

/// Verifies one address with default options and the system resolver.
pub fn verify_email(email: &str) -> VerificationVerdict {
    verify_email_with_options(email, &VerifyOptions::default())
}

pub fn verify_email_with_options(email: &str, options: &VerifyOptions) -> VerificationVerdict {
    Verifier::new(options.clone()).verify(email)
}

/// Like [`verify_email_with_options`], but bounded by `ctx`. A verdict
/// computed while the context was cancelled or past its deadline is
/// discarded.
pub fn verify_email_with_context(
    email: &str,
    options: &VerifyOptions,
    ctx: &VerifyContext,
) -> Result<VerificationVerdict, VerifyError> {
    Verifier::new(options.clone()).verify_with_context(email, ctx)
}

/// Options bundled with a resolver, reusable across many addresses.
pub struct Verifier<R = SystemResolver> {
    options: VerifyOptions,
    resolver: R,
}

impl Verifier<SystemResolver> {
    pub fn new(options: VerifyOptions) -> Self {
        let resolver = options.system_resolver();
        Self { options, resolver }
    }
}

impl<R: DnsLookup> Verifier<R> {
    pub fn with_resolver(options: VerifyOptions, resolver: R) -> Self {
        Self { options, resolver }
    }

    pub fn options(&self) -> &VerifyOptions {
        &self.options
    }

    pub fn verify(&self, email: &str) -> VerificationVerdict {
        run_pipeline(email, &self.options, &self.resolver, &VerifyContext::unbounded())
    }

    pub fn verify_with_context(
        &self,
        email: &str,
        ctx: &VerifyContext,
    ) -> Result<VerificationVerdict, VerifyError> {
        verify_with_resolver(email, &self.options, &self.resolver, ctx)
    }
}

/// Runs the whole pipeline against `resolver`. DNS and SMTP problems are
/// folded into the verdict; `Err` only when `ctx` was cancelled or expired,
/// before or during the run.
pub fn verify_with_resolver<R>(
    email: &str,
    options: &VerifyOptions,
    resolver: &R,
    ctx: &VerifyContext,
) -> Result<VerificationVerdict, VerifyError>
where
    R: DnsLookup + ?Sized,
{
    ctx.check()?;
    let verdict = run_pipeline(email, options, resolver, ctx);
    // lookups skipped after an abort read as "no records"
    ctx.check()?;
    Ok(verdict)
}

fn run_pipeline<R>(
    email: &str,
    options: &VerifyOptions,
    resolver: &R,
    ctx: &VerifyContext,
) -> VerificationVerdict
where
    R: DnsLookup + ?Sized,
{
    let started = Instant::now();
    let address = EmailAddress::new(email);
    let verdict = match run_checks(&address, options, resolver, ctx) {
        Ok(checks) => VerificationVerdict::checked(&address, checks),
        Err(failure) => VerificationVerdict::invalid(&address, failure),
    };
    tracing::info!(
        email = %address,
        status = %verdict.status,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "verification finished"
    );
    verdict
}

fn run_checks<R>(
    address: &EmailAddress,
    options: &VerifyOptions,
    resolver: &R,
    ctx: &VerifyContext,
) -> Result<SmtpChecks, HardFailure>
where
    R: DnsLookup + ?Sized,
{
    if !is_valid_syntax(address.as_str()) {
        return Err(HardFailure::Format);
    }
    let domain = address.domain();
    if !domain_has_any_record(resolver, domain, ctx) {
        return Err(HardFailure::Domain);
    }
    let records = resolve_mx(resolver, domain, ctx);
    let preferred = preferred_exchange(&records).ok_or(HardFailure::NoMx)?;
    tracing::debug!(
        domain,
        exchange = %preferred.exchange,
        priority = preferred.priority,
        "probing preferred exchanger"
    );

    let addrs = resolve_exchange_addrs(resolver, &preferred.exchange, options.probe.port, ctx);
    let target = ProbeTarget::new(preferred.exchange.clone(), addrs);
    let (smtp_valid, is_catch_all) = run_probes(&target, address, options, ctx);

    Ok(SmtpChecks {
        smtp_valid,
        is_catch_all,
        is_role_based: is_role_based(address.as_str()),
        is_spam_trap: is_spam_trap(address.as_str()),
    })
}

/// Target probe first, then the catch-all probe; side by side when
/// `concurrent_probes` is set.
fn run_probes(
    target: &ProbeTarget,
    address: &EmailAddress,
    options: &VerifyOptions,
    ctx: &VerifyContext,
) -> (bool, bool) {
    let domain = address.domain();
    if !options.concurrent_probes {
        let smtp_valid = probe_recipient(target, address.as_str(), &options.probe, ctx).valid;
        let is_catch_all = detect_catch_all(target, domain, &options.probe, ctx);
        return (smtp_valid, is_catch_all);
    }

    thread::scope(|scope| {
        let catch_all = scope.spawn(|| detect_catch_all(target, domain, &options.probe, ctx));
        let smtp_valid = probe_recipient(target, address.as_str(), &options.probe, ctx).valid;
        let is_catch_all = catch_all.join().unwrap_or_else(|_| {
            tracing::warn!(domain, "catch-all probe thread panicked");
            false
        });
        (smtp_valid, is_catch_all)
    })
}
