use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use trust_dns_resolver::Resolver;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};

use crate::context::VerifyContext;

use super::{DnsError, MxRecord};

/// DNS queries needed by the verification pipeline.
///
/// Implemented for the blocking `trust-dns` [`Resolver`]; tests and callers
/// with their own caching layer can plug in anything else.
pub trait DnsLookup {
    fn lookup_ip(&self, name: &str) -> Result<Vec<IpAddr>, DnsError>;
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, DnsError>;
}

impl DnsLookup for Resolver {
    fn lookup_ip(&self, name: &str) -> Result<Vec<IpAddr>, DnsError> {
        let lookup = Resolver::lookup_ip(self, name)
            .map_err(|err| DnsError::lookup("A/AAAA", name, err))?;
        Ok(lookup.iter().collect())
    }

    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, DnsError> {
        let lookup =
            Resolver::mx_lookup(self, domain).map_err(|err| DnsError::lookup("MX", domain, err))?;
        let mut records = Vec::new();
        for mx in lookup.iter() {
            let exchange = normalize_exchange(mx.exchange().to_utf8());
            records.push(MxRecord::new(mx.preference(), exchange));
        }
        Ok(records)
    }
}

/// Resolver built from the system configuration with bounded timeouts.
///
/// Construction never fails: when no resolver can be built every lookup
/// reports [`DnsError::ResolverUnavailable`].
pub struct SystemResolver {
    inner: Option<Resolver>,
}

impl SystemResolver {
    pub fn new(timeout: Duration, attempts: usize) -> Self {
        let inner = match build_resolver(timeout, attempts) {
            Ok(resolver) => Some(resolver),
            Err(err) => {
                tracing::warn!(error = %err, "DNS resolver initialization failed");
                None
            }
        };
        Self { inner }
    }

    fn resolver(&self) -> Result<&Resolver, DnsError> {
        self.inner.as_ref().ok_or(DnsError::ResolverUnavailable)
    }
}

impl DnsLookup for SystemResolver {
    fn lookup_ip(&self, name: &str) -> Result<Vec<IpAddr>, DnsError> {
        DnsLookup::lookup_ip(self.resolver()?, name)
    }

    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, DnsError> {
        DnsLookup::lookup_mx(self.resolver()?, domain)
    }
}

fn build_resolver(timeout: Duration, attempts: usize) -> std::io::Result<Resolver> {
    let (config, mut opts) = match trust_dns_resolver::system_conf::read_system_conf() {
        Ok(pair) => pair,
        Err(err) => {
            tracing::warn!(error = %err, "system DNS configuration unreadable, using defaults");
            (ResolverConfig::default(), ResolverOpts::default())
        }
    };
    opts.timeout = timeout;
    opts.attempts = attempts.max(1);
    Resolver::new(config, opts)
}

/// Lookup MX records for `domain`, sorted by priority.
///
/// Unlike [`resolve_mx`] the failure is returned to the caller.
pub fn check_mx(domain: &str, timeout: Duration) -> Result<Vec<MxRecord>, DnsError> {
    let resolver = SystemResolver::new(timeout, 1);
    try_resolve_mx(&resolver, domain, &VerifyContext::unbounded())
}

/// True when `domain` has address records, or failing that MX records.
/// Every resolver error is logged and reported as `false`.
pub fn domain_has_any_record<R>(resolver: &R, domain: &str, ctx: &VerifyContext) -> bool
where
    R: DnsLookup + ?Sized,
{
    match try_domain_presence(resolver, domain, ctx) {
        Ok(present) => present,
        Err(err) => {
            log_swallowed(&err);
            false
        }
    }
}

/// MX records of `domain` in ascending priority, ties in answer order.
/// Empty on any failure.
pub fn resolve_mx<R>(resolver: &R, domain: &str, ctx: &VerifyContext) -> Vec<MxRecord>
where
    R: DnsLookup + ?Sized,
{
    match try_resolve_mx(resolver, domain, ctx) {
        Ok(records) => records,
        Err(err) => {
            log_swallowed(&err);
            Vec::new()
        }
    }
}

/// Socket addresses for a mail exchanger. IP literals skip DNS.
pub fn resolve_exchange_addrs<R>(
    resolver: &R,
    exchange: &str,
    port: u16,
    ctx: &VerifyContext,
) -> Vec<SocketAddr>
where
    R: DnsLookup + ?Sized,
{
    if let Ok(ip) = exchange.parse::<IpAddr>() {
        return vec![SocketAddr::new(ip, port)];
    }
    let lookup = guard(ctx, exchange).and_then(|()| resolver.lookup_ip(exchange));
    match lookup {
        Ok(ips) => ips.into_iter().map(|ip| SocketAddr::new(ip, port)).collect(),
        Err(err) => {
            log_swallowed(&err);
            Vec::new()
        }
    }
}

fn try_domain_presence<R>(
    resolver: &R,
    domain: &str,
    ctx: &VerifyContext,
) -> Result<bool, DnsError>
where
    R: DnsLookup + ?Sized,
{
    let ascii = normalize_domain(domain)?;
    guard(ctx, &ascii)?;
    match resolver.lookup_ip(&ascii) {
        Ok(addrs) if !addrs.is_empty() => return Ok(true),
        Ok(_) => {}
        Err(err) if err.is_no_records() => {}
        Err(err) => return Err(err),
    }
    guard(ctx, &ascii)?;
    match resolver.lookup_mx(&ascii) {
        Ok(records) => Ok(!records.is_empty()),
        Err(err) if err.is_no_records() => Ok(false),
        Err(err) => Err(err),
    }
}

pub(crate) fn try_resolve_mx<R>(
    resolver: &R,
    domain: &str,
    ctx: &VerifyContext,
) -> Result<Vec<MxRecord>, DnsError>
where
    R: DnsLookup + ?Sized,
{
    let ascii = normalize_domain(domain)?;
    guard(ctx, &ascii)?;
    let mut records = resolver.lookup_mx(&ascii)?;
    // null MX (RFC 7505) names no exchanger at all
    records.retain(|record| !record.exchange.is_empty());
    records.sort_by_key(|record| record.priority);
    Ok(records)
}

fn guard(ctx: &VerifyContext, name: &str) -> Result<(), DnsError> {
    ctx.check().map_err(|_| DnsError::Aborted {
        name: name.to_string(),
    })
}

fn log_swallowed(err: &DnsError) {
    if err.is_no_records() || matches!(err, DnsError::Aborted { .. }) {
        tracing::debug!(error = %err, "DNS lookup yielded nothing");
    } else {
        tracing::warn!(error = %err, "DNS lookup failed");
    }
}

pub(crate) fn normalize_domain(domain: &str) -> Result<String, DnsError> {
    let trimmed = domain.trim();
    if trimmed.is_empty() {
        return Err(DnsError::EmptyDomain);
    }
    idna::domain_to_ascii(trimmed).map_err(DnsError::idna)
}

pub(crate) fn normalize_exchange(exchange: String) -> String {
    let trimmed = exchange.trim_end_matches('.');
    trimmed.to_ascii_lowercase()
}
