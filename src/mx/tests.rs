use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::{Duration, Instant};

use trust_dns_resolver::error::ResolveError;

use super::{
    DnsError, DnsLookup, MxRecord, domain_has_any_record, preferred_exchange,
    resolve_exchange_addrs, resolve_mx, resolver,
};
use crate::context::VerifyContext;

type IpResult = Result<Vec<IpAddr>, DnsError>;
type MxResult = Result<Vec<MxRecord>, DnsError>;

/// Scripted resolver; records every queried name.
pub(crate) struct StubResolver {
    pub on_ip: Box<dyn Fn(&str) -> IpResult + Send + Sync>,
    pub on_mx: Box<dyn Fn(&str) -> MxResult + Send + Sync>,
    pub queries: std::sync::Mutex<Vec<String>>,
}

impl StubResolver {
    pub(crate) fn new<I, M>(on_ip: I, on_mx: M) -> Self
    where
        I: Fn(&str) -> IpResult + Send + Sync + 'static,
        M: Fn(&str) -> MxResult + Send + Sync + 'static,
    {
        Self {
            on_ip: Box::new(on_ip),
            on_mx: Box::new(on_mx),
            queries: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Domain with an A record and the given MX set.
    pub(crate) fn with_mx(records: Vec<MxRecord>) -> Self {
        Self::new(
            |_| Ok(vec![IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1))]),
            move |_| Ok(records.clone()),
        )
    }

    pub(crate) fn queried(&self) -> Vec<String> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }

    fn record(&self, kind: &str, name: &str) {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(format!("{kind} {name}"));
        }
    }
}

impl DnsLookup for StubResolver {
    fn lookup_ip(&self, name: &str) -> IpResult {
        self.record("ip", name);
        (self.on_ip)(name)
    }

    fn lookup_mx(&self, domain: &str) -> MxResult {
        self.record("mx", domain);
        (self.on_mx)(domain)
    }
}

pub(crate) fn lookup_failure(kind: &'static str, name: &str) -> DnsError {
    DnsError::lookup(kind, name, ResolveError::from("request timed out"))
}

#[test]
fn normalize_domain_rejects_empty() {
    let err = resolver::normalize_domain("  ").expect_err("empty domain should fail");
    assert!(matches!(err, DnsError::EmptyDomain));
}

#[test]
fn normalize_exchange_trims_dot_and_lowercases() {
    let out = resolver::normalize_exchange("Mail.EXAMPLE.com.".to_string());
    assert_eq!(out, "mail.example.com");
}

#[test]
fn domain_with_address_records_is_present() {
    let stub = StubResolver::with_mx(Vec::new());
    assert!(domain_has_any_record(
        &stub,
        "Example.COM",
        &VerifyContext::unbounded()
    ));
    assert_eq!(stub.queried(), vec!["ip example.com".to_string()]);
}

#[test]
fn domain_with_only_mx_is_present() {
    let stub = StubResolver::new(
        |_| Ok(Vec::new()),
        |_| Ok(vec![MxRecord::new(10, "mx.example.com")]),
    );
    assert!(domain_has_any_record(
        &stub,
        "example.com",
        &VerifyContext::unbounded()
    ));
}

#[test]
fn resolver_errors_are_swallowed_into_false() {
    let stub = StubResolver::new(
        |name| Err(lookup_failure("A/AAAA", name)),
        |name| Err(lookup_failure("MX", name)),
    );
    let ctx = VerifyContext::unbounded();
    assert!(!domain_has_any_record(&stub, "example.com", &ctx));
    assert!(resolve_mx(&stub, "example.com", &ctx).is_empty());
}

#[test]
fn unavailable_resolver_reports_nothing() {
    let stub = StubResolver::new(
        |_| Err(DnsError::ResolverUnavailable),
        |_| Err(DnsError::ResolverUnavailable),
    );
    let ctx = VerifyContext::unbounded();
    assert!(!domain_has_any_record(&stub, "example.com", &ctx));
    assert!(resolve_mx(&stub, "example.com", &ctx).is_empty());
}

#[test]
fn resolve_mx_orders_by_priority_keeping_ties_in_answer_order() {
    let stub = StubResolver::with_mx(vec![
        MxRecord::new(20, "mx2.example.com"),
        MxRecord::new(10, "mx1b.example.com"),
        MxRecord::new(30, "mx3.example.com"),
        MxRecord::new(10, "mx1a.example.com"),
    ]);
    let records = resolve_mx(&stub, "example.com", &VerifyContext::unbounded());
    let order: Vec<_> = records.iter().map(|r| r.exchange.as_str()).collect();
    assert_eq!(
        order,
        vec![
            "mx1b.example.com",
            "mx1a.example.com",
            "mx2.example.com",
            "mx3.example.com"
        ]
    );
}

#[test]
fn resolve_mx_drops_null_mx() {
    let stub = StubResolver::with_mx(vec![MxRecord::new(0, "")]);
    assert!(resolve_mx(&stub, "example.com", &VerifyContext::unbounded()).is_empty());
}

#[test]
fn preferred_exchange_is_lowest_priority_first_seen() {
    let records = vec![
        MxRecord::new(20, "b.example.com"),
        MxRecord::new(5, "a.example.com"),
        MxRecord::new(5, "c.example.com"),
    ];
    let preferred = preferred_exchange(&records).expect("records present");
    assert_eq!(preferred.exchange, "a.example.com");
    assert!(preferred_exchange(&[]).is_none());
}

#[test]
fn aborted_context_skips_lookups() {
    let stub = StubResolver::with_mx(vec![MxRecord::new(10, "mx.example.com")]);
    let ctx = VerifyContext::unbounded().deadline(Instant::now() - Duration::from_millis(1));
    assert!(!domain_has_any_record(&stub, "example.com", &ctx));
    assert!(resolve_mx(&stub, "example.com", &ctx).is_empty());
    assert!(resolve_exchange_addrs(&stub, "mx.example.com", 25, &ctx).is_empty());
    assert!(stub.queried().is_empty());
}

#[test]
fn exchange_ip_literal_skips_dns() {
    let stub = StubResolver::new(|_| panic!("no lookup expected"), |_| Ok(Vec::new()));
    let addrs = resolve_exchange_addrs(&stub, "127.0.0.1", 2525, &VerifyContext::unbounded());
    assert_eq!(addrs, vec![SocketAddr::from(([127, 0, 0, 1], 2525))]);
}

#[test]
fn exchange_host_is_resolved_through_the_resolver() {
    let stub = StubResolver::with_mx(Vec::new());
    let addrs = resolve_exchange_addrs(&stub, "mx.example.com", 25, &VerifyContext::unbounded());
    assert_eq!(addrs, vec![SocketAddr::from(([192, 0, 2, 1], 25))]);
    assert_eq!(stub.queried(), vec!["ip mx.example.com".to_string()]);
}
