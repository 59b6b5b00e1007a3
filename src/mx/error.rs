use thiserror::Error;
use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};

/// DNS failures. None of these escape the public lookups: they are logged and
/// replaced by the negative answer (`false` / empty list).
#[derive(Debug, Error)]
pub enum DnsError {
    #[error("domain is empty")]
    EmptyDomain,
    #[error("domain IDNA conversion failed")]
    IdnaConversion {
        #[source]
        source: idna::Errors,
    },
    #[error("resolver unavailable")]
    ResolverUnavailable,
    #[error("{kind} lookup failed for {name}: {source}")]
    Lookup {
        kind: &'static str,
        name: String,
        #[source]
        source: ResolveError,
    },
    #[error("lookup for {name} skipped: verification aborted")]
    Aborted { name: String },
}

impl DnsError {
    pub(crate) fn idna(source: idna::Errors) -> Self {
        Self::IdnaConversion { source }
    }

    pub(crate) fn lookup(
        kind: &'static str,
        name: impl Into<String>,
        source: ResolveError,
    ) -> Self {
        Self::Lookup {
            kind,
            name: name.into(),
            source,
        }
    }

    /// NXDOMAIN / empty answers are expected outcomes, not resolver trouble.
    pub fn is_no_records(&self) -> bool {
        matches!(
            self,
            Self::Lookup { source, .. }
                if matches!(source.kind(), ResolveErrorKind::NoRecordsFound { .. })
        )
    }
}
