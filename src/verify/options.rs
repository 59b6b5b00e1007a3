use std::time::Duration;

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

use crate::mx::SystemResolver;
use crate::smtp_verify::ProbeOptions;

pub const DEFAULT_DNS_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_DNS_ATTEMPTS: usize = 1;

/// Controls how [`verify_email_with_options`](crate::verify_email_with_options)
/// resolves and probes.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyOptions {
    pub probe: ProbeOptions,
    /// Per-query DNS timeout handed to the resolver.
    pub dns_timeout: Duration,
    pub dns_attempts: usize,
    /// Run the target and catch-all probes side by side instead of one after
    /// the other.
    pub concurrent_probes: bool,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            probe: ProbeOptions::default(),
            dns_timeout: DEFAULT_DNS_TIMEOUT,
            dns_attempts: DEFAULT_DNS_ATTEMPTS,
            concurrent_probes: false,
        }
    }
}

impl VerifyOptions {
    pub fn with_probe(mut self, probe: ProbeOptions) -> Self {
        self.probe = probe;
        self
    }

    pub fn with_dns_timeout(mut self, timeout: Duration) -> Self {
        self.dns_timeout = timeout;
        self
    }

    pub fn concurrent(mut self, enabled: bool) -> Self {
        self.concurrent_probes = enabled;
        self
    }

    /// System resolver bounded by `dns_timeout` / `dns_attempts`.
    pub fn system_resolver(&self) -> SystemResolver {
        let timeout = if self.dns_timeout.is_zero() {
            DEFAULT_DNS_TIMEOUT
        } else {
            self.dns_timeout
        };
        SystemResolver::new(timeout, self.dns_attempts)
    }
}
