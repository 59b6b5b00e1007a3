//! DNS presence and MX resolution.
//!
//! Every lookup here degrades to a negative answer instead of failing: a flaky
//! resolver must never abort a verification.

mod error;
mod resolver;
mod types;

pub use error::DnsError;
pub use resolver::{
    DnsLookup, SystemResolver, check_mx, domain_has_any_record, resolve_exchange_addrs,
    resolve_mx,
};
pub use types::{MxRecord, preferred_exchange};

#[cfg(test)]
pub(crate) mod tests;
