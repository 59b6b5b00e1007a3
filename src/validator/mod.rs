mod types;

pub use types::{EmailAddress, UNKNOWN_DOMAIN};

use std::sync::LazyLock;

use regex::Regex;

/// `local@domain.tld`: ASCII letters/digits/`._-` before the `@`,
/// letters/digits/`.-` after it, and an alphabetic TLD of two or more letters.
const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("EMAIL_PATTERN is a valid regex"));

/// Checks `email` against the fixed address pattern. Never touches the network.
pub fn is_valid_syntax(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}
