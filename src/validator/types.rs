/// Domain reported when the input does not split into exactly `local@domain`.
pub const UNKNOWN_DOMAIN: &str = "unknown";

/// Raw address as received from the caller. The local part and domain are
/// derived on demand and never stored separately.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress {
    raw: String,
}

impl EmailAddress {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Text before the first `@`, or the whole input when there is none.
    pub fn local_part(&self) -> &str {
        self.raw.split('@').next().unwrap_or_default()
    }

    /// Text after the `@` when the input has exactly one, otherwise
    /// [`UNKNOWN_DOMAIN`].
    pub fn domain(&self) -> &str {
        let mut parts = self.raw.split('@');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(domain), None) => domain,
            _ => UNKNOWN_DOMAIN,
        }
    }
}

impl From<&str> for EmailAddress {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
