use std::fmt;

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

use crate::validator::EmailAddress;

use super::error::HardFailure;

pub const MSG_VALID: &str = "Email address is valid.";
pub const MSG_POTENTIALLY_VALID: &str =
    "Email address is potentially valid, but SMTP verification failed.";

#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationStatus {
    Invalid,
    PotentiallyValid,
    Valid,
}

impl VerificationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::PotentiallyValid => "potentially_valid",
            Self::Valid => "valid",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the SMTP stage and the static heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SmtpChecks {
    pub smtp_valid: bool,
    pub is_catch_all: bool,
    pub is_role_based: bool,
    pub is_spam_trap: bool,
}

/// The only thing a caller ever gets back.
///
/// The three flags are `Some` once the pipeline reached the SMTP stage and
/// `None` on early `invalid` verdicts.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationVerdict {
    pub email: String,
    pub status: VerificationStatus,
    pub message: String,
    pub account: String,
    pub domain: String,
    #[cfg_attr(
        feature = "with-serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub is_catch_all: Option<bool>,
    #[cfg_attr(
        feature = "with-serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub is_role_based: Option<bool>,
    #[cfg_attr(
        feature = "with-serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub is_spam_trap: Option<bool>,
}

impl VerificationVerdict {
    pub(crate) fn invalid(address: &EmailAddress, failure: HardFailure) -> Self {
        Self {
            email: address.as_str().to_string(),
            status: VerificationStatus::Invalid,
            message: failure.to_string(),
            account: address.local_part().to_string(),
            domain: address.domain().to_string(),
            is_catch_all: None,
            is_role_based: None,
            is_spam_trap: None,
        }
    }

    pub(crate) fn checked(address: &EmailAddress, checks: SmtpChecks) -> Self {
        let (status, message) = if checks.smtp_valid {
            (VerificationStatus::Valid, MSG_VALID)
        } else {
            (VerificationStatus::PotentiallyValid, MSG_POTENTIALLY_VALID)
        };
        Self {
            email: address.as_str().to_string(),
            status,
            message: message.to_string(),
            account: address.local_part().to_string(),
            domain: address.domain().to_string(),
            is_catch_all: Some(checks.is_catch_all),
            is_role_based: Some(checks.is_role_based),
            is_spam_trap: Some(checks.is_spam_trap),
        }
    }

    pub fn is_invalid(&self) -> bool {
        self.status == VerificationStatus::Invalid
    }
}
