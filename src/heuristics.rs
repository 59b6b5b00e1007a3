//! Static address classification: role accounts and known spam traps.

use phf::phf_set;

use crate::validator::EmailAddress;

static ROLE_LOCAL_PARTS: phf::Set<&'static str> = phf_set! {
    "admin",
    "support",
    "info",
    "sales",
    "help",
    "contact",
};

static SPAM_TRAPS: phf::Set<&'static str> = phf_set! {
    "spamtrap@example.com",
    "testtrap@example.com",
};

/// `admin@`, `support@` and friends address a function, not a person.
pub fn is_role_based(email: &str) -> bool {
    let local = EmailAddress::new(email).local_part().to_ascii_lowercase();
    ROLE_LOCAL_PARTS.contains(local.as_str())
}

pub fn is_spam_trap(email: &str) -> bool {
    SPAM_TRAPS.contains(email.to_ascii_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn role_accounts_are_detected_case_insensitively() {
        assert!(is_role_based("Admin@example.com"));
        assert!(is_role_based("SUPPORT@example.org"));
        assert!(is_role_based("contact@sub.example.net"));
        assert!(!is_role_based("jane.doe@example.com"));
        assert!(!is_role_based("administrator@example.com"));
    }

    #[test]
    fn spam_traps_match_the_full_address() {
        assert!(is_spam_trap("spamtrap@example.com"));
        assert!(is_spam_trap("TestTrap@Example.com"));
        assert!(!is_spam_trap("spamtrap@example.org"));
        assert!(!is_spam_trap("jane.doe@example.com"));
    }

    proptest! {
        #[test]
        fn role_detection_ignores_domain(domain in "[a-z0-9-]{1,20}\\.[a-z]{2,6}") {
            let role = format!("Info@{domain}");
            let person = format!("jane.doe@{domain}");
            prop_assert!(is_role_based(&role));
            prop_assert!(!is_role_based(&person));
        }
    }
}
