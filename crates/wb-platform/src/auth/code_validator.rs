//! Login code format check
//!
//! `AG`, `SP` or `AD` followed by a zero-padded number in 001..=999.

use regex::Regex;

use crate::user::entity::Role;

fn code_pattern() -> &'static Regex {
    static PATTERN: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(AG|SP|AD)(00[1-9]|0[1-9][0-9]|[1-9][0-9]{2})$").unwrap())
}

/// True if `code` is a well-formed login code. Case-sensitive.
pub fn is_valid_code(code: &str) -> bool {
    code_pattern().is_match(code)
}

/// Role implied by a well-formed code's prefix.
pub fn role_for_code(code: &str) -> Option<Role> {
    if !is_valid_code(code) {
        return None;
    }
    [Role::Agent, Role::Supervisor, Role::Admin]
        .into_iter()
        .find(|role| code.starts_with(role.code_prefix()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_full_range_for_every_prefix() {
        for prefix in ["AG", "SP", "AD"] {
            for n in 1..=999 {
                let code = format!("{}{:03}", prefix, n);
                assert!(is_valid_code(&code), "{} should be valid", code);
            }
        }
    }

    #[test]
    fn test_rejects_zero() {
        assert!(!is_valid_code("AG000"));
        assert!(!is_valid_code("SP000"));
        assert!(!is_valid_code("AD000"));
    }

    #[test]
    fn test_rejects_wrong_prefix_or_case() {
        assert!(!is_valid_code("XX001"));
        assert!(!is_valid_code("SV001"));
        assert!(!is_valid_code("ag001"));
        assert!(!is_valid_code("Ag001"));
        assert!(!is_valid_code("001"));
    }

    #[test]
    fn test_rejects_wrong_digit_count() {
        assert!(!is_valid_code("AG1"));
        assert!(!is_valid_code("AG01"));
        assert!(!is_valid_code("AG0001"));
        assert!(!is_valid_code("AG1000"));
        assert!(!is_valid_code("AG"));
        assert!(!is_valid_code(""));
    }

    #[test]
    fn test_rejects_surrounding_noise() {
        assert!(!is_valid_code(" AG001"));
        assert!(!is_valid_code("AG001 "));
        assert!(!is_valid_code("AG001\n"));
        assert!(!is_valid_code("AGX01"));
        assert!(!is_valid_code("AG0A1"));
        assert!(!is_valid_code("AG١٢٣"));
    }

    #[test]
    fn test_role_for_code() {
        assert_eq!(role_for_code("AG123"), Some(Role::Agent));
        assert_eq!(role_for_code("SP001"), Some(Role::Supervisor));
        assert_eq!(role_for_code("AD999"), Some(Role::Admin));
        assert_eq!(role_for_code("AD000"), None);
    }
}
