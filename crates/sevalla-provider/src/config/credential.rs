//! Credential resolution
//!
//! Values come from explicit configuration first and the process environment
//! second. Empty strings count as unset at both levels.

use std::env;

/// Environment variable holding the API token
pub const TOKEN_ENV: &str = "SEVALLA_TOKEN";

/// Environment variable overriding the API endpoint
pub const BASE_URL_ENV: &str = "SEVALLA_BASE_URL";

/// Resolve a setting from an explicit value, then an environment variable
pub fn resolve(explicit: Option<&str>, env_var: &str) -> Option<String> {
    if let Some(value) = explicit.map(str::trim).filter(|v| !v.is_empty()) {
        return Some(value.to_string());
    }

    env::var(env_var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Mask a secret for display, keeping only the last four characters
pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_explicit_value_wins() {
        unsafe {
            env::set_var("SEVALLA_TEST_CREDENTIAL", "from-env");
        }
        assert_eq!(
            resolve(Some("explicit"), "SEVALLA_TEST_CREDENTIAL").as_deref(),
            Some("explicit")
        );
        unsafe {
            env::remove_var("SEVALLA_TEST_CREDENTIAL");
        }
    }

    #[test]
    #[serial]
    fn test_env_fallback() {
        unsafe {
            env::set_var("SEVALLA_TEST_CREDENTIAL", "from-env");
        }
        assert_eq!(
            resolve(None, "SEVALLA_TEST_CREDENTIAL").as_deref(),
            Some("from-env")
        );
        assert_eq!(
            resolve(Some(""), "SEVALLA_TEST_CREDENTIAL").as_deref(),
            Some("from-env")
        );
        unsafe {
            env::remove_var("SEVALLA_TEST_CREDENTIAL");
        }
    }

    #[test]
    #[serial]
    fn test_empty_everywhere_is_unset() {
        unsafe {
            env::set_var("SEVALLA_TEST_CREDENTIAL", "  ");
        }
        assert_eq!(resolve(Some(""), "SEVALLA_TEST_CREDENTIAL"), None);
        unsafe {
            env::remove_var("SEVALLA_TEST_CREDENTIAL");
        }
        assert_eq!(resolve(None, "SEVALLA_TEST_CREDENTIAL"), None);
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask("short"), "****");
        assert_eq!(mask("sk_live_abcdef123456"), "****3456");
    }
}
