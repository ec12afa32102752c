//! API credential loading.
//!
//! Both hosted services (speech recognition and feedback generation) are
//! reached with a single key supplied through the `GOOGLE_API_KEY`
//! environment variable.  The key is read once at process start; a missing
//! or empty key is startup-fatal because no evaluation cycle can complete
//! without it.

/// Environment variable holding the hosted-API key.
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// The hosted-API credential, validated to be non-empty.
///
/// The key is intentionally not `Debug`-printable through the struct's
/// fields anywhere in the codebase; never log it.
#[derive(Clone)]
pub struct ApiCredentials {
    key: String,
}

impl ApiCredentials {
    /// Wrap a raw key string. Returns `None` for empty / whitespace keys.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return None;
        }
        Some(Self { key })
    }

    /// Read the credential from [`API_KEY_VAR`].
    pub fn from_env() -> Option<Self> {
        Self::from_env_named(API_KEY_VAR)
    }

    /// Read the credential from an arbitrary environment variable
    /// (test seam).
    pub fn from_env_named(var: &str) -> Option<Self> {
        std::env::var(var).ok().and_then(Self::new)
    }

    /// The raw key, for building request URLs.
    pub fn key(&self) -> &str {
        &self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_is_rejected() {
        assert!(ApiCredentials::new("").is_none());
        assert!(ApiCredentials::new("   ").is_none());
    }

    #[test]
    fn non_empty_key_is_accepted() {
        let creds = ApiCredentials::new("AIza-test-key").expect("valid key");
        assert_eq!(creds.key(), "AIza-test-key");
    }

    #[test]
    fn missing_env_var_yields_none() {
        assert!(ApiCredentials::from_env_named("PRONOUNCE_COACH_NO_SUCH_VAR").is_none());
    }

    #[test]
    fn env_var_is_read() {
        // Unique name so parallel tests cannot race on it.
        std::env::set_var("PRONOUNCE_COACH_TEST_KEY_A", "k-123");
        let creds =
            ApiCredentials::from_env_named("PRONOUNCE_COACH_TEST_KEY_A").expect("key set");
        assert_eq!(creds.key(), "k-123");
    }
}
