//! Sensitive data marker
//!
//! Session tokens and identity-provider credentials travel through request
//! structs that derive `Debug`; wrapping them keeps them out of the logs.

use serde::{Deserialize, Deserializer};
use std::fmt;

/// Wrapper that redacts itself in Debug and Display
///
/// # Example
///
/// ```
/// use hubshift_core_types::Sensitive;
///
/// let token = Sensitive::new("3f9c-session-token");
/// assert_eq!(format!("{:?}", token), "***REDACTED***");
/// assert_eq!(token.expose(), &"3f9c-session-token");
/// ```
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Expose the underlying value; only where it must be used (hashing, verification)
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl<T: Clone> Clone for Sensitive<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Sensitive<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Sensitive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitive_debug_and_display_redaction() {
        let secret = Sensitive::new("google-id-token");
        assert_eq!(format!("{:?}", secret), "***REDACTED***");
        assert_eq!(format!("{}", secret), "***REDACTED***");
    }

    #[test]
    fn test_sensitive_into_inner() {
        let secret = Sensitive::new(String::from("token"));
        assert_eq!(secret.into_inner(), "token");
    }

    #[test]
    fn test_sensitive_deserializes_transparently() {
        #[derive(Debug, Deserialize)]
        struct SignIn {
            credential: Sensitive<String>,
            role: Option<String>,
        }

        let body: SignIn =
            serde_json::from_str(r#"{"credential":"eyJhbGciOi","role":"hub"}"#).unwrap();
        assert_eq!(body.credential.expose(), "eyJhbGciOi");

        let debug_str = format!("{:?}", body);
        assert!(debug_str.contains("hub"));
        assert!(!debug_str.contains("eyJhbGciOi"));
    }
}
