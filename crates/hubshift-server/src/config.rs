//! Server settings
//!
//! Read from the process environment (after loading `.env` if present).
//! Keys are the upper-case variable names, matched case-insensitively.

use chrono::Duration;
use config::{Config, Environment};
use hubshift_core::errors::{ExError, ExErrorKind};
use hubshift_core::logging_facility::Profile;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 168;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub google_client_id: Option<String>,
    pub session_ttl_hours: i64,
    pub enable_test_endpoints: bool,
    /// Mark the session cookie `Secure`; turn off only for plain-HTTP local runs
    pub secure_cookies: bool,
    /// Built SPA; page routes fall back to a minimal shell without it
    pub static_dir: Option<PathBuf>,
    pub log_profile: String,

    pub vite_firebase_api_key: Option<String>,
    pub vite_firebase_auth_domain: Option<String>,
    pub vite_firebase_project_id: Option<String>,
    pub vite_firebase_storage_bucket: Option<String>,
    pub vite_firebase_messaging_sender_id: Option<String>,
    pub vite_firebase_app_id: Option<String>,
    pub vite_stripe_publishable_key: Option<String>,
}

/// Firebase web config as the client SDK expects it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseConfig {
    pub api_key: Option<String>,
    pub auth_domain: Option<String>,
    pub project_id: Option<String>,
    pub storage_bucket: Option<String>,
    pub messaging_sender_id: Option<String>,
    pub app_id: Option<String>,
}

/// Publishable keys handed to the browser; never carries secrets
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub firebase: FirebaseConfig,
    pub stripe_publishable_key: Option<String>,
    pub google_client_id: Option<String>,
}

fn config_error(message: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::Configuration)
        .with_op("load_settings")
        .with_message(message)
}

impl Settings {
    /// Load `.env` (if any) and read the process environment
    pub fn load() -> Result<Self, ExError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_env(Environment::default())
    }

    /// Build settings from an environment source
    ///
    /// Tests pass `Environment::default().source(Some(map))`.
    pub fn from_env(env: Environment) -> Result<Self, ExError> {
        let settings: Settings = Config::builder()
            .set_default("host", DEFAULT_HOST)
            .and_then(|b| b.set_default("port", i64::from(DEFAULT_PORT)))
            .and_then(|b| b.set_default("session_ttl_hours", DEFAULT_SESSION_TTL_HOURS))
            .and_then(|b| b.set_default("enable_test_endpoints", false))
            .and_then(|b| b.set_default("secure_cookies", true))
            .and_then(|b| b.set_default("log_profile", "development"))
            .map_err(|e| config_error(e.to_string()))?
            .add_source(env)
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| config_error(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ExError> {
        if self.database_url.trim().is_empty() {
            return Err(config_error("DATABASE_URL is empty"));
        }
        if self.session_ttl_hours <= 0 {
            return Err(config_error("SESSION_TTL_HOURS must be positive"));
        }
        self.profile()?;
        Ok(())
    }

    pub fn profile(&self) -> Result<Profile, ExError> {
        self.log_profile.parse().map_err(config_error)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::hours(self.session_ttl_hours)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ExError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| config_error(format!("invalid HOST/PORT: {}", e)))
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            firebase: FirebaseConfig {
                api_key: self.vite_firebase_api_key.clone(),
                auth_domain: self.vite_firebase_auth_domain.clone(),
                project_id: self.vite_firebase_project_id.clone(),
                storage_bucket: self.vite_firebase_storage_bucket.clone(),
                messaging_sender_id: self.vite_firebase_messaging_sender_id.clone(),
                app_id: self.vite_firebase_app_id.clone(),
            },
            stripe_publishable_key: self.vite_stripe_publishable_key.clone(),
            google_client_id: self.google_client_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::default().source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_env(env(&[("DATABASE_URL", "postgres://localhost/hubshift")]))
            .unwrap();
        assert_eq!(settings.port, DEFAULT_PORT);
        assert_eq!(settings.host, DEFAULT_HOST);
        assert_eq!(settings.session_ttl(), Duration::hours(168));
        assert!(!settings.enable_test_endpoints);
        assert!(settings.secure_cookies);
        assert_eq!(settings.profile().unwrap(), Profile::Development);
        assert!(settings.static_dir.is_none());
    }

    #[test]
    fn test_overrides_and_client_config() {
        let settings = Settings::from_env(env(&[
            ("DATABASE_URL", "postgres://db/hubshift"),
            ("PORT", "8080"),
            ("ENABLE_TEST_ENDPOINTS", "true"),
            ("SECURE_COOKIES", "false"),
            ("LOG_PROFILE", "production"),
            ("VITE_FIREBASE_PROJECT_ID", "hubshift-dev"),
            ("VITE_STRIPE_PUBLISHABLE_KEY", "pk_test_123"),
        ]))
        .unwrap();

        assert_eq!(settings.port, 8080);
        assert!(settings.enable_test_endpoints);
        assert!(!settings.secure_cookies);
        assert_eq!(settings.profile().unwrap(), Profile::Production);

        let client = settings.client_config();
        assert_eq!(client.firebase.project_id.as_deref(), Some("hubshift-dev"));
        assert_eq!(client.stripe_publishable_key.as_deref(), Some("pk_test_123"));
        assert_eq!(settings.bind_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_missing_database_url_is_configuration_error() {
        let err = Settings::from_env(env(&[])).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Configuration);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Settings::from_env(env(&[
            ("DATABASE_URL", "postgres://db/hubshift"),
            ("SESSION_TTL_HOURS", "0"),
        ]))
        .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Configuration);

        let err = Settings::from_env(env(&[
            ("DATABASE_URL", "postgres://db/hubshift"),
            ("LOG_PROFILE", "verbose"),
        ]))
        .unwrap_err();
        assert!(err.message().contains("verbose"));
    }
}
