//! Connection configuration
//!
//! The base [`ConnectionConfig`] is supplied by the caller (loaded from a
//! YAML file or assembled from CLI flags) and read-only during execution.
//! A [`ConnectionOverrides`] is the partial layer parsed from one
//! configuration block in a document; it is applied field by field on top
//! of the base without modifying it.

use crate::error::{Error, Result, ResultExt};
use crate::types::ValidityCheck;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Default endpoint when none is configured
pub const DEFAULT_ENDPOINT: &str = "http://localhost:9200";

/// Default request timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

// ============================================================================
// Auth
// ============================================================================

/// Authentication scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    /// No authentication
    #[default]
    None,
    /// HTTP Basic authentication
    Basic,
    /// `ApiKey` authorization header
    #[serde(alias = "api_key")]
    Apikey,
}

impl AuthType {
    /// Lower-case name
    pub fn as_str(self) -> &'static str {
        match self {
            AuthType::None => "none",
            AuthType::Basic => "basic",
            AuthType::Apikey => "apikey",
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(AuthType::None),
            "basic" => Ok(AuthType::Basic),
            "apikey" | "api_key" | "api-key" => Ok(AuthType::Apikey),
            other => Err(Error::invalid_value(
                "auth_type",
                format!("expected none, basic or apikey, got '{other}'"),
            )),
        }
    }
}

/// Resolved authentication settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthDescriptor {
    #[serde(rename = "type", default)]
    pub auth_type: AuthType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, alias = "apiKey", skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl AuthDescriptor {
    /// Apply an override, field by field
    pub fn merged(&self, overrides: Option<&AuthOverride>) -> AuthDescriptor {
        let Some(o) = overrides else {
            return self.clone();
        };

        AuthDescriptor {
            auth_type: o.auth_type.unwrap_or(self.auth_type),
            username: o.username.clone().or_else(|| self.username.clone()),
            password: o.password.clone().or_else(|| self.password.clone()),
            api_key: o.api_key.clone().or_else(|| self.api_key.clone()),
        }
    }
}

/// Partial authentication settings from a configuration block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthOverride {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<AuthType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, alias = "apiKey", skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl AuthOverride {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.auth_type.is_none()
            && self.username.is_none()
            && self.password.is_none()
            && self.api_key.is_none()
    }
}

// ============================================================================
// Connection Config
// ============================================================================

/// Base connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Cluster endpoint URL
    pub endpoint: String,
    /// Authentication settings
    pub auth: AuthDescriptor,
    /// Request timeout in milliseconds
    pub timeout: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            auth: AuthDescriptor::default(),
            timeout: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ConnectionConfig {
    /// Create a config for an endpoint with no authentication
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Load a config from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: ConnectionConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_yaml_str(&content)
    }

    /// Check the endpoint and auth fields for structural consistency
    pub fn validate(&self) -> Result<()> {
        check_endpoint(&self.endpoint).map_err(|e| Error::invalid_value("endpoint", e))?;
        check_auth(
            self.auth.auth_type,
            self.auth.username.as_deref(),
            self.auth.password.as_deref(),
            self.auth.api_key.as_deref(),
        )
        .map_err(|e| Error::invalid_value("auth", e))
    }

    /// Produce the effective config for one execution
    ///
    /// Each present override field replaces the matching base field.
    /// `self` is left untouched.
    pub fn with_overrides(&self, overrides: Option<&ConnectionOverrides>) -> ConnectionConfig {
        let Some(o) = overrides else {
            return self.clone();
        };

        ConnectionConfig {
            endpoint: o.endpoint.clone().unwrap_or_else(|| self.endpoint.clone()),
            auth: self.auth.merged(o.auth.as_ref()),
            timeout: o.timeout.unwrap_or(self.timeout),
        }
    }

    /// Timeout as a `Duration`
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }
}

// ============================================================================
// Overrides
// ============================================================================

/// Partial connection settings parsed from one configuration block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl ConnectionOverrides {
    /// True when the block set nothing
    pub fn is_empty(&self) -> bool {
        self.endpoint.is_none()
            && self.auth.as_ref().map_or(true, AuthOverride::is_empty)
            && self.timeout.is_none()
    }

    /// Mutable access to the auth layer, creating it on first use
    pub fn auth_mut(&mut self) -> &mut AuthOverride {
        self.auth.get_or_insert_with(AuthOverride::default)
    }
}

/// Structural validation of an override layer
///
/// Checks that the endpoint (if present) is an absolute URL and that the
/// auth fields required by the chosen auth type are present. Never touches
/// the network.
pub fn validate_connection_overrides(overrides: &ConnectionOverrides) -> ValidityCheck {
    if let Some(endpoint) = &overrides.endpoint {
        if let Err(e) = check_endpoint(endpoint) {
            return ValidityCheck::invalid(e);
        }
    }

    if let Some(auth) = &overrides.auth {
        if let Some(auth_type) = auth.auth_type {
            if let Err(e) = check_auth(
                auth_type,
                auth.username.as_deref(),
                auth.password.as_deref(),
                auth.api_key.as_deref(),
            ) {
                return ValidityCheck::invalid(e);
            }
        }
    }

    ValidityCheck::ok()
}

fn check_endpoint(endpoint: &str) -> std::result::Result<(), String> {
    match Url::parse(endpoint) {
        Ok(url) if url.has_host() => Ok(()),
        Ok(_) => Err(format!("Invalid endpoint URL '{endpoint}': missing host")),
        Err(e) => Err(format!("Invalid endpoint URL '{endpoint}': {e}")),
    }
}

fn check_auth(
    auth_type: AuthType,
    username: Option<&str>,
    password: Option<&str>,
    api_key: Option<&str>,
) -> std::result::Result<(), String> {
    let present = |v: Option<&str>| v.is_some_and(|s| !s.is_empty());

    match auth_type {
        AuthType::None => Ok(()),
        AuthType::Basic if present(username) && present(password) => Ok(()),
        AuthType::Basic => {
            Err("Basic authentication requires both username and password".to_string())
        }
        AuthType::Apikey if present(api_key) => Ok(()),
        AuthType::Apikey => Err("API key authentication requires an API key".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn basic_override(username: Option<&str>, password: Option<&str>) -> ConnectionOverrides {
        ConnectionOverrides {
            auth: Some(AuthOverride {
                auth_type: Some(AuthType::Basic),
                username: username.map(String::from),
                password: password.map(String::from),
                api_key: None,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = ConnectionConfig::default();
        assert_eq!(config.endpoint, "http://localhost:9200");
        assert_eq!(config.auth.auth_type, AuthType::None);
        assert_eq!(config.timeout, 30_000);
        assert_eq!(config.timeout_duration(), Duration::from_secs(30));
    }

    #[test]
    fn test_auth_type_from_str() {
        assert_eq!("BASIC".parse::<AuthType>().unwrap(), AuthType::Basic);
        assert_eq!("api_key".parse::<AuthType>().unwrap(), AuthType::Apikey);
        assert!("kerberos".parse::<AuthType>().is_err());
    }

    #[test]
    fn test_basic_requires_username_and_password() {
        let check = validate_connection_overrides(&basic_override(Some("a"), None));
        assert!(!check.valid);
        assert!(check.error.unwrap().contains("username and password"));

        let check = validate_connection_overrides(&basic_override(Some("a"), Some("b")));
        assert!(check.valid);
        assert!(check.error.is_none());
    }

    #[test]
    fn test_apikey_requires_key() {
        let mut overrides = ConnectionOverrides::default();
        overrides.auth_mut().auth_type = Some(AuthType::Apikey);
        let check = validate_connection_overrides(&overrides);
        assert!(!check.valid);
        assert!(check.error.unwrap().contains("API key"));

        overrides.auth_mut().api_key = Some("k".to_string());
        assert!(validate_connection_overrides(&overrides).valid);
    }

    #[test]
    fn test_endpoint_must_be_absolute_url() {
        let overrides = ConnectionOverrides {
            endpoint: Some("localhost:9200/path".to_string()),
            ..Default::default()
        };
        // "localhost:" parses as a scheme with no host
        assert!(!validate_connection_overrides(&overrides).valid);

        let overrides = ConnectionOverrides {
            endpoint: Some("/relative".to_string()),
            ..Default::default()
        };
        let check = validate_connection_overrides(&overrides);
        assert!(!check.valid);
        assert!(check.error.unwrap().contains("Invalid endpoint URL"));

        let overrides = ConnectionOverrides {
            endpoint: Some("https://search.example.com:9200".to_string()),
            ..Default::default()
        };
        assert!(validate_connection_overrides(&overrides).valid);
    }

    #[test]
    fn test_empty_overrides_are_valid() {
        let overrides = ConnectionOverrides::default();
        assert!(overrides.is_empty());
        assert!(validate_connection_overrides(&overrides).valid);
    }

    #[test]
    fn test_with_overrides_is_field_level_and_non_destructive() {
        let base = ConnectionConfig {
            endpoint: "http://base:9200".to_string(),
            auth: AuthDescriptor {
                auth_type: AuthType::Basic,
                username: Some("admin".to_string()),
                password: Some("secret".to_string()),
                api_key: None,
            },
            timeout: 1000,
        };
        let overrides = ConnectionOverrides {
            timeout: Some(5000),
            auth: Some(AuthOverride {
                password: Some("other".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let effective = base.with_overrides(Some(&overrides));
        assert_eq!(effective.endpoint, "http://base:9200");
        assert_eq!(effective.timeout, 5000);
        assert_eq!(effective.auth.auth_type, AuthType::Basic);
        assert_eq!(effective.auth.username.as_deref(), Some("admin"));
        assert_eq!(effective.auth.password.as_deref(), Some("other"));

        // base unchanged
        assert_eq!(base.timeout, 1000);
        assert_eq!(base.auth.password.as_deref(), Some("secret"));
        assert_eq!(base.with_overrides(None), base);
    }

    #[test]
    fn test_from_yaml_str() {
        let yaml = r"
endpoint: https://search.example.com
auth:
  type: apikey
  api_key: abc
timeout: 5000
";
        let config = ConnectionConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.endpoint, "https://search.example.com");
        assert_eq!(config.auth.auth_type, AuthType::Apikey);
        assert_eq!(config.auth.api_key.as_deref(), Some("abc"));
        assert_eq!(config.timeout, 5000);
    }

    #[test]
    fn test_from_yaml_str_applies_defaults_and_validates() {
        let config = ConnectionConfig::from_yaml_str("timeout: 10").unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);

        let err = ConnectionConfig::from_yaml_str("endpoint: not a url").unwrap_err();
        assert!(err.to_string().contains("endpoint"));

        let err = ConnectionConfig::from_yaml_str("auth:\n  type: basic\n  username: u").unwrap_err();
        assert!(err.to_string().contains("username and password"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "endpoint: http://127.0.0.1:9200").unwrap();
        let config = ConnectionConfig::from_file(file.path()).unwrap();
        assert_eq!(config.endpoint, "http://127.0.0.1:9200");

        let err = ConnectionConfig::from_file("/nonexistent/docquery.yaml").unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
