//! Authorization headers
//!
//! Auth is best-effort at this layer: an incomplete descriptor produces no
//! header rather than an error. Structural checks happen in validation.

use crate::config::{AuthDescriptor, AuthType, ConnectionOverrides};
use crate::types::Headers;
use base64::Engine as _;

/// Build the auth headers for a request
///
/// Override auth fields win over the base descriptor field by field.
pub fn build_auth_headers(base: &AuthDescriptor, overrides: Option<&ConnectionOverrides>) -> Headers {
    let auth = base.merged(overrides.and_then(|o| o.auth.as_ref()));
    let mut headers = Headers::new();

    let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());

    match auth.auth_type {
        AuthType::None => {}
        AuthType::Basic => {
            if let (Some(username), Some(password)) = (non_empty(&auth.username), non_empty(&auth.password)) {
                let encoded = base64::engine::general_purpose::STANDARD
                    .encode(format!("{username}:{password}"));
                headers.insert("Authorization".to_string(), format!("Basic {encoded}"));
            }
        }
        AuthType::Apikey => {
            if let Some(key) = non_empty(&auth.api_key) {
                headers.insert("Authorization".to_string(), format!("ApiKey {key}"));
            }
        }
    }

    headers
}
