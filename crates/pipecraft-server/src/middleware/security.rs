//! CORS and request body limits.

use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::http::header;
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::extract::MAX_JSON_PAYLOAD_SIZE;

/// Tracing target for security configuration.
const TRACING_TARGET: &str = "pipecraft_server::middleware::security";

/// Origin of the pipeline editor during local development.
pub const DEFAULT_EDITOR_ORIGIN: &str = "http://localhost:3000";

/// Extension trait for `axum::`[`Router`] to apply security middleware.
pub trait RouterSecurityExt<S> {
    /// Layers CORS, request body limits and `X-Content-Type-Options`.
    fn with_security(self, cors: &CorsConfig) -> Self;

    /// Layers security middleware allowing only the local editor origin.
    fn with_default_security(self) -> Self;
}

impl<S> RouterSecurityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_security(self, cors: &CorsConfig) -> Self {
        let origins = cors.to_header_values();
        tracing::debug!(
            target: TRACING_TARGET,
            origins = origins.len(),
            allow_credentials = cors.allow_credentials,
            "cors configured"
        );

        // Credentials forbid wildcards, so methods and headers mirror the preflight.
        let cors_layer = CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(cors.allow_credentials)
            .max_age(cors.max_age());

        self.layer(DefaultBodyLimit::max(MAX_JSON_PAYLOAD_SIZE))
            .layer(RequestBodyLimitLayer::new(MAX_JSON_PAYLOAD_SIZE))
            .layer(cors_layer)
            .layer(SetResponseHeaderLayer::overriding(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
    }

    fn with_default_security(self) -> Self {
        self.with_security(&CorsConfig::default())
    }
}

/// CORS (Cross-Origin Resource Sharing) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct CorsConfig {
    /// List of allowed CORS origins.
    ///
    /// If empty, only the local editor origin is allowed.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "CORS_ORIGINS", value_delimiter = ',')
    )]
    pub allowed_origins: Vec<String>,

    /// Maximum age for CORS preflight requests in seconds.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "CORS_MAX_AGE", default_value = "3600")
    )]
    pub max_age_seconds: u64,

    /// Whether to allow credentials in CORS requests.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "CORS_ALLOW_CREDENTIALS", default_value = "true")
    )]
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_age_seconds: 3600,
            allow_credentials: true,
        }
    }
}

impl CorsConfig {
    /// Returns the CORS max age as a Duration.
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_seconds)
    }

    /// Converts configured origins to header values.
    ///
    /// Origins that are not valid header values are skipped. Falls back to
    /// [`DEFAULT_EDITOR_ORIGIN`] when nothing usable is configured.
    pub fn to_header_values(&self) -> Vec<HeaderValue> {
        let origins: Vec<HeaderValue> = self
            .allowed_origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin.trim()).ok())
            .collect();

        if origins.is_empty() {
            vec![HeaderValue::from_static(DEFAULT_EDITOR_ORIGIN)]
        } else {
            origins
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_allows_local_editor() {
        let origins = CorsConfig::default().to_header_values();
        assert_eq!(origins, vec![HeaderValue::from_static("http://localhost:3000")]);
    }

    #[test]
    fn configured_origins_replace_default() {
        let config = CorsConfig {
            allowed_origins: vec![
                "https://editor.example.com".to_owned(),
                " http://127.0.0.1:5173 ".to_owned(),
            ],
            ..CorsConfig::default()
        };

        let origins = config.to_header_values();
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[1], HeaderValue::from_static("http://127.0.0.1:5173"));
    }

    #[test]
    fn invalid_origins_fall_back_to_default() {
        let config = CorsConfig {
            allowed_origins: vec!["bad\norigin".to_owned()],
            ..CorsConfig::default()
        };

        assert_eq!(
            config.to_header_values(),
            vec![HeaderValue::from_static(DEFAULT_EDITOR_ORIGIN)]
        );
    }
}
