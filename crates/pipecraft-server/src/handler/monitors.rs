//! Service banner returned from the root route.

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use serde::{Deserialize, Serialize};

use crate::extract::Json;
use crate::handler::Result;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "pipecraft_server::handler::monitors";

/// Message identifying the service.
pub const SERVICE_BANNER: &str = "Pipecraft analysis API";

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerResponse {
    /// Human-readable service name.
    pub message: String,
}

#[tracing::instrument(skip_all)]
async fn banner() -> Result<(StatusCode, Json<BannerResponse>)> {
    tracing::trace!(target: TRACING_TARGET, "service banner requested");

    let response = BannerResponse {
        message: SERVICE_BANNER.to_owned(),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Returns a [`Router`] with the root route.
pub fn routes() -> Router {
    Router::new().route("/", get(banner))
}
