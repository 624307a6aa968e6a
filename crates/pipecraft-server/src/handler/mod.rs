//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod error;
mod monitors;
mod pipelines;
mod response;

use axum::Router;
use axum::http::{Method, Uri};

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::monitors::{BannerResponse, SERVICE_BANNER};
pub use crate::handler::response::ErrorResponse;

/// Tracing target for unmatched requests.
const TRACING_TARGET: &str = "pipecraft_server::handler";

async fn not_found(method: Method, uri: Uri) -> Error<'static> {
    tracing::debug!(target: TRACING_TARGET, method = %method, uri = %uri, "no route matched");
    ErrorKind::NotFound.with_resource(uri.path().to_owned())
}

async fn method_not_allowed(method: Method, uri: Uri) -> Error<'static> {
    ErrorKind::MethodNotAllowed
        .with_resource(uri.path().to_owned())
        .with_context(format!("{method} is not supported"))
}

/// Returns a [`Router`] with all routes and JSON fallbacks.
pub fn routes() -> Router {
    Router::new()
        .merge(monitors::routes())
        .merge(pipelines::routes())
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
}

#[cfg(test)]
mod test {
    use axum::Router;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;

    use crate::handler::routes;

    /// Returns a new [`TestServer`] with the given router.
    pub fn create_test_server_with_router(router: Router) -> anyhow::Result<TestServer> {
        let server = TestServer::new(router)?;
        Ok(server)
    }

    /// Returns a new [`TestServer`] with all routes.
    pub fn create_test_server() -> anyhow::Result<TestServer> {
        create_test_server_with_router(routes())
    }

    #[tokio::test]
    async fn handlers() -> anyhow::Result<()> {
        let server = create_test_server()?;
        assert!(server.is_running());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_route_is_json_not_found() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server.get("/pipelines/unknown").expect_failure().await;
        response.assert_status(StatusCode::NOT_FOUND);

        let body: Value = response.json();
        assert_eq!(body["name"], "not_found");
        assert_eq!(body["resource"], "/pipelines/unknown");
        Ok(())
    }

    #[tokio::test]
    async fn wrong_method_is_json_error() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server.get("/pipelines/parse").expect_failure().await;
        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);

        let body: Value = response.json();
        assert_eq!(body["name"], "method_not_allowed");
        Ok(())
    }
}
