//! `pipecraft serve`: runs the HTTP analysis service.

use pipecraft_server::handler::routes;
use pipecraft_server::middleware::{
    RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt,
};

use crate::TRACING_TARGET_SERVER_STARTUP;
use crate::config::ServeArgs;
use crate::server::serve_http;

pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    let ServeArgs { server, middleware } = args;

    let app = routes()
        .with_security(&middleware.cors)
        .with_observability()
        .with_recovery(&middleware.recovery);

    tracing::debug!(target: TRACING_TARGET_SERVER_STARTUP, "router assembled");
    serve_http(app, server).await?;
    Ok(())
}
