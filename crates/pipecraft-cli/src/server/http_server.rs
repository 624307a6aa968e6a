//! HTTP server startup.

use std::future::{Future, IntoFuture};
use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::server::lifecycle::serve_with_shutdown;
use crate::server::{ServerError, ServerResult, os_signal, with_deadline};
use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};

/// Starts an HTTP server that stops on Ctrl+C or SIGTERM.
///
/// After the signal, in-flight requests get at most the configured
/// shutdown timeout to complete before the server stops.
///
/// # Errors
///
/// Returns an error if:
/// - Server configuration is invalid
/// - Cannot bind to the specified address/port
/// - Server encounters a fatal error during operation
pub async fn serve_http(app: Router, server_config: ServerConfig) -> ServerResult<()> {
    serve_until(app, server_config, os_signal()).await
}

/// Like [`serve_http`], stopping when `signal` resolves instead.
pub(crate) async fn serve_until<S>(
    app: Router,
    server_config: ServerConfig,
    signal: S,
) -> ServerResult<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    if let Err(validation_error) = server_config.validate() {
        tracing::error!(
            target: TRACING_TARGET_SERVER_STARTUP,
            error = %validation_error,
            "Invalid server configuration"
        );
        return Err(ServerError::invalid_config(&validation_error));
    }

    let server_addr = server_config.server_addr();
    let listener = match TcpListener::bind(server_addr).await {
        Ok(listener) => listener,
        Err(listener_err) => {
            tracing::error!(
                target: TRACING_TARGET_SERVER_STARTUP,
                addr = %server_addr,
                error = %listener_err,
                "Failed to bind to address"
            );
            return Err(ServerError::bind_error(server_addr, listener_err));
        }
    };

    let drain = server_config.shutdown_timeout();
    let (trigger, deadline) = with_deadline(signal, drain);

    serve_with_shutdown(&server_config, || async move {
        let server = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(trigger)
        .into_future();

        tokio::select! {
            result = server => result,
            () = deadline => {
                tracing::warn!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    timeout_secs = drain.as_secs(),
                    "Shutdown timeout elapsed, dropping remaining connections"
                );
                Ok(())
            }
        }
    })
    .await
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn invalid_config_is_rejected_before_binding() {
        let config = ServerConfig {
            port: 80,
            ..ServerConfig::default()
        };

        let result = serve_http(Router::new(), config).await;
        assert!(matches!(result, Err(ServerError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn occupied_port_is_a_bind_error() -> anyhow::Result<()> {
        let occupied = std::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0))?;
        let config = ServerConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: occupied.local_addr()?.port(),
            ..ServerConfig::default()
        };

        // Ephemeral ports are always above 1024, so validation passes.
        let result = serve_http(Router::new(), config).await;
        assert!(matches!(result, Err(ServerError::BindError { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn stops_when_the_signal_fires() -> anyhow::Result<()> {
        let port = std::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0))?
            .local_addr()?
            .port();
        let config = ServerConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port,
            shutdown_timeout: 1,
        };

        let served = tokio::time::timeout(
            Duration::from_secs(5),
            serve_until(Router::new(), config, std::future::ready(())),
        )
        .await?;

        assert!(served.is_ok());
        Ok(())
    }
}
