//! Stop signals and the drain deadline that follows them.

use std::future::{Future, pending};
use std::time::Duration;

use tokio::sync::oneshot;

use crate::TRACING_TARGET_SERVER_SHUTDOWN;

/// Resolves on the first Ctrl+C, or SIGTERM on unix.
///
/// A handler that cannot be installed is logged and never fires, so the
/// server keeps running on the remaining one.
pub(crate) async fn os_signal() {
    let interrupt = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                signal = "SIGINT",
                "Stop requested"
            ),
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    error = %error,
                    "Cannot listen for Ctrl+C"
                );
                pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    signal = "SIGTERM",
                    "Stop requested"
                );
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    error = %error,
                    "Cannot listen for SIGTERM"
                );
                pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = pending::<()>();

    tokio::select! {
        () = interrupt => {},
        () = terminate => {},
    }
}

/// Splits `signal` into a graceful-shutdown trigger and a deadline.
///
/// The trigger resolves with `signal` and is handed to the server. The
/// deadline resolves `drain` after the trigger fired, and never if it did
/// not.
pub(crate) fn with_deadline<S>(
    signal: S,
    drain: Duration,
) -> (impl Future<Output = ()>, impl Future<Output = ()>)
where
    S: Future<Output = ()>,
{
    let (fired_tx, fired_rx) = oneshot::channel::<()>();

    let trigger = async move {
        signal.await;
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            drain_secs = drain.as_secs(),
            "Draining in-flight requests"
        );
        let _ = fired_tx.send(());
    };

    let deadline = async move {
        match fired_rx.await {
            Ok(()) => tokio::time::sleep(drain).await,
            Err(_) => pending::<()>().await,
        }
    };

    (trigger, deadline)
}

#[cfg(test)]
mod tests {
    use std::future::ready;

    use tokio::time::timeout;

    use super::*;

    const WAIT: Duration = Duration::from_millis(50);

    #[tokio::test]
    async fn deadline_follows_the_trigger() {
        let (trigger, deadline) = with_deadline(ready(()), Duration::ZERO);

        trigger.await;
        assert!(timeout(WAIT, deadline).await.is_ok());
    }

    #[tokio::test]
    async fn deadline_waits_for_the_signal() {
        let (_trigger, deadline) = with_deadline(pending::<()>(), Duration::ZERO);
        assert!(timeout(WAIT, deadline).await.is_err());
    }

    #[tokio::test]
    async fn dropped_trigger_never_starts_the_deadline() {
        let (trigger, deadline) = with_deadline(ready(()), Duration::ZERO);

        drop(trigger);
        assert!(timeout(WAIT, deadline).await.is_err());
    }
}
