//! Interrupt handling for batch runs.
//!
//! The first interrupt asks the batch to stop scheduling files while
//! in-flight requests finish. A second interrupt force-quits.

use std::future::Future;

use tracing::{error, warn};

use crate::generator::CancellationFlag;

/// Exit code used for a forced quit (128 + SIGINT)
pub const FORCE_EXIT_CODE: i32 = 130;

/// Watch for interrupts, cancelling on the first and calling `force_exit`
/// on the second.
///
/// `next_signal` resolves once per interrupt; pass `tokio::signal::ctrl_c`
/// in production.
pub async fn watch_interrupts<S, Fut, X>(mut next_signal: S, cancel: CancellationFlag, force_exit: X)
where
    S: FnMut() -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
    X: FnOnce(),
{
    if let Err(e) = next_signal().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        return;
    }
    warn!("Interrupted; finishing in-flight files (press Ctrl+C again to quit)");
    cancel.cancel();

    if next_signal().await.is_ok() {
        warn!("Interrupted twice; quitting");
        force_exit();
    }
}
