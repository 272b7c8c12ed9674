// Interrupt handling
// First Ctrl+C stops the loop between rounds; a second one exits at once,
// even while a round is stuck on a host.

use skewer_core::application::ShutdownSender;
use std::future::Future;
use tracing::info;

/// Exit status after a forced interrupt (128 + SIGINT)
pub const EXIT_INTERRUPTED: i32 = 130;

/// Turn interrupts from `next_interrupt` into shutdown requests
///
/// Returns `Ok(())` once a second interrupt arrives; the caller is expected to
/// exit without waiting for the round in flight.
///
/// # Errors
/// Whatever the interrupt listener fails with.
pub async fn handle_interrupts<F, Fut>(
    mut next_interrupt: F,
    shutdown: ShutdownSender,
) -> std::io::Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
{
    next_interrupt().await?;
    info!("Shutdown signal received. Stopping after the current round (Ctrl+C again to exit now)...");
    shutdown.shutdown();

    next_interrupt().await
}
