//! Bounded polling for page state that materializes late.

use std::future::Future;
use std::time::Duration;

/// Poll `probe` until it yields a value or `timeout` elapses.
///
/// The probe runs at least once, so a zero timeout still observes
/// state that is already present. Returns `None` on timeout.
pub async fn wait_until<T, F, Fut>(timeout: Duration, interval: Duration, mut probe: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if let Some(found) = probe().await {
            return Some(found);
        }
        if tokio::time::Instant::now() >= deadline {
            return None;
        }
        tokio::time::sleep(interval).await;
    }
}
