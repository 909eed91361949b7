//! Best-effort persistence
//!
//! A board operation has already happened once it commits in memory. Saving
//! it is infrastructure: a failed save is logged and the caller carries on
//! with the in-memory board.
//!
//! Never use this for loading a board or for the operations themselves.

use pat_core::Result;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Base delay between retries; attempt `n` waits `n` times this
const RETRY_DELAY: Duration = Duration::from_millis(50);

/// Run `f` up to `attempts` times with a growing delay
///
/// The last failure is logged with `warn!` and `None` is returned instead.
pub async fn fail_open_with_retries<F, Fut, T>(
    operation_name: &str,
    mut f: F,
    attempts: usize,
) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = attempts.max(1);
    for attempt in 1..=attempts {
        match f().await {
            Ok(val) => return Some(val),
            Err(e) if attempt == attempts => {
                warn!(
                    "{} failed after {} attempts (fail-open): {}",
                    operation_name, attempts, e
                );
            }
            Err(e) => {
                warn!(
                    "{} failed (attempt {}/{}): {}",
                    operation_name, attempt, attempts, e
                );
                tokio::time::sleep(RETRY_DELAY * attempt as u32).await;
            }
        }
    }
    None
}
