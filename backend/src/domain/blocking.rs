//! Offload CPU-bound work (password hashing) from the async workers.

use super::{Error, TraceId};

/// Run `task` on Tokio's blocking pool, keeping the caller's trace id in
/// scope so errors raised inside stay correlated.
pub(crate) async fn run_blocking<F, T>(task: F) -> Result<T, Error>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let trace_id = TraceId::current();
    tokio::task::spawn_blocking(move || match trace_id {
        Some(id) => TraceId::sync_scope(id, task),
        None => task(),
    })
    .await
    .map_err(|error| Error::internal(format!("blocking task failed: {error}")))
}
