//! Per-request trace id, carried in task-local storage.
//!
//! `RequestTrace` middleware opens the scope; error rendering and db error
//! mapping read it. Outside a request scope the id is `"unknown"`.

use std::future::Future;

use tokio::task_local;

const UNKNOWN: &str = "unknown";

task_local! {
    static TRACE_ID: String;
}

/// Trace id of the current task, or `"unknown"`.
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(Clone::clone)
        .unwrap_or_else(|_| UNKNOWN.to_string())
}

/// Generate a fresh trace id.
pub fn new_trace_id() -> String {
    ulid::Ulid::new().to_string()
}

/// Run `future` with `trace_id` visible to everything it awaits.
pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: Future<Output = R>,
{
    TRACE_ID.scope(trace_id, future).await
}
