//! Task-local trace context for web requests.
//!
//! Minimal API for accessing the current request's trace_id from anywhere in
//! the request processing pipeline. Uses Tokio's task-local storage so the
//! id survives across `.await` points without threading it through call
//! signatures. Service/domain code should not import this module; it belongs
//! to the web boundary.

use std::cell::RefCell;

use tokio::task_local;

task_local! {
    static TRACE_ID: RefCell<Option<String>>;
}

/// Get the trace_id for the current task.
/// Returns "unknown" outside of a request context.
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(|cell| {
            cell.borrow()
                .as_ref()
                .cloned()
                .unwrap_or_else(|| "unknown".to_string())
        })
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Run a future within a trace context. Used by `RequestTrace` to establish
/// the task-local scope.
pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    TRACE_ID.scope(RefCell::new(Some(trace_id)), future).await
}
