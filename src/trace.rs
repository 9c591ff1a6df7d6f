//! Task-local trace context.
//!
//! The trace id correlating all log lines and responses for one inbound
//! request lives in a tokio task-local slot. The pipeline opens a fresh
//! [`scope`] per request, so concurrent requests on the same runtime can
//! never observe or clobber each other's ids. The empty string is the
//! "unset" sentinel; the value is never absent inside a scope.

use std::cell::RefCell;
use std::future::Future;

use uuid::Uuid;

tokio::task_local! {
    static TRACE_ID: RefCell<String>;
}

/// Opaque token returned by [`set_trace_id`], holding the value that was
/// active before the call. Feed it back to [`reset_trace_id`] to restore.
#[derive(Debug)]
#[must_use = "dropping the token without reset_trace_id leaks the previous trace id"]
pub struct TraceToken(String);

/// Get the trace id of the current request.
///
/// Returns the empty string when called outside a trace scope or before
/// [`set_trace_id`] has run.
pub fn get_trace_id() -> String {
    TRACE_ID
        .try_with(|id| id.borrow().clone())
        .unwrap_or_default()
}

/// Set the current trace id, generating a UUID v4 when `trace_id` is `None`
/// or empty. Returns a token that restores the previous value.
///
/// Only effective inside a [`scope`]; outside one the call is a no-op and
/// the returned token restores nothing.
pub fn set_trace_id(trace_id: Option<String>) -> TraceToken {
    let next = trace_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let prev = TRACE_ID
        .try_with(|id| id.replace(next))
        .unwrap_or_default();
    TraceToken(prev)
}

/// Restore the trace id that was active before the matching
/// [`set_trace_id`] call.
pub fn reset_trace_id(token: TraceToken) {
    let _ = TRACE_ID.try_with(|id| {
        *id.borrow_mut() = token.0;
    });
}

/// Run `fut` inside a fresh, unset trace scope.
///
/// The pipeline wraps every request in one of these. Because the slot lives
/// in the scoped future itself, teardown is guaranteed even when the
/// request future is cancelled mid-await.
pub async fn scope<F: Future>(fut: F) -> F::Output {
    TRACE_ID.scope(RefCell::new(String::new()), fut).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unset_reads_as_empty() {
        scope(async {
            assert_eq!(get_trace_id(), "");
        })
        .await;
    }

    #[tokio::test]
    async fn set_then_get_roundtrips() {
        scope(async {
            let token = set_trace_id(Some("abc-123".to_string()));
            assert_eq!(get_trace_id(), "abc-123");
            reset_trace_id(token);
            assert_eq!(get_trace_id(), "");
        })
        .await;
    }

    #[tokio::test]
    async fn empty_value_generates_uuid() {
        scope(async {
            let token = set_trace_id(Some(String::new()));
            let id = get_trace_id();
            assert!(Uuid::parse_str(&id).is_ok());
            reset_trace_id(token);
        })
        .await;
    }

    #[tokio::test]
    async fn generated_ids_are_unique() {
        let first = scope(async {
            let _token = set_trace_id(None);
            get_trace_id()
        })
        .await;
        let second = scope(async {
            let _token = set_trace_id(None);
            get_trace_id()
        })
        .await;
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn nested_set_restores_outer_value() {
        scope(async {
            let outer = set_trace_id(Some("outer".to_string()));
            let inner = set_trace_id(Some("inner".to_string()));
            assert_eq!(get_trace_id(), "inner");
            reset_trace_id(inner);
            assert_eq!(get_trace_id(), "outer");
            reset_trace_id(outer);
        })
        .await;
    }

    #[tokio::test]
    async fn scopes_are_isolated_across_tasks() {
        let a = tokio::spawn(scope(async {
            let _token = set_trace_id(Some("task-a".to_string()));
            tokio::task::yield_now().await;
            get_trace_id()
        }));
        let b = tokio::spawn(scope(async {
            let _token = set_trace_id(Some("task-b".to_string()));
            tokio::task::yield_now().await;
            get_trace_id()
        }));
        assert_eq!(a.await.unwrap(), "task-a");
        assert_eq!(b.await.unwrap(), "task-b");
    }

    #[test]
    fn outside_scope_is_a_noop() {
        assert_eq!(get_trace_id(), "");
        let token = set_trace_id(Some("ignored".to_string()));
        assert_eq!(get_trace_id(), "");
        reset_trace_id(token);
    }
}
