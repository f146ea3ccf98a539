//! Call-shape probing.
//!
//! Backend deployments disagree on the exact call convention for the same
//! semantic operation. Instead of hard-coding one convention, write and
//! discovery operations build an ordered [`CallShapes`] list of candidates;
//! the candidates run in sequence and the first one that executes without
//! error and yields a usable response wins. The last error is retained so
//! exhaustion can report a concrete cause.

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

use crate::error::RivetError;

type BoxedCandidate<'a, T> = Box<
    dyn FnOnce() -> Pin<Box<dyn Future<Output = Result<Option<T>, RivetError>> + Send + 'a>>
        + Send
        + 'a,
>;

/// An ordered list of call-shape candidates for one operation.
///
/// Each candidate resolves to `Ok(Some(value))` on a usable response,
/// `Ok(None)` when the call executed but returned nothing usable, or an
/// error. `Ok(None)` and errors both advance to the next candidate; only
/// errors are recorded.
pub struct CallShapes<'a, T> {
    shapes: Vec<(&'static str, BoxedCandidate<'a, T>)>,
}

/// Outcome of running every candidate without success.
#[derive(Debug)]
pub struct ExhaustedShapes {
    /// How many candidates were attempted.
    pub attempts: usize,
    /// The last error observed, if any candidate failed outright.
    pub last_error: Option<RivetError>,
}

impl<'a, T> CallShapes<'a, T> {
    /// Creates an empty candidate list.
    pub fn new() -> Self {
        CallShapes { shapes: Vec::new() }
    }

    /// Appends a named candidate. Order of insertion is order of attempt.
    #[must_use]
    pub fn shape<F, Fut>(mut self, name: &'static str, candidate: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'a,
        Fut: Future<Output = Result<Option<T>, RivetError>> + Send + 'a,
    {
        self.shapes
            .push((name, Box::new(move || Box::pin(candidate()))));
        self
    }

    /// Runs the candidates in order and returns the first usable response.
    pub async fn run(self) -> Result<T, ExhaustedShapes> {
        let mut attempts = 0;
        let mut last_error = None;

        for (name, candidate) in self.shapes {
            attempts += 1;
            match candidate().await {
                Ok(Some(value)) => {
                    tracing::debug!(shape = name, "call shape accepted");
                    return Ok(value);
                }
                Ok(None) => {
                    tracing::debug!(shape = name, "call shape returned nothing, trying next");
                }
                Err(e) => {
                    tracing::debug!(shape = name, error = %e, "call shape failed, trying next");
                    last_error = Some(e);
                }
            }
        }

        Err(ExhaustedShapes {
            attempts,
            last_error,
        })
    }
}

impl<'a, T> Default for CallShapes<'a, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a loose JSON response counts as usable.
///
/// Mirrors the acceptance test the backend wrappers historically applied:
/// `null`, `false`, zero, and empty strings, arrays, and objects are all
/// "no response".
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    #[tokio::test]
    async fn test_first_usable_response_wins() {
        let calls = counter();
        let (c1, c2) = (calls.clone(), calls.clone());

        let result: Result<u32, _> = CallShapes::new()
            .shape("first", move || async move {
                c1.fetch_add(1, Ordering::SeqCst);
                Ok(Some(7))
            })
            .shape("second", move || async move {
                c2.fetch_add(1, Ordering::SeqCst);
                Ok(Some(99))
            })
            .run()
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failures_advance_in_order() {
        let calls = counter();
        let (c1, c2, c3) = (calls.clone(), calls.clone(), calls.clone());

        let result: Result<u32, _> = CallShapes::new()
            .shape("first", move || async move {
                c1.fetch_add(1, Ordering::SeqCst);
                Err(RivetError::validation("nope"))
            })
            .shape("second", move || async move {
                c2.fetch_add(1, Ordering::SeqCst);
                Err(RivetError::validation("still nope"))
            })
            .shape("third", move || async move {
                c3.fetch_add(1, Ordering::SeqCst);
                Ok(Some(3))
            })
            .run()
            .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_empty_response_advances_without_error() {
        let result: Result<u32, _> = CallShapes::new()
            .shape("empty", || async { Ok(None) })
            .shape("usable", || async { Ok(Some(1)) })
            .run()
            .await;

        assert_eq!(result.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_exhaustion_retains_last_error() {
        let result: Result<u32, _> = CallShapes::new()
            .shape("first", || async { Err(RivetError::validation("first error")) })
            .shape("empty", || async { Ok(None) })
            .shape("last", || async { Err(RivetError::validation("last error")) })
            .run()
            .await;

        let exhausted = result.unwrap_err();
        assert_eq!(exhausted.attempts, 3);
        let last = exhausted.last_error.expect("last error retained");
        assert!(last.to_string().contains("last error"));
    }

    #[tokio::test]
    async fn test_exhaustion_with_no_candidates() {
        let result: Result<u32, _> = CallShapes::new().run().await;
        let exhausted = result.unwrap_err();
        assert_eq!(exhausted.attempts, 0);
        assert!(exhausted.last_error.is_none());
    }

    #[test]
    fn test_is_truthy() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&Value::Bool(false)));
        assert!(!is_truthy(&serde_json::json!(0)));
        assert!(!is_truthy(&serde_json::json!("")));
        assert!(!is_truthy(&serde_json::json!([])));
        assert!(!is_truthy(&serde_json::json!({})));

        assert!(is_truthy(&Value::Bool(true)));
        assert!(is_truthy(&serde_json::json!(1)));
        assert!(is_truthy(&serde_json::json!("x")));
        assert!(is_truthy(&serde_json::json!([0])));
        assert!(is_truthy(&serde_json::json!({"id": 1})));
    }
}
