//! Transport seam for the search service.
//!
//! The orchestrator talks to the backend through the [`SearchBackend`] trait
//! so the state machine can be exercised against a scripted implementation in
//! tests. [`http::HttpBackend`] is the real transport.

pub mod http;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::model::types::SearchRequest;

/// Errors crossing the transport boundary.
///
/// `Status` always carries a human-readable message extracted per the error
/// contract in [`http`]; `Aborted` is internal bookkeeping and must never be
/// surfaced to the user.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx response with an extracted message.
    #[error("{message}")]
    Status { status: u16, message: String },
    /// Connect/IO failure before a status line was obtained.
    #[error("network error: {0}")]
    Transport(String),
    /// 2xx response whose body was not valid JSON.
    #[error("malformed response: {0}")]
    Decode(String),
    /// The request's cancellation token fired. Swallowed by the orchestrator.
    #[error("request aborted")]
    Aborted,
}

impl ApiError {
    pub fn is_abort(&self) -> bool {
        matches!(self, ApiError::Aborted)
    }
}

/// Cooperative cancellation flag shared between the orchestrator and a
/// request worker. Cancelling does not tear down an in-flight connection;
/// it suppresses the outcome once the call settles.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Backend operations the orchestrator needs. Implementations return the raw
/// JSON body; validation into the typed model happens at the orchestrator
/// boundary.
pub trait SearchBackend: Send + Sync + 'static {
    /// `POST /search`.
    fn search(
        &self,
        req: &SearchRequest,
        cancel: &CancelToken,
    ) -> Result<serde_json::Value, ApiError>;

    /// `GET /posts` - the unfiltered listing shown for an empty query.
    fn list_posts(&self, cancel: &CancelToken) -> Result<serde_json::Value, ApiError>;

    /// `GET /health`. Default implementation reports the endpoint unreachable;
    /// only the HTTP transport overrides it.
    fn health(&self) -> Result<(), ApiError> {
        Err(ApiError::Transport("health probe unsupported".to_string()))
    }
}
