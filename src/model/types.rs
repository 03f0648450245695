//! Wire and data model for the search service.

use serde::{Deserialize, Serialize};

/// Largest result count the backend accepts.
pub const MAX_K: usize = 100;

/// Default result count when none is configured.
pub const DEFAULT_K: usize = 10;

/// Similarity metric understood by the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Cosine,
    Dot,
    Euclidean,
}

impl Metric {
    pub fn label(self) -> &'static str {
        match self {
            Metric::Cosine => "cosine",
            Metric::Dot => "dot",
            Metric::Euclidean => "euclidean",
        }
    }

    /// Cycle order used by the TUI metric toggle.
    pub fn next(self) -> Self {
        match self {
            Metric::Cosine => Metric::Dot,
            Metric::Dot => Metric::Euclidean,
            Metric::Euclidean => Metric::Cosine,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cosine" => Some(Metric::Cosine),
            "dot" => Some(Metric::Dot),
            "euclidean" => Some(Metric::Euclidean),
            _ => None,
        }
    }
}

/// User-tunable search parameters. Changing either field while a query is
/// active re-issues the search immediately, bypassing the debounce delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    pub metric: Metric,
    pub k: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            metric: Metric::default(),
            k: DEFAULT_K,
        }
    }
}

impl SearchParams {
    /// Clamp `k` into the range the backend accepts (1..=100).
    pub fn with_k(self, k: usize) -> Self {
        Self {
            k: k.clamp(1, MAX_K),
            ..self
        }
    }
}

/// Body of `POST /search`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub k: usize,
    pub metric: Metric,
}

impl SearchRequest {
    pub fn new(query: &str, params: SearchParams) -> Self {
        Self {
            query: query.to_string(),
            k: params.k,
            metric: params.metric,
        }
    }
}

/// One ranked result. `id` is unique and stable across requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    pub id: String,
    pub text: String,
    pub score: f64,
}

/// Response shape shared by `POST /search` and `GET /posts`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
}

impl SearchResponse {
    /// Validate a loosely-typed JSON tree into the typed model.
    ///
    /// Raw JSON lives at the transport and cache boundaries; everything past
    /// the orchestrator works with this struct. A shape mismatch is an error,
    /// not a silently propagated untyped value.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value.clone())
    }
}
