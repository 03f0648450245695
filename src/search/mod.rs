//! Query orchestration layer.
//!
//! - **[`cache`]**: request canonicalization and the process-lifetime
//!   response cache.
//! - **[`debounce`]**: quiescence timer collapsing typing bursts into one
//!   request.
//! - **[`orchestrator`]**: the state machine owning the in-flight-request
//!   slot and the displayed state.
//! - **[`highlight`]**: query-term emphasis for rendered results.

pub mod cache;
pub mod debounce;
pub mod highlight;
pub mod orchestrator;
