//! Typed errors for the few conditions callers may want to match on.
//!
//! Data-shape problems (bad JSON, odd query strings) are never errors here;
//! they degrade to raw text at the point of use.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InspectorError {
    /// Text could not be split into display segments of the requested size
    #[error("cannot split {len} chars into segments of size {size}")]
    ChunkBound { len: usize, size: usize },

    /// The response body source went away without delivering a body
    #[error("response body unavailable: {0}")]
    BodyUnavailable(String),

    #[error("unknown HTTP method: {0}")]
    InvalidMethod(String),
}
