//! Resolution messages - response bodies delivered back to the App layer

/// Sent by a resolution task when an exchange's response body is ready
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionEvent {
    ResponseResolved {
        /// Generation of the detail view that asked for the body
        generation: u64,
        exchange_id: u64,
        body: String,
    },
}

impl ResolutionEvent {
    pub fn generation(&self) -> u64 {
        match self {
            ResolutionEvent::ResponseResolved { generation, .. } => *generation,
        }
    }
}
