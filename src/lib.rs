//! # netscope
//!
//! An in-process inspector for captured HTTP/GraphQL traffic: search and
//! filter the live list of exchanges and drill into any one of them.
//!
//! ## Features
//! - Search by URL or GraphQL operation, filter by method, status or errors
//! - Lazily resolved response bodies that never leave a view stuck loading
//! - Query params with JSON-array values decoded for display
//! - Large bodies split into bounded segments for display
//! - cURL and full JSON snapshot export
//!
//! ## Architecture
//! Actor-based with channels:
//! - Capture side - appends to an [`ExchangeLog`]
//! - App Layer (state machine) - sole writer of search/filter state
//! - UI Layer (Ratatui) - synchronous rendering of [`RenderState`]

pub mod constants;
pub mod error;
pub mod models;
pub mod body;
pub mod query;
pub mod chunk;
pub mod curl;
pub mod share;
pub mod summary;
pub mod capture;
pub mod config;
pub mod ui;
pub mod messages;
pub mod app;

// Re-export commonly used types
pub use models::{Exchange, Filter, Headers, HttpMethod, NewExchange};
pub use error::InspectorError;
pub use body::{BodySender, BodySource, ResponseBody};
pub use capture::{CaptureHandle, ExchangeLog};
pub use chunk::{chunks, LargeText};
pub use query::decode_query;
pub use share::{FileShareSink, ShareSink};
pub use config::InspectorConfig;
pub use messages::{DetailTab, RenderState, ResolutionEvent, UiEvent};
pub use app::{Action, AppActor, AppState, DetailView, SearchState, SearchStore};
