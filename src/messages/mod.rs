//! Message types for inter-layer communication in the actor-based architecture.
//!
//! UI events flow into the App actor, body resolutions flow back from
//! spawned tasks, and render state flows out to whatever draws it.

pub mod ui_events;
pub mod resolution;
pub mod render;

pub use ui_events::{DetailTab, UiEvent};
pub use resolution::ResolutionEvent;
pub use render::{DetailContent, DetailRender, RenderState};
