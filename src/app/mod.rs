//! App layer - central state management and command processing
//!
//! The App actor receives UI events and resolved response bodies,
//! updates state, and emits render state.

pub mod state;
pub mod actor;
pub mod commands;
pub mod store;
pub mod matching;
pub mod detail;

pub use state::AppState;
pub use actor::AppActor;
pub use store::{Action, SearchState, SearchStore};
pub use detail::DetailView;
