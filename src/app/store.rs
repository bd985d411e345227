//! Search/filter store.
//!
//! State is an immutable [`SearchState`] snapshot. Writes go through
//! [`Action`]s: each one produces a whole new snapshot that replaces the old
//! one, so readers never see a half-applied filter. The active flag is
//! recomputed from the filter on every write.

use std::sync::Arc;
use tokio::sync::watch;

use crate::models::Filter;

/// Current search text and filter
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchState {
    pub search: String,
    pub filter: Filter,
    pub filter_active: bool,
}

/// The only ways to change a [`SearchState`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Replace the search text verbatim
    SetSearch(String),
    /// Replace the whole filter; fields are not merged
    SetFilter(Filter),
    /// Back to no criteria
    ClearFilter,
}

impl SearchState {
    pub fn reduce(&self, action: Action) -> SearchState {
        match action {
            Action::SetSearch(search) => SearchState {
                search,
                ..self.clone()
            },
            Action::SetFilter(filter) => SearchState {
                search: self.search.clone(),
                filter_active: filter.is_active(),
                filter,
            },
            Action::ClearFilter => SearchState {
                search: self.search.clone(),
                filter: Filter::default(),
                filter_active: false,
            },
        }
    }
}

/// Single-writer cell holding the current [`SearchState`]
pub struct SearchStore {
    current: watch::Sender<Arc<SearchState>>,
}

impl Default for SearchStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchStore {
    pub fn new() -> Self {
        let (current, _) = watch::channel(Arc::new(SearchState::default()));
        SearchStore { current }
    }

    pub fn dispatch(&mut self, action: Action) -> Arc<SearchState> {
        tracing::debug!(?action, "Search store action");
        let next = Arc::new(self.current.borrow().reduce(action));
        self.current.send_replace(next.clone());
        next
    }

    pub fn set_search(&mut self, text: impl Into<String>) -> Arc<SearchState> {
        self.dispatch(Action::SetSearch(text.into()))
    }

    pub fn set_filter(&mut self, filter: Filter) -> Arc<SearchState> {
        self.dispatch(Action::SetFilter(filter))
    }

    pub fn clear_filter(&mut self) -> Arc<SearchState> {
        self.dispatch(Action::ClearFilter)
    }

    pub fn current(&self) -> Arc<SearchState> {
        self.current.borrow().clone()
    }

    /// Readers observe whole snapshots only
    pub fn subscribe(&self) -> watch::Receiver<Arc<SearchState>> {
        self.current.subscribe()
    }
}
