//! App state - pure data structure with no I/O logic

use std::sync::Arc;

use crate::app::detail::DetailView;
use crate::app::matching::{self, MatchOptions};
use crate::app::store::SearchStore;
use crate::capture::ExchangeLog;
use crate::config::InspectorConfig;
use crate::messages::ui_events::InputMode;
use crate::messages::RenderState;
use crate::models::Exchange;
use crate::summary::summarize;

/// Main application state - pure data, no I/O
pub struct AppState {
    // Search and filter (single writer: this state)
    pub store: SearchStore,

    // Captured exchanges, owned by the capture side
    pub log: ExchangeLog,

    pub config: InspectorConfig,
    pub options: MatchOptions,

    // List screen
    pub input_mode: InputMode,
    pub selected: usize,

    // Detail view
    pub detail: Option<DetailView>,
    pub detail_scroll: u16,
    pub next_generation: u64,

    // Popups and status bar
    pub show_help: bool,
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(log: ExchangeLog, config: InspectorConfig) -> Self {
        AppState {
            store: SearchStore::new(),
            log,
            options: config.match_options(),
            config,
            input_mode: InputMode::Normal,
            selected: 0,
            detail: None,
            detail_scroll: 0,
            next_generation: 1,
            show_help: false,
            status_message: None,
        }
    }

    /// Generate a fresh detail-view generation
    pub fn next_generation(&mut self) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        generation
    }

    /// Exchanges matching the current search and filter, in capture order
    pub fn visible(&self) -> Vec<Arc<Exchange>> {
        let state = self.store.current();
        matching::visible(&self.log.snapshot(), &state, self.options)
    }

    /// The highlighted exchange; the index is clamped the same way the
    /// list renders it
    pub fn selected_exchange(&self) -> Option<Arc<Exchange>> {
        let visible = self.visible();
        let index = self.selected.min(visible.len().saturating_sub(1));
        visible.get(index).cloned()
    }

    /// Pull the selection back inside the visible list after it shrank
    pub fn clamp_selection(&mut self) {
        let count = self.visible().len();
        self.selected = self.selected.min(count.saturating_sub(1));
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        let search = self.store.current();
        let visible = self.visible();
        let selected = self.selected.min(visible.len().saturating_sub(1));

        RenderState {
            search: search.search.clone(),
            input_mode: self.input_mode,
            filter: search.filter.clone(),
            filter_active: search.filter_active,
            rows: visible.iter().map(|e| summarize(e)).collect(),
            total: self.log.len(),
            selected,
            detail: self.detail.as_ref().map(DetailView::render),
            detail_scroll: self.detail_scroll,
            show_help: self.show_help,
            status_message: self.status_message.clone(),
        }
    }
}
