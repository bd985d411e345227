//! Render state - data structure sent from App layer to UI for rendering

use crate::messages::ui_events::{DetailTab, InputMode, KeyContext};
use crate::models::{Filter, Headers};
use crate::summary::ExchangeSummary;

/// What the selected detail tab shows
#[derive(Debug, Clone, PartialEq)]
pub enum DetailContent {
    Response {
        body_segments: Vec<String>,
    },
    Request {
        body_segments: Vec<String>,
        query_params: Headers,
    },
    Headers {
        request: Headers,
        response: Headers,
    },
}

/// Everything needed to draw an open detail view
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRender {
    pub summary: ExchangeSummary,
    pub tab: DetailTab,
    pub url_modal_open: bool,
    pub url: String,
    pub response_loading: bool,
    pub content: DetailContent,
}

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    // Search and filter
    pub search: String,
    pub input_mode: InputMode,
    pub filter: Filter,
    pub filter_active: bool,

    // Exchange list
    pub rows: Vec<ExchangeSummary>,
    pub total: usize,
    pub selected: usize,

    // Detail view
    pub detail: Option<DetailRender>,
    pub detail_scroll: u16,

    // Popups and status bar
    pub show_help: bool,
    pub status_message: Option<String>,
}

impl RenderState {
    /// Context for mapping the next key press
    pub fn key_context(&self) -> KeyContext {
        KeyContext {
            input_mode: self.input_mode,
            detail_open: self.detail.is_some(),
            url_modal_open: self.detail.as_ref().is_some_and(|d| d.url_modal_open),
            show_help: self.show_help,
        }
    }
}
