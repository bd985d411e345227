//! Command handlers - business logic for processing UI events

use tokio::sync::mpsc;

use crate::app::detail::DetailView;
use crate::app::AppState;
use crate::messages::ui_events::InputMode;
use crate::messages::{DetailTab, ResolutionEvent};
use crate::models::{Filter, HttpMethod};

impl AppState {
    // ========================
    // Search
    // ========================

    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Searching;
    }

    pub fn stop_search(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn set_search(&mut self, text: String) {
        self.store.set_search(text);
        self.selected = 0;
    }

    pub fn search_char(&mut self, c: char) {
        let mut text = self.store.current().search.clone();
        text.push(c);
        self.set_search(text);
    }

    pub fn search_backspace(&mut self) {
        let mut text = self.store.current().search.clone();
        if text.pop().is_some() {
            self.set_search(text);
        }
    }

    // ========================
    // Filter
    // ========================

    pub fn set_filter(&mut self, filter: Filter) {
        let state = self.store.set_filter(filter);
        tracing::info!(active = state.filter_active, filter = ?state.filter, "Filter changed");
        self.selected = 0;
    }

    pub fn clear_filter(&mut self) {
        self.store.clear_filter();
        tracing::info!("Filter cleared");
        self.selected = 0;
    }

    pub fn toggle_method_filter(&mut self, method: HttpMethod) {
        let next = self.store.current().filter.toggled_method(method);
        self.set_filter(next);
    }

    pub fn toggle_errors_only(&mut self) {
        let mut next = self.store.current().filter.clone();
        next.status_errors = !next.status_errors;
        self.set_filter(next);
    }

    /// Restrict to the selected row's status, or lift that restriction
    pub fn filter_by_selected_status(&mut self) {
        let mut next = self.store.current().filter.clone();
        if next.status.is_some() {
            next.status = None;
        } else if let Some(exchange) = self.selected_exchange() {
            next.status = Some(exchange.status());
        } else {
            return;
        }
        self.set_filter(next);
    }

    // ========================
    // Exchange list
    // ========================

    pub fn select_next(&mut self) {
        let count = self.visible().len();
        if count > 0 {
            self.selected = (self.selected + 1).min(count - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.clamp_selection();
        self.selected = self.selected.saturating_sub(1);
    }

    // ========================
    // Detail view
    // ========================

    /// Open the selected exchange and start resolving its response body
    pub fn open_detail(&mut self, resolution_tx: mpsc::UnboundedSender<ResolutionEvent>) {
        let Some(exchange) = self.selected_exchange() else {
            return;
        };
        let generation = self.next_generation();
        tracing::info!(id = exchange.id(), generation, "Opening detail view");
        let mut view = DetailView::new(exchange, generation, self.config.chunk_size);
        if !view.spawn_resolution(resolution_tx) {
            tracing::debug!(generation, "Response body already resolved");
        }
        self.detail = Some(view);
        self.detail_scroll = 0;
    }

    pub fn close_detail(&mut self) {
        if let Some(mut view) = self.detail.take() {
            tracing::info!(generation = view.generation(), "Closing detail view");
            view.cancel_resolution();
        }
        self.detail_scroll = 0;
    }

    pub fn select_tab(&mut self, tab: DetailTab) {
        if let Some(view) = self.detail.as_mut() {
            view.select_tab(tab);
            self.detail_scroll = 0;
        }
    }

    pub fn next_tab(&mut self) {
        if let Some(tab) = self.detail.as_ref().map(|v| v.tab().next()) {
            self.select_tab(tab);
        }
    }

    pub fn open_url_modal(&mut self) {
        if let Some(view) = self.detail.as_mut() {
            view.open_url_modal();
        }
    }

    pub fn close_url_modal(&mut self) {
        if let Some(view) = self.detail.as_mut() {
            view.close_url_modal();
        }
    }

    pub fn scroll_up(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_add(1);
    }

    /// Route a resolved body to the open view, if it is still the one that asked
    pub fn handle_resolution(&mut self, event: ResolutionEvent) {
        match self.detail.as_mut() {
            Some(view) => {
                view.deliver(event);
            }
            None => {
                tracing::debug!(generation = event.generation(), "No open view, dropping resolved body");
            }
        }
    }

    // ========================
    // Sharing
    // ========================

    pub fn share_curl(&self) -> Option<String> {
        self.detail.as_ref().map(DetailView::share_curl)
    }

    pub fn share_full_request(&self) -> Option<String> {
        self.detail.as_ref().map(DetailView::share_full_request)
    }

    pub fn share_section(&self) -> Option<String> {
        self.detail.as_ref().map(DetailView::share_section)
    }

    // ========================
    // Help popup
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::ResponseBody;
    use crate::capture::ExchangeLog;
    use crate::config::InspectorConfig;
    use crate::models::NewExchange;

    fn state_with(entries: &[(HttpMethod, &str, i32)]) -> AppState {
        let log = ExchangeLog::new();
        for (method, url, status) in entries {
            let exchange = log.append(NewExchange::new(*method, *url), ResponseBody::ready("{}"));
            if *status >= 0 {
                exchange.complete(*status, 5);
            }
        }
        AppState::new(log, InspectorConfig::default())
    }

    #[test]
    fn test_search_typing_updates_store() {
        let mut state = state_with(&[
            (HttpMethod::GET, "https://x.test/users", 200),
            (HttpMethod::GET, "https://x.test/orders", 200),
        ]);
        state.start_search();
        for c in "ORD".chars() {
            state.search_char(c);
        }
        assert_eq!(state.store.current().search, "ORD");
        assert_eq!(state.visible().len(), 1);
        state.search_backspace();
        assert_eq!(state.store.current().search, "OR");
        state.stop_search();
        assert_eq!(state.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_method_toggle_and_clear() {
        let mut state = state_with(&[
            (HttpMethod::GET, "https://x.test/a", 200),
            (HttpMethod::POST, "https://x.test/b", 404),
        ]);
        state.toggle_method_filter(HttpMethod::POST);
        assert!(state.store.current().filter_active);
        assert_eq!(state.visible().len(), 1);
        state.toggle_method_filter(HttpMethod::POST);
        assert!(!state.store.current().filter_active);

        state.toggle_errors_only();
        assert_eq!(state.visible().len(), 1);
        state.clear_filter();
        assert_eq!(state.visible().len(), 2);
        assert_eq!(state.store.current().filter, Filter::default());
    }

    #[test]
    fn test_filter_by_selected_status() {
        let mut state = state_with(&[
            (HttpMethod::GET, "https://x.test/a", 200),
            (HttpMethod::GET, "https://x.test/b", 500),
        ]);
        state.select_next();
        state.filter_by_selected_status();
        assert_eq!(state.store.current().filter.status, Some(500));
        assert_eq!(state.visible().len(), 1);
        state.filter_by_selected_status();
        assert_eq!(state.store.current().filter.status, None);
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut state = state_with(&[(HttpMethod::GET, "https://x.test/a", 200)]);
        state.select_next();
        state.select_next();
        assert_eq!(state.selected, 0);
        state.select_prev();
        assert_eq!(state.selected, 0);
    }

    #[tokio::test]
    async fn test_reopening_discards_previous_generation() {
        let mut state = state_with(&[(HttpMethod::GET, "https://x.test/a", 200)]);
        let (tx, _rx) = mpsc::unbounded_channel();
        state.open_detail(tx.clone());
        let first = state.detail.as_ref().unwrap().generation();
        state.close_detail();
        state.open_detail(tx);
        let second = state.detail.as_ref().unwrap().generation();
        assert!(second > first);

        let id = state.detail.as_ref().unwrap().exchange().id();
        state.handle_resolution(ResolutionEvent::ResponseResolved {
            generation: first,
            exchange_id: id,
            body: "stale".into(),
        });
        assert_ne!(state.detail.as_ref().unwrap().response_body(), "stale");
    }

    #[tokio::test]
    async fn test_selection_survives_shrinking_list() {
        let log = ExchangeLog::new();
        let handles: Vec<_> = (0..3)
            .map(|i| log.record(NewExchange::new(HttpMethod::GET, format!("https://x.test/{}", i))))
            .collect();
        let mut state = AppState::new(log, InspectorConfig::default());
        state.select_next();
        state.select_next();
        state.filter_by_selected_status();
        assert_eq!(state.store.current().filter.status, Some(-1));
        state.select_next();
        state.select_next();
        assert_eq!(state.selected, 2);

        // Two of the pending calls complete and drop out of the filter
        handles[0].complete(200, 5);
        handles[1].complete(200, 5);
        assert_eq!(state.visible().len(), 1);
        assert_eq!(state.selected_exchange().unwrap().url(), "https://x.test/2");

        let (tx, _rx) = mpsc::unbounded_channel();
        state.open_detail(tx);
        assert_eq!(state.detail.as_ref().unwrap().exchange().url(), "https://x.test/2");

        state.close_detail();
        state.clamp_selection();
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_select_prev_skips_phantom_rows() {
        let mut state = state_with(&[
            (HttpMethod::GET, "https://x.test/a", 200),
            (HttpMethod::GET, "https://x.test/b", 200),
            (HttpMethod::POST, "https://x.test/c", 200),
        ]);
        state.selected = 2;
        state.store.set_filter(Filter::default().with_methods([HttpMethod::GET]));
        state.select_prev();
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_sharing_requires_open_detail() {
        let state = state_with(&[(HttpMethod::GET, "https://x.test/a", 200)]);
        assert!(state.share_curl().is_none());
        assert!(state.share_full_request().is_none());
    }
}
