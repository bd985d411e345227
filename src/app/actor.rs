//! App actor - message loop processing UI events and body resolutions

use std::sync::Arc;
use tokio::sync::{mpsc, watch};

use crate::app::state::AppState;
use crate::app::store::SearchState;
use crate::capture::ExchangeLog;
use crate::config::InspectorConfig;
use crate::messages::{RenderState, ResolutionEvent, UiEvent};
use crate::share::ShareSink;

/// App actor that owns the inspector state and is its only writer
pub struct AppActor {
    state: AppState,
    render_tx: mpsc::UnboundedSender<RenderState>,
    share_sink: Box<dyn ShareSink>,
}

impl AppActor {
    pub fn new(
        log: ExchangeLog,
        config: InspectorConfig,
        render_tx: mpsc::UnboundedSender<RenderState>,
        share_sink: Box<dyn ShareSink>,
    ) -> Self {
        AppActor {
            state: AppState::new(log, config),
            render_tx,
            share_sink,
        }
    }

    /// Read-only view of search/filter snapshots for other consumers
    pub fn search_updates(&self) -> watch::Receiver<Arc<SearchState>> {
        self.state.store.subscribe()
    }

    /// Run the actor message loop
    pub async fn run(mut self, mut ui_rx: mpsc::UnboundedReceiver<UiEvent>) {
        let (resolution_tx, mut resolution_rx) = mpsc::unbounded_channel::<ResolutionEvent>();
        let mut log_rx = self.state.log.subscribe();

        // Send initial render state
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                event = ui_rx.recv() => {
                    let Some(event) = event else { break };
                    if self.handle_ui_event(event, &resolution_tx) {
                        break;
                    }
                }
                Some(resolved) = resolution_rx.recv() => {
                    self.state.handle_resolution(resolved);
                }
                // Completions can shrink the visible list under the selection
                Ok(()) = log_rx.changed() => self.state.clamp_selection(),
            }
            let _ = self.render_tx.send(self.state.to_render_state());
        }
        tracing::info!("App actor stopped");
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(
        &mut self,
        event: UiEvent,
        resolution_tx: &mpsc::UnboundedSender<ResolutionEvent>,
    ) -> bool {
        match event {
            // Search
            UiEvent::StartSearch => self.state.start_search(),
            UiEvent::StopSearch => self.state.stop_search(),
            UiEvent::SearchChar(c) => self.state.search_char(c),
            UiEvent::SearchBackspace => self.state.search_backspace(),
            UiEvent::SetSearch(text) => self.state.set_search(text),

            // Filter
            UiEvent::ToggleMethodFilter(method) => self.state.toggle_method_filter(method),
            UiEvent::ToggleErrorsOnly => self.state.toggle_errors_only(),
            UiEvent::FilterBySelectedStatus => self.state.filter_by_selected_status(),
            UiEvent::SetFilter(filter) => self.state.set_filter(filter),
            UiEvent::ClearFilter => self.state.clear_filter(),

            // Exchange list
            UiEvent::SelectNext => self.state.select_next(),
            UiEvent::SelectPrev => self.state.select_prev(),
            UiEvent::OpenDetail => self.state.open_detail(resolution_tx.clone()),

            // Detail view
            UiEvent::CloseDetail => self.state.close_detail(),
            UiEvent::SelectTab(tab) => self.state.select_tab(tab),
            UiEvent::NextTab => self.state.next_tab(),
            UiEvent::OpenUrlModal => self.state.open_url_modal(),
            UiEvent::CloseUrlModal => self.state.close_url_modal(),
            UiEvent::ScrollUp => self.state.scroll_up(),
            UiEvent::ScrollDown => self.state.scroll_down(),

            // Sharing
            UiEvent::ShareCurl => {
                let payload = self.state.share_curl();
                self.share(payload, "cURL");
            }
            UiEvent::ShareFullRequest => {
                let payload = self.state.share_full_request();
                self.share(payload, "full request");
            }
            UiEvent::ShareSection => {
                let payload = self.state.share_section();
                self.share(payload, "section");
            }

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }

    fn share(&mut self, payload: Option<String>, what: &str) {
        let Some(payload) = payload else {
            return;
        };
        self.state.status_message = Some(match self.share_sink.share(payload) {
            Ok(()) => format!("Shared {}", what),
            Err(err) => {
                tracing::warn!(error = %err, what, "Share failed");
                format!("Share failed: {}", err)
            }
        });
    }
}
