//! Detail view controller for a single exchange.
//!
//! Holds the per-view state (selected tab, URL modal, response body text) and
//! derives everything the view shows or shares. The response body is fetched
//! by a spawned task that reports back with the view's generation; a result
//! for any other generation, or for a view that is gone, is dropped.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::chunk::LargeText;
use crate::constants::LOADING_PLACEHOLDER;
use crate::messages::render::{DetailContent, DetailRender};
use crate::messages::{DetailTab, ResolutionEvent};
use crate::models::{Exchange, Headers};
use crate::query::decode_query;
use crate::share;
use crate::summary::summarize;

pub struct DetailView {
    exchange: Arc<Exchange>,
    generation: u64,
    tab: DetailTab,
    url_modal_open: bool,
    response_body: String,
    resolved: bool,
    chunk_size: usize,
    resolution: Option<JoinHandle<()>>,
}

impl DetailView {
    pub fn new(exchange: Arc<Exchange>, generation: u64, chunk_size: usize) -> Self {
        let body = exchange.response_body();
        let resolved = body.is_resolved();
        let response_body = body.peek().to_string();
        DetailView {
            exchange,
            generation,
            tab: DetailTab::default(),
            url_modal_open: false,
            response_body,
            resolved,
            chunk_size,
            resolution: None,
        }
    }

    /// Start fetching the response body unless it is already known.
    /// Returns false when there was nothing to fetch.
    pub fn spawn_resolution(&mut self, tx: mpsc::UnboundedSender<ResolutionEvent>) -> bool {
        if self.resolved {
            return false;
        }
        self.cancel_resolution();
        let exchange = self.exchange.clone();
        let generation = self.generation;
        self.resolution = Some(tokio::spawn(async move {
            let body = exchange.resolve_response().await.to_string();
            let event = ResolutionEvent::ResponseResolved {
                generation,
                exchange_id: exchange.id(),
                body,
            };
            if tx.send(event).is_err() {
                tracing::debug!(generation, "Detail view gone, dropping resolved body");
            }
        }));
        true
    }

    /// Stop waiting for the body. The shared body cell stays usable for
    /// the next viewer.
    pub fn cancel_resolution(&mut self) {
        if let Some(task) = self.resolution.take() {
            if !task.is_finished() {
                tracing::debug!(generation = self.generation, "Cancelling body resolution");
            }
            task.abort();
        }
    }

    pub fn is_resolving(&self) -> bool {
        self.resolution.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Apply a resolved body; false when it belongs to another view or arrived twice
    pub fn deliver(&mut self, event: ResolutionEvent) -> bool {
        let ResolutionEvent::ResponseResolved {
            generation,
            exchange_id,
            body,
        } = event;
        if generation != self.generation || exchange_id != self.exchange.id() || self.resolved {
            tracing::debug!(generation, current = self.generation, "Ignoring stale body delivery");
            return false;
        }
        self.response_body = body;
        self.resolved = true;
        true
    }

    pub fn exchange(&self) -> &Arc<Exchange> {
        &self.exchange
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn tab(&self) -> DetailTab {
        self.tab
    }

    pub fn select_tab(&mut self, tab: DetailTab) {
        self.tab = tab;
    }

    pub fn is_url_modal_open(&self) -> bool {
        self.url_modal_open
    }

    pub fn open_url_modal(&mut self) {
        self.url_modal_open = true;
    }

    pub fn close_url_modal(&mut self) {
        self.url_modal_open = false;
    }

    pub fn is_loading(&self) -> bool {
        !self.resolved
    }

    /// Response body as currently shown
    pub fn response_body(&self) -> &str {
        if self.resolved {
            &self.response_body
        } else {
            LOADING_PLACEHOLDER
        }
    }

    pub fn request_body(&self) -> String {
        self.exchange.request_body(self.exchange.is_graphql())
    }

    pub fn query_params(&self) -> Headers {
        decode_query(self.exchange.url())
    }

    pub fn share_curl(&self) -> String {
        share::curl_share(&self.exchange)
    }

    pub fn share_full_request(&self) -> String {
        share::full_snapshot_share(&self.exchange, self.response_body())
    }

    /// Share text for what the current tab shows
    pub fn share_section(&self) -> String {
        match self.tab {
            DetailTab::Response => self.response_body().to_string(),
            DetailTab::Request => self.request_body(),
            DetailTab::Headers => format!(
                "Request Headers\n{}\n\nResponse Headers\n{}",
                share::headers_share(self.exchange.request_headers()),
                share::headers_share(&self.exchange.response_headers())
            ),
        }
    }

    fn segments(&self, text: &str) -> Vec<String> {
        LargeText::new(text, self.chunk_size)
            .segments()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn render(&self) -> DetailRender {
        let content = match self.tab {
            DetailTab::Response => DetailContent::Response {
                body_segments: self.segments(self.response_body()),
            },
            DetailTab::Request => DetailContent::Request {
                body_segments: self.segments(&self.request_body()),
                query_params: self.query_params(),
            },
            DetailTab::Headers => DetailContent::Headers {
                request: self.exchange.request_headers().clone(),
                response: self.exchange.response_headers(),
            },
        };

        DetailRender {
            summary: summarize(&self.exchange),
            tab: self.tab,
            url_modal_open: self.url_modal_open,
            url: self.exchange.url().to_string(),
            response_loading: self.is_loading(),
            content,
        }
    }
}

impl Drop for DetailView {
    fn drop(&mut self) {
        self.cancel_resolution();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{self, ResponseBody};
    use crate::models::{HttpMethod, NewExchange};

    fn deferred_exchange(url: &str) -> (Arc<Exchange>, body::BodySender) {
        let (source, sender) = body::deferred();
        let exchange = Exchange::new(9, NewExchange::new(HttpMethod::GET, url), ResponseBody::new(source));
        (Arc::new(exchange), sender)
    }

    #[test]
    fn test_initial_state() {
        let (exchange, _sender) = deferred_exchange("https://x.test/");
        let view = DetailView::new(exchange, 1, 1000);
        assert_eq!(view.tab(), DetailTab::Response);
        assert!(!view.is_url_modal_open());
        assert_eq!(view.response_body(), LOADING_PLACEHOLDER);
        assert!(view.is_loading());
    }

    #[test]
    fn test_tab_and_modal_transitions() {
        let (exchange, _sender) = deferred_exchange("https://x.test/");
        let mut view = DetailView::new(exchange, 1, 1000);
        view.select_tab(DetailTab::Headers);
        view.select_tab(DetailTab::Headers);
        assert_eq!(view.tab(), DetailTab::Headers);
        view.open_url_modal();
        assert!(view.is_url_modal_open());
        view.select_tab(DetailTab::Request);
        assert!(view.is_url_modal_open());
        view.close_url_modal();
        assert!(!view.is_url_modal_open());
    }

    #[tokio::test]
    async fn test_resolution_delivered_once() {
        let (exchange, sender) = deferred_exchange("https://x.test/");
        let mut view = DetailView::new(exchange, 4, 1000);
        let (tx, mut rx) = mpsc::unbounded_channel();
        assert!(view.spawn_resolution(tx));
        assert!(view.is_resolving());

        // The view keeps responding while the body is pending
        view.select_tab(DetailTab::Request);
        view.select_tab(DetailTab::Response);

        sender.deliver("hello");
        let event = rx.recv().await.unwrap();
        assert!(view.deliver(event.clone()));
        assert_eq!(view.response_body(), "hello");
        assert!(!view.deliver(event));
    }

    #[test]
    fn test_stale_generation_is_ignored() {
        let (exchange, _sender) = deferred_exchange("https://x.test/");
        let mut view = DetailView::new(exchange, 2, 1000);
        let stale = ResolutionEvent::ResponseResolved {
            generation: 1,
            exchange_id: 9,
            body: "old".into(),
        };
        assert!(!view.deliver(stale));
        assert_eq!(view.response_body(), LOADING_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_already_resolved_body_skips_task() {
        let exchange = Arc::new(Exchange::new(
            1,
            NewExchange::new(HttpMethod::GET, "https://x.test/"),
            ResponseBody::ready("cached"),
        ));
        exchange.resolve_response().await;
        let mut view = DetailView::new(exchange, 1, 1000);
        let (tx, _rx) = mpsc::unbounded_channel();
        assert!(!view.spawn_resolution(tx));
        assert!(!view.is_resolving());
        assert_eq!(view.response_body(), "cached");
    }

    #[tokio::test]
    async fn test_closed_view_discards_result() {
        let (exchange, sender) = deferred_exchange("https://x.test/");
        let mut view = DetailView::new(exchange.clone(), 1, 1000);
        let (tx, mut rx) = mpsc::unbounded_channel();
        assert!(view.spawn_resolution(tx));
        drop(view);

        // The aborted task drops its sender without reporting anything
        assert!(rx.recv().await.is_none());

        sender.deliver("late");
        // The shared cell is still usable by the next viewer
        assert_eq!(exchange.resolve_response().await, "late");
    }

    #[tokio::test]
    async fn test_cancel_never_delivered_body() {
        let (exchange, _sender) = deferred_exchange("https://x.test/large.json");
        let mut view = DetailView::new(exchange, 1, 1000);
        let (tx, mut rx) = mpsc::unbounded_channel();
        for _ in 0..3 {
            assert!(view.spawn_resolution(tx.clone()));
        }
        drop(tx);
        view.cancel_resolution();
        assert!(!view.is_resolving());
        assert!(rx.recv().await.is_none());
        assert!(view.is_loading());
    }

    #[test]
    fn test_request_tab_render() {
        let mut new = NewExchange::new(HttpMethod::POST, "https://x.test/search?ids=[1,2]&q=rust");
        new.request_body = r#"{"q":"rust"}"#.into();
        let exchange = Arc::new(Exchange::new(1, new, ResponseBody::ready("")));
        let mut view = DetailView::new(exchange, 1, 5);
        view.select_tab(DetailTab::Request);

        match view.render().content {
            DetailContent::Request {
                body_segments,
                query_params,
            } => {
                assert_eq!(body_segments.concat(), "{\n  \"q\": \"rust\"\n}");
                assert!(body_segments.iter().all(|s| s.chars().count() <= 5));
                assert_eq!(query_params.get("ids"), Some("1, 2"));
                assert_eq!(query_params.get("q"), Some("rust"));
            }
            other => panic!("unexpected content: {:?}", other),
        }
    }

    #[test]
    fn test_full_request_share_while_loading() {
        let (exchange, _sender) = deferred_exchange("https://x.test/");
        let view = DetailView::new(exchange, 1, 1000);
        let shared = view.share_full_request();
        assert!(shared.contains("\"response\": \"Loading...\""));
    }

    #[test]
    fn test_section_share_per_tab() {
        let mut new = NewExchange::new(HttpMethod::POST, "https://x.test/items");
        new.request_headers = Headers::from_iter([("Accept", "*/*")]);
        new.request_body = r#"{"name":"box"}"#.into();
        let exchange = Exchange::new(1, new, ResponseBody::ready(""));
        exchange.set_response_headers(Headers::from_iter([("X-Id", "7")]));
        let mut view = DetailView::new(Arc::new(exchange), 1, 1000);

        assert_eq!(view.share_section(), LOADING_PLACEHOLDER);

        view.select_tab(DetailTab::Request);
        assert_eq!(view.share_section(), "{\n  \"name\": \"box\"\n}");

        view.select_tab(DetailTab::Headers);
        assert_eq!(
            view.share_section(),
            "Request Headers\n{\n  \"Accept\": \"*/*\"\n}\n\nResponse Headers\n{\n  \"X-Id\": \"7\"\n}"
        );
    }
}
