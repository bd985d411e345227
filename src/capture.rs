//! The live list of captured exchanges.
//!
//! The capture side appends through [`ExchangeLog::record`] and fills in the
//! rest through the returned [`CaptureHandle`]. Everything else only reads.
//! Every change bumps a revision counter that readers can watch.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::watch;

use crate::body::{self, BodySender, ResponseBody};
use crate::models::{Exchange, Headers, HttpMethod, NewExchange};

/// Shared, append-only list of exchanges with stable ids
#[derive(Clone)]
pub struct ExchangeLog {
    exchanges: Arc<RwLock<Vec<Arc<Exchange>>>>,
    next_id: Arc<AtomicU64>,
    revision: Arc<watch::Sender<u64>>,
}

impl Default for ExchangeLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ExchangeLog {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        ExchangeLog {
            exchanges: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            revision: Arc::new(revision),
        }
    }

    /// Start recording a call whose response body will be delivered later
    pub fn record(&self, new: NewExchange) -> CaptureHandle {
        let (source, body) = body::deferred();
        let exchange = self.append(new, ResponseBody::new(source));
        CaptureHandle {
            exchange,
            body: Some(body),
            log: self.clone(),
        }
    }

    /// Append an exchange with an already-known response body source
    pub fn append(&self, new: NewExchange, response_body: ResponseBody) -> Arc<Exchange> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let exchange = Arc::new(Exchange::new(id, new, response_body));
        self.exchanges
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(exchange.clone());
        tracing::debug!(id, url = %exchange.url(), "Exchange recorded");
        self.bump();
        exchange
    }

    /// Point-in-time copy of the list, oldest first
    pub fn snapshot(&self) -> Vec<Arc<Exchange>> {
        self.exchanges
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn get(&self, id: u64) -> Option<Arc<Exchange>> {
        self.exchanges
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .find(|e| e.id() == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.exchanges
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Receiver that changes whenever an exchange is added or updated
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }
}

/// Capture-side writer for one exchange
pub struct CaptureHandle {
    exchange: Arc<Exchange>,
    body: Option<BodySender>,
    log: ExchangeLog,
}

impl CaptureHandle {
    pub fn exchange(&self) -> &Arc<Exchange> {
        &self.exchange
    }

    pub fn response_headers(&self, headers: Headers) {
        self.exchange.set_response_headers(headers);
        self.log.bump();
    }

    /// Final status and duration, written together
    pub fn complete(&self, status: i32, duration_ms: u64) {
        self.exchange.complete(status, duration_ms);
        tracing::debug!(id = self.exchange.id(), status, duration_ms, "Exchange completed");
        self.log.bump();
    }

    pub fn deliver_body(&mut self, bytes: impl Into<Vec<u8>>) {
        if let Some(sender) = self.body.take() {
            sender.deliver(bytes);
        }
    }

    pub fn fail_body(&mut self, reason: impl Into<String>) {
        if let Some(sender) = self.body.take() {
            sender.fail(reason);
        }
    }
}

/// One entry of a shared full-snapshot file
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotRecord {
    method: String,
    url: String,
    #[serde(default)]
    start_time: i64,
    #[serde(default = "pending_status")]
    status: i32,
    #[serde(default)]
    duration: u64,
    #[serde(default)]
    gql_operation: Option<String>,
    #[serde(default)]
    request_headers: Headers,
    #[serde(default)]
    response_headers: Headers,
    #[serde(default)]
    data_sent: String,
    #[serde(default)]
    curl_request: Option<String>,
    #[serde(default)]
    response: Option<Value>,
}

fn pending_status() -> i32 {
    -1
}

impl ExchangeLog {
    /// Load a JSON array of full snapshots, as produced by the share action
    pub fn load_snapshots(path: &Path) -> Result<ExchangeLog> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let records: Vec<SnapshotRecord> = serde_json::from_str(&content)
            .with_context(|| format!("Invalid snapshot file {}", path.display()))?;

        let log = ExchangeLog::new();
        for record in records {
            let method: HttpMethod = record.method.parse()?;
            let response_text = match record.response {
                None => String::new(),
                Some(Value::String(text)) => text,
                Some(other) => serde_json::to_string_pretty(&other)?,
            };
            let new = NewExchange {
                method,
                url: record.url,
                start_time: record.start_time,
                request_headers: record.request_headers,
                request_body: record.data_sent,
                gql_operation: record.gql_operation,
                curl: record.curl_request,
            };
            let exchange = log.append(new, ResponseBody::ready(response_text));
            exchange.set_response_headers(record.response_headers);
            exchange.complete(record.status, record.duration);
        }
        tracing::info!(count = log.len(), path = %path.display(), "Loaded snapshot file");
        Ok(log)
    }
}
