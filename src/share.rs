//! Shareable text artifacts for an exchange and the sinks that receive them.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

use crate::body::parse_json_or_raw;
use crate::models::{Exchange, Headers, HttpMethod};

/// Receives finished share payloads; what happens next is up to the platform
pub trait ShareSink: Send {
    fn share(&mut self, content: String) -> Result<()>;
}

/// Sink that writes each payload to a file, replacing the previous one
pub struct FileShareSink {
    path: PathBuf,
}

impl FileShareSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileShareSink { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl ShareSink for FileShareSink {
    fn share(&mut self, content: String) -> Result<()> {
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write share payload to {}", self.path.display()))?;
        tracing::info!(path = %self.path.display(), "Shared payload written");
        Ok(())
    }
}

/// Wrap text in a fenced block
pub fn fenced(text: &str) -> String {
    format!("```\n{}\n```", text)
}

/// The exchange's cURL command, fenced
pub fn curl_share(exchange: &Exchange) -> String {
    fenced(exchange.curl())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FullSnapshot<'a> {
    id: u64,
    method: HttpMethod,
    url: &'a str,
    start_time: i64,
    status: i32,
    duration: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    gql_operation: Option<&'a str>,
    request_headers: &'a Headers,
    response_headers: Headers,
    data_sent: &'a str,
    curl_request: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    response: Option<Value>,
}

/// Pretty JSON of the exchange plus its response.
///
/// `response_text` is the body as currently shown; it is embedded as JSON
/// when it parses and as a plain string otherwise, and left out when empty.
pub fn full_snapshot(exchange: &Exchange, response_text: &str) -> String {
    let progress = exchange.progress();
    let snapshot = FullSnapshot {
        id: exchange.id(),
        method: exchange.method(),
        url: exchange.url(),
        start_time: exchange.start_time(),
        status: progress.status,
        duration: progress.duration,
        gql_operation: exchange.gql_operation(),
        request_headers: exchange.request_headers(),
        response_headers: progress.response_headers,
        data_sent: exchange.raw_request_body(),
        curl_request: exchange.curl(),
        response: (!response_text.is_empty()).then(|| parse_json_or_raw(response_text)),
    };

    serde_json::to_string_pretty(&snapshot).unwrap_or_else(|err| {
        tracing::warn!(id = exchange.id(), error = %err, "Snapshot serialization failed");
        String::from("{}")
    })
}

/// The full snapshot, fenced
pub fn full_snapshot_share(exchange: &Exchange, response_text: &str) -> String {
    fenced(&full_snapshot(exchange, response_text))
}

/// A header section as a pretty JSON object
pub fn headers_share(headers: &Headers) -> String {
    serde_json::to_string_pretty(headers).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::ResponseBody;
    use crate::models::NewExchange;

    fn sample() -> Exchange {
        let mut new = NewExchange::new(HttpMethod::POST, "https://api.example.com/graphql");
        new.start_time = 1_700_000_000_000;
        new.request_headers.push("Content-Type", "application/json");
        new.request_body = r#"{"query":"{ me }"}"#.to_string();
        new.gql_operation = Some("Me".to_string());
        let exchange = Exchange::new(3, new, ResponseBody::ready(Vec::new()));
        exchange.set_response_headers(vec![("X-Id", "1")].into_iter().collect());
        exchange.complete(200, 42);
        exchange
    }

    #[test]
    fn test_curl_share_is_fenced() {
        let exchange = sample();
        let shared = curl_share(&exchange);
        assert!(shared.starts_with("```\ncurl"));
        assert!(shared.ends_with("\n```"));
    }

    #[test]
    fn test_snapshot_embeds_json_response() {
        let snapshot: Value =
            serde_json::from_str(&full_snapshot(&sample(), r#"{"data":{"me":1}}"#)).unwrap();
        assert_eq!(snapshot["response"]["data"]["me"], 1);
        assert_eq!(snapshot["duration"], 42);
        assert_eq!(snapshot["status"], 200);
        assert_eq!(snapshot["gqlOperation"], "Me");
        assert_eq!(snapshot["responseHeaders"]["X-Id"], "1");
        assert_eq!(snapshot["method"], "POST");
    }

    #[test]
    fn test_snapshot_falls_back_to_raw_text() {
        let snapshot: Value =
            serde_json::from_str(&full_snapshot(&sample(), "plain text")).unwrap();
        assert_eq!(snapshot["response"], Value::String("plain text".into()));
    }

    #[test]
    fn test_snapshot_omits_empty_response() {
        let snapshot: Value = serde_json::from_str(&full_snapshot(&sample(), "")).unwrap();
        assert!(snapshot.get("response").is_none());
    }

    #[test]
    fn test_snapshot_is_deterministic() {
        let exchange = sample();
        let first = full_snapshot_share(&exchange, r#"{"b":1,"a":2}"#);
        let second = full_snapshot_share(&exchange, r#"{"b":1,"a":2}"#);
        assert_eq!(first, second);
    }

    #[test]
    fn test_headers_share() {
        let headers: Headers = vec![("Accept", "*/*")].into_iter().collect();
        assert_eq!(headers_share(&headers), "{\n  \"Accept\": \"*/*\"\n}");
    }

    #[test]
    fn test_file_sink_writes_payload() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileShareSink::new(dir.path().join("share.txt"));
        sink.share(fenced("hello")).unwrap();
        let written = fs::read_to_string(sink.path()).unwrap();
        assert_eq!(written, "```\nhello\n```");
    }
}
