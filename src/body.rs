//! Request/response body handling.
//!
//! The response body of an exchange may arrive after its headers. A
//! [`ResponseBody`] wraps whatever source the capture side provides and
//! resolves it at most once; every caller, early or late, sees the same text.
//! Failures never escape: they resolve to a diagnostic string instead.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{watch, OnceCell};

use crate::constants::LOADING_PLACEHOLDER;
use crate::error::InspectorError;

/// Anything that can produce the raw bytes of a response body
pub trait BodySource: Send + Sync {
    fn fetch(&self) -> BoxFuture<'_, Result<Vec<u8>, InspectorError>>;
}

/// A body that was already fully captured
pub struct ReadyBody(Vec<u8>);

impl BodySource for ReadyBody {
    fn fetch(&self) -> BoxFuture<'_, Result<Vec<u8>, InspectorError>> {
        let bytes = self.0.clone();
        async move { Ok(bytes) }.boxed()
    }
}

#[derive(Clone, Debug)]
enum Delivery {
    Pending,
    Body(Arc<Vec<u8>>),
    Failed(String),
}

/// A body the capture side will deliver later through a [`BodySender`]
pub struct DeferredBody {
    rx: watch::Receiver<Delivery>,
}

impl BodySource for DeferredBody {
    fn fetch(&self) -> BoxFuture<'_, Result<Vec<u8>, InspectorError>> {
        let mut rx = self.rx.clone();
        async move {
            let delivery = rx
                .wait_for(|d| !matches!(d, Delivery::Pending))
                .await
                .map_err(|_| InspectorError::BodyUnavailable("capture ended before the body arrived".into()))?
                .clone();
            match delivery {
                Delivery::Body(bytes) => Ok(bytes.as_ref().clone()),
                Delivery::Failed(reason) => Err(InspectorError::BodyUnavailable(reason)),
                Delivery::Pending => Err(InspectorError::BodyUnavailable("no body".into())),
            }
        }
        .boxed()
    }
}

/// Capture-side half of a [`DeferredBody`]
#[derive(Debug)]
pub struct BodySender {
    tx: watch::Sender<Delivery>,
}

impl BodySender {
    pub fn deliver(self, bytes: impl Into<Vec<u8>>) {
        self.tx.send_replace(Delivery::Body(Arc::new(bytes.into())));
    }

    pub fn fail(self, reason: impl Into<String>) {
        self.tx.send_replace(Delivery::Failed(reason.into()));
    }
}

/// Create a body that resolves once the returned sender delivers it
pub fn deferred() -> (DeferredBody, BodySender) {
    let (tx, rx) = watch::channel(Delivery::Pending);
    (DeferredBody { rx }, BodySender { tx })
}

/// Lazily resolved response body text
pub struct ResponseBody {
    source: Box<dyn BodySource>,
    resolved: OnceCell<String>,
}

impl ResponseBody {
    pub fn new(source: impl BodySource + 'static) -> Self {
        ResponseBody {
            source: Box::new(source),
            resolved: OnceCell::new(),
        }
    }

    pub fn ready(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(ReadyBody(bytes.into()))
    }

    /// Resolved text, or the loading placeholder until resolution finishes
    pub fn peek(&self) -> &str {
        self.resolved
            .get()
            .map(String::as_str)
            .unwrap_or(LOADING_PLACEHOLDER)
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.initialized()
    }

    /// Resolve the body. Concurrent callers share one fetch.
    pub async fn resolve(&self) -> &str {
        self.resolved
            .get_or_init(|| async {
                match self.source.fetch().await {
                    Ok(bytes) => {
                        tracing::debug!(bytes = bytes.len(), "Response body resolved");
                        decode_body(bytes)
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "Response body resolution failed");
                        format!("<{}>", err)
                    }
                }
            })
            .await
    }
}

/// Bytes to display text; non-UTF-8 payloads are shown as base64
pub fn decode_body(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            let bytes = err.into_bytes();
            format!(
                "<binary body: {} bytes, base64>\n{}",
                bytes.len(),
                STANDARD.encode(&bytes)
            )
        }
    }
}

/// Parse as JSON, keeping the raw text as a JSON string when that fails
pub fn parse_json_or_raw(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Shape a raw request body for display.
///
/// GraphQL bodies show the query text followed by the variables; everything
/// else is pretty-printed when it is JSON and left alone when it is not.
pub fn format_request_body(raw: &str, graphql: bool) -> String {
    let parsed: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(_) => return raw.to_string(),
    };

    if graphql {
        if let Some(query) = parsed.get("query").and_then(Value::as_str) {
            let mut out = query.trim_end().to_string();
            if let Some(variables) = parsed.get("variables").filter(|v| !v.is_null()) {
                out.push_str("\n\nvariables: ");
                out.push_str(&pretty(variables));
            }
            return out;
        }
    }

    pretty(&parsed)
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_or_raw() {
        assert_eq!(parse_json_or_raw(r#"{"a":1}"#)["a"], 1);
        assert_eq!(
            parse_json_or_raw("plain text"),
            Value::String("plain text".into())
        );
    }

    #[test]
    fn test_format_request_body_json_and_raw() {
        assert_eq!(format_request_body(r#"{"a":1}"#, false), "{\n  \"a\": 1\n}");
        assert_eq!(format_request_body("a=1&b=2", false), "a=1&b=2");
        assert_eq!(format_request_body("", true), "");
    }

    #[test]
    fn test_format_request_body_graphql() {
        let raw = r#"{"query":"query Me {\n  me { id }\n}","variables":{"id":"7"},"operationName":"Me"}"#;
        let shown = format_request_body(raw, true);
        assert_eq!(
            shown,
            "query Me {\n  me { id }\n}\n\nvariables: {\n  \"id\": \"7\"\n}"
        );

        let no_vars = r#"{"query":"{ me }","variables":null}"#;
        assert_eq!(format_request_body(no_vars, true), "{ me }");

        // Without a query string the body is shown as plain JSON
        assert_eq!(format_request_body(r#"[1]"#, true), "[\n  1\n]");
    }

    #[test]
    fn test_decode_binary_body() {
        let shown = decode_body(vec![0xff, 0xfe, 0x00]);
        assert_eq!(shown, "<binary body: 3 bytes, base64>\n//4A");
    }

    #[tokio::test]
    async fn test_placeholder_until_resolved() {
        let (source, sender) = deferred();
        let body = ResponseBody::new(source);
        assert_eq!(body.peek(), LOADING_PLACEHOLDER);
        assert!(!body.is_resolved());

        sender.deliver("hello");
        assert_eq!(body.resolve().await, "hello");
        assert_eq!(body.peek(), "hello");
    }

    #[tokio::test]
    async fn test_concurrent_resolution_converges() {
        let (source, sender) = deferred();
        let body = Arc::new(ResponseBody::new(source));

        let early: Vec<_> = (0..4)
            .map(|_| {
                let body = body.clone();
                tokio::spawn(async move { body.resolve().await.to_string() })
            })
            .collect();

        sender.deliver(r#"{"ok":true}"#);

        for handle in early {
            assert_eq!(handle.await.unwrap(), r#"{"ok":true}"#);
        }
        assert_eq!(body.resolve().await, r#"{"ok":true}"#);
    }

    #[tokio::test]
    async fn test_dropped_sender_resolves_to_diagnostic() {
        let (source, sender) = deferred();
        let body = ResponseBody::new(source);
        drop(sender);
        let text = body.resolve().await;
        assert!(text.starts_with("<response body unavailable"));
        assert_ne!(text, LOADING_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_failed_delivery_resolves_to_diagnostic() {
        let (source, sender) = deferred();
        let body = ResponseBody::new(source);
        sender.fail("connection reset");
        assert_eq!(
            body.resolve().await,
            "<response body unavailable: connection reset>"
        );
    }
}
