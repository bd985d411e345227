use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::RwLock;

use crate::body::{self, ResponseBody};
use crate::error::InspectorError;

/// HTTP Method enum
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
    HEAD,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 6] = [
        HttpMethod::GET,
        HttpMethod::POST,
        HttpMethod::PUT,
        HttpMethod::PATCH,
        HttpMethod::DELETE,
        HttpMethod::HEAD,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::HEAD => "HEAD",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = InspectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| InspectorError::InvalidMethod(s.to_string()))
    }
}

/// Ordered name/value pairs as seen on the wire.
///
/// Names are kept exactly as captured; duplicates are allowed and keep their
/// original order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Headers(Vec::new())
    }

    /// Append a pair, keeping any earlier pair with the same name
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// Set a value; an existing exact name keeps its position and takes the new value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    /// First value whose name matches case-insensitively
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Collapse repeated exact names into one entry, values joined with ", "
    pub fn folded(&self) -> Vec<(&str, String)> {
        let mut out: Vec<(&str, String)> = Vec::with_capacity(self.0.len());
        for (name, value) in &self.0 {
            match out.iter_mut().find(|(n, _)| *n == name.as_str()) {
                Some((_, joined)) => {
                    joined.push_str(", ");
                    joined.push_str(value);
                }
                None => out.push((name.as_str(), value.clone())),
            }
        }
        out
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Headers(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl Serialize for Headers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let folded = self.folded();
        let mut map = serializer.serialize_map(Some(folded.len()))?;
        for (name, value) in &folded {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Headers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .map(|(name, value)| {
                let value = match value {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                (name, value)
            })
            .collect())
    }
}

/// Search/selection criteria over the exchange list
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Filter {
    /// Empty means no method restriction
    pub methods: BTreeSet<HttpMethod>,
    pub status: Option<i32>,
    pub status_errors: bool,
}

impl Filter {
    /// True when at least one criterion restricts the list
    pub fn is_active(&self) -> bool {
        !self.methods.is_empty() || self.status.is_some() || self.status_errors
    }

    pub fn with_methods(mut self, methods: impl IntoIterator<Item = HttpMethod>) -> Self {
        self.methods = methods.into_iter().collect();
        self
    }

    pub fn with_status(mut self, status: i32) -> Self {
        self.status = Some(status);
        self
    }

    pub fn errors_only(mut self) -> Self {
        self.status_errors = true;
        self
    }

    /// Copy of this filter with `method` added or removed
    pub fn toggled_method(&self, method: HttpMethod) -> Self {
        let mut next = self.clone();
        if !next.methods.remove(&method) {
            next.methods.insert(method);
        }
        next
    }
}

/// Everything the capture side knows when a call starts
#[derive(Clone, Debug)]
pub struct NewExchange {
    pub method: HttpMethod,
    pub url: String,
    /// Milliseconds since the Unix epoch, `0` when unknown
    pub start_time: i64,
    pub request_headers: Headers,
    pub request_body: String,
    pub gql_operation: Option<String>,
    /// Precomputed cURL command; built from the other fields when absent
    pub curl: Option<String>,
}

impl NewExchange {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        NewExchange {
            method,
            url: url.into(),
            start_time: 0,
            request_headers: Headers::new(),
            request_body: String::new(),
            gql_operation: None,
            curl: None,
        }
    }
}

/// Fields that only become known as the call progresses
#[derive(Clone, Debug)]
pub struct Progress {
    /// Negative while pending
    pub status: i32,
    /// Milliseconds, `0` until completed
    pub duration: u64,
    pub response_headers: Headers,
}

impl Default for Progress {
    fn default() -> Self {
        Progress {
            status: -1,
            duration: 0,
            response_headers: Headers::new(),
        }
    }
}

/// One observed HTTP/GraphQL call
pub struct Exchange {
    id: u64,
    method: HttpMethod,
    url: String,
    start_time: i64,
    request_headers: Headers,
    request_body: String,
    gql_operation: Option<String>,
    curl: String,
    progress: RwLock<Progress>,
    response_body: ResponseBody,
}

impl Exchange {
    pub fn new(id: u64, new: NewExchange, response_body: ResponseBody) -> Self {
        let curl = new.curl.unwrap_or_else(|| {
            crate::curl::to_curl(new.method, &new.url, &new.request_headers, &new.request_body)
        });
        Exchange {
            id,
            method: new.method,
            url: new.url,
            start_time: new.start_time,
            request_headers: new.request_headers,
            request_body: new.request_body,
            gql_operation: new.gql_operation,
            curl,
            progress: RwLock::new(Progress::default()),
            response_body,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn start_time(&self) -> i64 {
        self.start_time
    }

    pub fn request_headers(&self) -> &Headers {
        &self.request_headers
    }

    pub fn gql_operation(&self) -> Option<&str> {
        self.gql_operation.as_deref()
    }

    pub fn is_graphql(&self) -> bool {
        self.gql_operation.is_some()
    }

    /// The reproducible command-line equivalent of the request
    pub fn curl(&self) -> &str {
        &self.curl
    }

    pub fn raw_request_body(&self) -> &str {
        &self.request_body
    }

    /// Request body shaped for display; `graphql` extracts query/variables
    pub fn request_body(&self, graphql: bool) -> String {
        body::format_request_body(&self.request_body, graphql)
    }

    /// Consistent copy of the mutable fields
    pub fn progress(&self) -> Progress {
        self.progress
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn status(&self) -> i32 {
        self.progress
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .status
    }

    pub fn duration(&self) -> u64 {
        self.progress
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .duration
    }

    pub fn is_pending(&self) -> bool {
        self.status() < 0
    }

    pub fn response_headers(&self) -> Headers {
        self.progress
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .response_headers
            .clone()
    }

    pub fn response_body(&self) -> &ResponseBody {
        &self.response_body
    }

    /// Resolve the response body, waiting for it if necessary
    pub async fn resolve_response(&self) -> &str {
        self.response_body.resolve().await
    }

    pub(crate) fn set_response_headers(&self, headers: Headers) {
        let mut progress = self
            .progress
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        progress.response_headers = headers;
    }

    /// Status and duration are written together so a non-negative status
    /// never pairs with a stale duration
    pub(crate) fn complete(&self, status: i32, duration: u64) {
        let mut progress = self
            .progress
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        progress.status = status;
        progress.duration = duration;
    }
}

impl fmt::Debug for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exchange")
            .field("id", &self.id)
            .field("method", &self.method)
            .field("url", &self.url)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}
