//! Query-string decoding for display.
//!
//! Values that are JSON arrays (`ids=[1,2,3]`) are shown as their elements
//! joined with ", "; anything else is shown exactly as it was sent.

use serde_json::Value;
use url::form_urlencoded;
use url::Url;

use crate::models::Headers;

/// Decode the query component of `url` into display pairs.
///
/// Repeated keys keep their first position and take the last value.
/// Unparseable URLs fall back to whatever follows the first `?`.
pub fn decode_query(url: &str) -> Headers {
    let mut params = Headers::new();
    let Some(query) = query_component(url) else {
        return params;
    };

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        params.insert(key.into_owned(), display_value(&value));
    }
    params
}

/// Display form of a single query value
pub fn display_value(raw: &str) -> String {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items.iter().map(element_text).collect::<Vec<_>>().join(", "),
        _ => raw.to_string(),
    }
}

fn element_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Array(items) => items.iter().map(element_text).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

fn query_component(url: &str) -> Option<String> {
    match Url::parse(url) {
        Ok(parsed) => parsed.query().map(str::to_string),
        Err(err) => {
            tracing::debug!(%url, error = %err, "URL did not parse, splitting query by hand");
            let (_, rest) = url.split_once('?')?;
            let query = rest.split('#').next().unwrap_or(rest);
            Some(query.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(headers: &Headers) -> Vec<(&str, &str)> {
        headers.iter().collect()
    }

    #[test]
    fn test_json_array_values_are_joined() {
        let params = decode_query("https://api.example.com/items?a=[1,2,3]&b=hello");
        assert_eq!(pairs(&params), vec![("a", "1, 2, 3"), ("b", "hello")]);
    }

    #[test]
    fn test_non_json_value_is_unchanged() {
        let params = decode_query("https://api.example.com/?a=not-json");
        assert_eq!(pairs(&params), vec![("a", "not-json")]);
    }

    #[test]
    fn test_json_non_array_keeps_raw_value() {
        let params = decode_query(r#"https://x.test/?n=42&o={"k":1}&s="quoted""#);
        assert_eq!(
            pairs(&params),
            vec![("n", "42"), ("o", r#"{"k":1}"#), ("s", "\"quoted\"")]
        );
    }

    #[test]
    fn test_percent_encoded_array() {
        let params = decode_query("https://x.test/?tags=%5B%22a%22%2C%22b%22%5D&q=two+words");
        assert_eq!(pairs(&params), vec![("tags", "a, b"), ("q", "two words")]);
    }

    #[test]
    fn test_array_element_rendering() {
        assert_eq!(display_value(r#"["x",null,true,[1,2],{"k":1}]"#), r#"x, , true, 1,2, {"k":1}"#);
        assert_eq!(display_value("[]"), "");
    }

    #[test]
    fn test_repeated_key_last_wins() {
        let params = decode_query("https://x.test/?a=1&b=2&a=3");
        assert_eq!(pairs(&params), vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_relative_and_missing_query() {
        assert!(decode_query("https://x.test/path").is_empty());
        assert!(decode_query("not a url").is_empty());
        let params = decode_query("/graphql?op=Me#frag");
        assert_eq!(pairs(&params), vec![("op", "Me")]);
    }

    #[test]
    fn test_malformed_values_never_panic() {
        let params = decode_query("https://x.test/?a=[1,2&b=%ZZ&=empty&c");
        assert_eq!(params.get("a"), Some("[1,2"));
        assert_eq!(params.get("c"), Some(""));
        assert_eq!(params.get(""), Some("empty"));
    }
}
