use crate::models::{Headers, HttpMethod};

/// Quote for a POSIX shell: single quotes, with embedded quotes closed and reopened
fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

/// Format a captured request as a cURL command
pub fn to_curl(method: HttpMethod, url: &str, headers: &Headers, body: &str) -> String {
    let mut parts = vec!["curl".to_string()];

    match method {
        HttpMethod::GET => {}
        HttpMethod::HEAD => parts.push("-I".to_string()),
        other => parts.push(format!("-X {}", other.as_str())),
    }

    parts.push(shell_quote(url));

    for (name, value) in headers.iter() {
        parts.push(format!("-H {}", shell_quote(&format!("{}: {}", name, value))));
    }

    if !body.is_empty() {
        parts.push(format!("--data-raw {}", shell_quote(body)));
    }

    parts.join(" \\\n  ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_get() {
        let curl = to_curl(HttpMethod::GET, "https://api.example.com/users", &Headers::new(), "");
        assert_eq!(curl, "curl 'https://api.example.com/users'");
    }

    #[test]
    fn test_post_with_headers_and_body() {
        let headers: Headers = vec![("Content-Type", "application/json")].into_iter().collect();
        let curl = to_curl(
            HttpMethod::POST,
            "https://api.example.com/users",
            &headers,
            r#"{"name":"o'brien"}"#,
        );
        assert_eq!(
            curl,
            "curl \\\n  -X POST \\\n  'https://api.example.com/users' \\\n  \
             -H 'Content-Type: application/json' \\\n  \
             --data-raw '{\"name\":\"o'\\''brien\"}'"
        );
    }

    #[test]
    fn test_head_uses_flag() {
        let curl = to_curl(HttpMethod::HEAD, "https://x.test", &Headers::new(), "");
        assert_eq!(curl, "curl \\\n  -I \\\n  'https://x.test'");
    }
}
