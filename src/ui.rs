use ratatui::{prelude::*, widgets::*};

use crate::models::{Filter, Headers, HttpMethod};
use crate::summary::StatusClass;

/// Renders tabs
pub fn render_tabs<'a>(titles: &[&'a str], selected: usize) -> Tabs<'a> {
    let titles: Vec<Line> = titles.iter().map(|t| Line::from(*t)).collect();

    Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Green).bold())
        .divider("|")
}

/// Bold names over italic values, as in a header section
pub fn key_value_lines(headers: &Headers) -> Vec<Line<'static>> {
    if headers.is_empty() {
        return vec![Line::from(Span::styled(
            "(none)",
            Style::default().fg(Color::DarkGray),
        ))];
    }

    let mut lines = Vec::with_capacity(headers.len() * 2);
    for (name, value) in headers.iter() {
        lines.push(Line::from(Span::styled(name.to_string(), Style::default().bold())));
        lines.push(Line::from(Span::styled(
            value.to_string(),
            Style::default().italic(),
        )));
    }
    lines
}

/// Short description of the active criteria, e.g. `GET,POST | 404 | errors`
pub fn filter_badge(filter: &Filter) -> String {
    let mut parts = Vec::new();
    if !filter.methods.is_empty() {
        let methods: Vec<&str> = filter.methods.iter().map(HttpMethod::as_str).collect();
        parts.push(methods.join(","));
    }
    if let Some(status) = filter.status {
        parts.push(status.to_string());
    }
    if filter.status_errors {
        parts.push(String::from("errors"));
    }
    parts.join(" | ")
}

/// Status color
pub fn status_color(class: StatusClass) -> Color {
    match class {
        StatusClass::Pending => Color::White,
        StatusClass::Good => Color::Green,
        StatusClass::Warning => Color::Yellow,
        StatusClass::Bad => Color::Red,
    }
}

/// Method color
pub fn method_color(method: HttpMethod) -> Color {
    match method {
        HttpMethod::GET => Color::Green,
        HttpMethod::POST => Color::Yellow,
        HttpMethod::PUT => Color::Blue,
        HttpMethod::PATCH => Color::Cyan,
        HttpMethod::DELETE => Color::Red,
        HttpMethod::HEAD => Color::Magenta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_badge() {
        assert_eq!(filter_badge(&Filter::default()), "");
        let filter = Filter::default()
            .with_methods([HttpMethod::POST, HttpMethod::GET])
            .with_status(404)
            .errors_only();
        assert_eq!(filter_badge(&filter), "GET,POST | 404 | errors");
    }

    #[test]
    fn test_key_value_lines() {
        let headers: Headers = vec![("Accept", "*/*")].into_iter().collect();
        assert_eq!(key_value_lines(&headers).len(), 2);
        assert_eq!(key_value_lines(&Headers::new()).len(), 1);
    }
}
