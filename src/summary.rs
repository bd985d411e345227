//! One-line summaries of exchanges for list rows and the detail header.

use chrono::{Local, TimeZone};

use crate::models::{Exchange, HttpMethod};

/// Coarse outcome of an exchange, used for coloring
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusClass {
    Pending,
    Good,
    Warning,
    Bad,
}

pub fn status_class(status: i32) -> StatusClass {
    match status {
        s if s < 0 => StatusClass::Pending,
        s if s < 400 => StatusClass::Good,
        s if s < 500 => StatusClass::Warning,
        _ => StatusClass::Bad,
    }
}

pub fn status_label(status: i32) -> String {
    if status > 0 {
        status.to_string()
    } else {
        String::from("(pending)")
    }
}

/// `850ms`, `1.25s`; empty for an unfinished exchange
pub fn format_duration(ms: u64) -> String {
    match ms {
        0 => String::new(),
        ms if ms < 1000 => format!("{}ms", ms),
        ms => format!("{:.2}s", ms as f64 / 1000.0),
    }
}

/// `HH:MM:SS` of an epoch-millis instant in `tz`; empty for the `0` sentinel
pub fn format_time_of_day<Tz: TimeZone>(epoch_ms: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    if epoch_ms == 0 {
        return String::new();
    }
    tz.timestamp_millis_opt(epoch_ms)
        .single()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Row data for one exchange
#[derive(Clone, Debug, PartialEq)]
pub struct ExchangeSummary {
    pub id: u64,
    pub method: HttpMethod,
    pub url: String,
    /// `12:30:01 (Me) | Status 200, 85ms`
    pub top_line: String,
    pub status_class: StatusClass,
}

pub fn summarize(exchange: &Exchange) -> ExchangeSummary {
    summarize_in(exchange, &Local)
}

pub fn summarize_in<Tz: TimeZone>(exchange: &Exchange, tz: &Tz) -> ExchangeSummary
where
    Tz::Offset: std::fmt::Display,
{
    let progress = exchange.progress();
    let mut top_line = format_time_of_day(exchange.start_time(), tz);
    if let Some(op) = exchange.gql_operation() {
        top_line.push_str(&format!(" ({})", op));
    }
    top_line.push_str(&format!(
        " | Status {}, {}",
        status_label(progress.status),
        format_duration(progress.duration)
    ));

    ExchangeSummary {
        id: exchange.id(),
        method: exchange.method(),
        url: exchange.url().to_string(),
        top_line,
        status_class: status_class(progress.status),
    }
}
