//! Visible-subset predicate: which exchanges match the current search and filter.

use std::sync::Arc;

use crate::app::store::SearchState;
use crate::constants::DEFAULT_ERROR_STATUS;
use crate::models::{Exchange, Filter};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchOptions {
    /// Statuses at or above this are errors; pending is never an error
    pub error_status: i32,
    pub search_request_body: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        MatchOptions {
            error_status: DEFAULT_ERROR_STATUS,
            search_request_body: false,
        }
    }
}

/// Case-insensitive substring match on URL and GraphQL operation name
pub fn matches_search(exchange: &Exchange, search: &str, options: MatchOptions) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);

    contains(exchange.url())
        || exchange.gql_operation().is_some_and(contains)
        || (options.search_request_body && contains(exchange.raw_request_body()))
}

pub fn matches_filter(exchange: &Exchange, filter: &Filter, options: MatchOptions) -> bool {
    let status = exchange.status();
    let method_ok = filter.methods.is_empty() || filter.methods.contains(&exchange.method());
    let status_ok = filter.status.map_or(true, |wanted| wanted == status);
    let errors_ok = !filter.status_errors || (status >= 0 && status >= options.error_status);
    method_ok && status_ok && errors_ok
}

pub fn is_visible(exchange: &Exchange, state: &SearchState, options: MatchOptions) -> bool {
    matches_search(exchange, &state.search, options) && matches_filter(exchange, &state.filter, options)
}

/// The exchanges to show, in list order
pub fn visible(exchanges: &[Arc<Exchange>], state: &SearchState, options: MatchOptions) -> Vec<Arc<Exchange>> {
    exchanges
        .iter()
        .filter(|e| is_visible(e, state, options))
        .cloned()
        .collect()
}
