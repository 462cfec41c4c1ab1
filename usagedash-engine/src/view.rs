//! Plain-text rendering of session and overview state.

use chrono::{DateTime, Utc};

use crate::session::SearchSnapshot;

pub const NO_DASHBOARD_DATA: &str = "No dashboard data available";
pub const NO_SEARCH_YET: &str = "No search performed yet";
pub const NO_RESULTS: &str = "No Results Found";
pub const NO_EVENT_TYPES: &str = "No event type data available";
pub const NO_COMPANIES: &str = "No company data available";
pub const NO_TIME_SERIES: &str = "No time series data available";
pub const NO_RECENT_EVENTS: &str = "No recent events available";

pub const ALL_COMPANIES: &str = "All Companies";
pub const ALL_EVENT_TYPES: &str = "All Event Types";

/// Status line above the search results.
///
/// An error wins over everything else, then an in-flight search, then the
/// counts of the current page.
pub fn results_header(snapshot: &SearchSnapshot) -> String {
    if let Some(error) = &snapshot.error {
        return error.clone();
    }
    if snapshot.loading {
        return "Searching...".to_string();
    }
    let Some(results) = &snapshot.results else {
        return NO_SEARCH_YET.to_string();
    };

    let mut header = format!(
        "Showing {} of {} filtered results",
        results.events.len(),
        results.filtered_count
    );
    if results.is_narrowed() {
        header.push_str(&format!(" (from {} total events)", results.total_count));
    }
    if snapshot.has_active_filters {
        header.push_str(" • Filters active");
    }
    header
}

/// Button label of a multi-select: the placeholder, the only value, or a count.
pub fn selection_label(values: Option<&[String]>, placeholder: &str) -> String {
    match values.unwrap_or_default() {
        [] => placeholder.to_string(),
        [single] => single.clone(),
        many => format!("{} selected", many.len()),
    }
}

/// Wraps every case-insensitive occurrence of `term` in `content` with `mark`.
pub fn highlight_matches<F>(content: &str, term: Option<&str>, mark: F) -> String
where
    F: Fn(&str) -> String,
{
    let Some(term) = term.filter(|term| !term.is_empty()) else {
        return content.to_string();
    };

    // ASCII folding keeps byte offsets aligned with `content`.
    let haystack = content.to_ascii_lowercase();
    let needle = term.to_ascii_lowercase();

    let mut highlighted = String::with_capacity(content.len());
    let mut cursor = 0;
    while let Some(found) = haystack[cursor..].find(&needle) {
        let start = cursor + found;
        let end = start + needle.len();
        highlighted.push_str(&content[cursor..start]);
        highlighted.push_str(&mark(&content[start..end]));
        cursor = end;
    }
    highlighted.push_str(&content[cursor..]);
    highlighted
}

pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M").to_string()
}
