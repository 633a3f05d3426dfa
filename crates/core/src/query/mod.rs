//! In-memory query engine over a [`Snapshot`](crate::Snapshot).
//!
//! Everything here is a pure function of the snapshot it is handed; nothing
//! is cached between calls and the snapshot is never mutated.

mod filter;
mod suggest;

pub use filter::{FilterParams, FilterRequest, filter};
pub use suggest::{Suggestion, SuggestionKind, suggest};

/// Lower-case the query and split it on whitespace.
pub(crate) fn tokenize(query: &str) -> Vec<String> {
    query.to_lowercase().split_whitespace().map(str::to_owned).collect()
}

/// Whether every token is a case-insensitive substring of `text`.
pub(crate) fn contains_all(text: &str, tokens: &[String]) -> bool {
    let text = text.to_lowercase();
    tokens.iter().all(|token| text.contains(token.as_str()))
}

/// A four-character query that parses as an integer (sign allowed) is a year.
pub(crate) fn year_query(query: &str) -> Option<i32> {
    let query = query.trim();
    if query.len() == 4 { query.parse().ok() } else { None }
}
