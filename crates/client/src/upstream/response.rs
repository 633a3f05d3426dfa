//! Upstream payload envelopes.

use serde::Deserialize;

/// A dataset list as served upstream.
///
/// The per-artist sources wrap their records as `{"index": [...]}` while the
/// artists source serves a bare list; both shapes are accepted everywhere.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum IndexEnvelope<T> {
    Bare(Vec<T>),
    Wrapped { index: Vec<T> },
}

impl<T> IndexEnvelope<T> {
    pub fn into_records(self) -> Vec<T> {
        match self {
            IndexEnvelope::Bare(records) => records,
            IndexEnvelope::Wrapped { index } => index,
        }
    }
}
