//! Ranked search suggestions.

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{contains_all, tokenize};
use crate::snapshot::Snapshot;

/// Which field a suggestion came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum SuggestionKind {
    #[serde(rename = "artist/band")]
    Artist,
    #[serde(rename = "member")]
    Member,
    #[serde(rename = "location")]
    Location,
    #[serde(rename = "creation date")]
    CreationDate,
    #[serde(rename = "first album")]
    FirstAlbum,
}

impl SuggestionKind {
    /// Sort priority; lower ranks first.
    pub fn priority(self) -> u8 {
        match self {
            SuggestionKind::Artist => 1,
            SuggestionKind::Member => 2,
            SuggestionKind::Location => 3,
            SuggestionKind::CreationDate => 4,
            SuggestionKind::FirstAlbum => 5,
        }
    }
}

/// A suggested completion. Two suggestions are the same only if both text and kind match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Suggestion {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
}

impl Suggestion {
    fn new(text: &str, kind: SuggestionKind) -> Self {
        Self { text: text.to_string(), kind }
    }

    /// Sort key against a lower-cased query.
    ///
    /// Exact matches first, then kind priority, then shorter text, then text.
    /// Distinct suggestions never share a key.
    pub fn rank<'a>(&'a self, query_lower: &str) -> (bool, u8, usize, &'a str) {
        (
            self.text.to_lowercase() != query_lower,
            self.kind.priority(),
            self.text.chars().count(),
            self.text.as_str(),
        )
    }
}

/// Suggestions for `query`, best first.
///
/// Every field where all query tokens occur yields a suggestion; creation
/// years are matched against the raw query verbatim instead. A member or
/// location hit also suggests the artist it belongs to.
pub fn suggest(snapshot: &Snapshot, query: &str) -> Vec<Suggestion> {
    let query = query.trim();
    let tokens = tokenize(query);
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut found = HashSet::new();
    for artist in snapshot.artists() {
        if contains_all(&artist.name, &tokens) {
            found.insert(Suggestion::new(&artist.name, SuggestionKind::Artist));
        }

        for member in &artist.members {
            if contains_all(member, &tokens) {
                found.insert(Suggestion::new(member, SuggestionKind::Member));
                found.insert(Suggestion::new(&artist.name, SuggestionKind::Artist));
            }
        }

        for location in snapshot.locations_for(artist.id) {
            let location = location.trim();
            if contains_all(location, &tokens) {
                found.insert(Suggestion::new(location, SuggestionKind::Location));
                found.insert(Suggestion::new(&artist.name, SuggestionKind::Artist));
            }
        }

        if contains_all(&artist.first_album, &tokens) {
            found.insert(Suggestion::new(&artist.first_album, SuggestionKind::FirstAlbum));
        }

        let year = artist.creation_date.to_string();
        if year.contains(query) {
            found.insert(Suggestion::new(&year, SuggestionKind::CreationDate));
        }
    }

    let query_lower = query.to_lowercase();
    let mut suggestions: Vec<Suggestion> = found.into_iter().collect();
    suggestions.sort_unstable_by(|a, b| a.rank(&query_lower).cmp(&b.rank(&query_lower)));
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::fixtures::catalogue;

    fn texts(suggestions: &[Suggestion]) -> Vec<(&str, SuggestionKind)> {
        suggestions.iter().map(|s| (s.text.as_str(), s.kind)).collect()
    }

    #[test]
    fn test_empty_query_yields_nothing() {
        let snapshot = catalogue();
        assert!(suggest(&snapshot, "").is_empty());
        assert!(suggest(&snapshot, "   ").is_empty());
    }

    #[test]
    fn test_exact_artist_match_comes_first() {
        let snapshot = catalogue();
        let suggestions = suggest(&snapshot, "queen");

        assert_eq!(suggestions[0], Suggestion::new("Queen", SuggestionKind::Artist));
        // "queens-usa" belongs to Gorillaz, which is suggested as its artist
        assert_eq!(
            texts(&suggestions),
            vec![
                ("Queen", SuggestionKind::Artist),
                ("Gorillaz", SuggestionKind::Artist),
                ("queens-usa", SuggestionKind::Location),
            ]
        );
    }

    #[test]
    fn test_member_match_surfaces_artist() {
        let snapshot = catalogue();
        let suggestions = suggest(&snapshot, "grohl");

        assert_eq!(
            texts(&suggestions),
            vec![("Nirvana", SuggestionKind::Artist), ("Dave Grohl", SuggestionKind::Member)]
        );
    }

    #[test]
    fn test_same_text_in_two_kinds_is_kept_twice() {
        let snapshot = catalogue();

        for query in ["bobby", "bobby mcferrin"] {
            let suggestions = suggest(&snapshot, query);
            assert_eq!(
                texts(&suggestions),
                vec![("Bobby McFerrin", SuggestionKind::Artist), ("Bobby McFerrin", SuggestionKind::Member)]
            );
        }
    }

    #[test]
    fn test_locations_are_deduplicated_and_trimmed() {
        let snapshot = catalogue();
        let suggestions = suggest(&snapshot, "london");

        let london: Vec<_> = suggestions
            .iter()
            .filter(|s| s.kind == SuggestionKind::Location)
            .collect();
        assert_eq!(london.len(), 1);
        assert_eq!(london[0].text, "london-uk");
        // artists first, shorter names before longer ones
        assert_eq!(
            texts(&suggestions),
            vec![
                ("Queen", SuggestionKind::Artist),
                ("Gorillaz", SuggestionKind::Artist),
                ("Pink Floyd", SuggestionKind::Artist),
                ("london-uk", SuggestionKind::Location),
            ]
        );
    }

    #[test]
    fn test_creation_date_matches_raw_query() {
        let snapshot = catalogue();
        let suggestions = suggest(&snapshot, "199");

        assert_eq!(
            texts(&suggestions),
            vec![
                ("1990", SuggestionKind::CreationDate),
                ("1998", SuggestionKind::CreationDate),
                ("23-06-1995", SuggestionKind::FirstAlbum),
            ]
        );
    }

    #[test]
    fn test_exact_match_beats_kind_priority() {
        let snapshot = catalogue();
        let suggestions = suggest(&snapshot, "1965");
        assert_eq!(suggestions[0], Suggestion::new("1965", SuggestionKind::CreationDate));

        let suggestions = suggest(&snapshot, "05-08-1967");
        assert_eq!(texts(&suggestions), vec![("05-08-1967", SuggestionKind::FirstAlbum)]);
    }

    #[test]
    fn test_rank_is_a_total_order() {
        let a = Suggestion::new("Nirvana", SuggestionKind::Artist);
        let b = Suggestion::new("Nirvana", SuggestionKind::Member);
        let c = Suggestion::new("Nirvanb", SuggestionKind::Artist);

        assert!(a.rank("x") < b.rank("x"));
        assert!(a.rank("x") < c.rank("x"));
        assert!(b.rank("nirvana") < c.rank("nirvana"));
        assert_ne!(a.rank("x"), b.rank("x"));
    }
}
