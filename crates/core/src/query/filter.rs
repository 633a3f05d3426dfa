//! Artist filtering and free-text search.

use std::collections::BTreeSet;

use chrono::Datelike;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{tokenize, year_query};
use crate::Error;
use crate::model::Artist;
use crate::snapshot::Snapshot;

/// Validated filter predicates.
///
/// Construct through [`FilterRequest::resolve`], which guarantees
/// `min <= max` for both ranges, positive member counts and non-empty
/// location substrings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    pub creation_year_min: i32,
    pub creation_year_max: i32,
    pub first_album_year_min: i32,
    pub first_album_year_max: i32,
    /// Accepted member counts; empty accepts any.
    pub members: BTreeSet<usize>,
    /// Accepted location substrings, matched case-insensitively; empty accepts any.
    pub locations: Vec<String>,
}

impl FilterParams {
    /// The admission test every artist must pass before search matching.
    pub fn admits(&self, artist: &Artist, locations: &[String]) -> bool {
        if artist.creation_date < self.creation_year_min || artist.creation_date > self.creation_year_max {
            return false;
        }

        match artist.first_album_year() {
            Some(year) if year >= self.first_album_year_min && year <= self.first_album_year_max => {}
            _ => return false,
        }

        if !self.members.is_empty() && !self.members.contains(&artist.members.len()) {
            return false;
        }

        if !self.locations.is_empty() {
            let wanted: Vec<String> = self.locations.iter().map(|l| l.to_lowercase()).collect();
            let matched = locations.iter().any(|location| {
                let location = location.trim().to_lowercase();
                wanted.iter().any(|w| location.contains(w.as_str()))
            });
            if !matched {
                return false;
            }
        }

        true
    }
}

/// Filter parameters as sent by a caller; omitted fields take data-driven defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    /// Earliest creation year (default: earliest in the data).
    #[serde(default)]
    pub creation_year_min: Option<i32>,
    /// Latest creation year (default: current year).
    #[serde(default)]
    pub creation_year_max: Option<i32>,
    /// Earliest first-album year (default: earliest in the data).
    #[serde(default)]
    pub first_album_year_min: Option<i32>,
    /// Latest first-album year (default: current year).
    #[serde(default)]
    pub first_album_year_max: Option<i32>,
    /// Accepted member counts, each at least 1.
    #[serde(default)]
    pub members: Vec<i64>,
    /// Accepted location substrings, non-empty after trimming.
    #[serde(default)]
    pub locations: Vec<String>,
}

impl FilterRequest {
    /// Resolve against the snapshot using the current calendar year.
    pub fn resolve(&self, snapshot: &Snapshot) -> Result<FilterParams, Error> {
        self.resolve_at(snapshot, chrono::Utc::now().year())
    }

    /// Fill defaults, normalize and validate.
    ///
    /// Minima below the earliest year in the data are raised to it and maxima
    /// past `current_year` are lowered to it. Ranges are never swapped.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidFilter` if:
    /// - either range ends up with `min > max`
    /// - a member count is less than 1
    /// - a location is empty after trimming
    pub fn resolve_at(&self, snapshot: &Snapshot, current_year: i32) -> Result<FilterParams, Error> {
        let earliest_creation = snapshot
            .artists()
            .iter()
            .map(|a| a.creation_date)
            .fold(current_year, i32::min);
        let earliest_album = snapshot
            .artists()
            .iter()
            .filter_map(Artist::first_album_year)
            .fold(current_year, i32::min);

        let creation_year_min = self.creation_year_min.unwrap_or(earliest_creation).max(earliest_creation);
        let creation_year_max = self.creation_year_max.unwrap_or(current_year).min(current_year);
        if creation_year_min > creation_year_max {
            return Err(Error::InvalidFilter(format!(
                "invalid creation year range: min ({creation_year_min}) > max ({creation_year_max})"
            )));
        }

        let first_album_year_min = self.first_album_year_min.unwrap_or(earliest_album).max(earliest_album);
        let first_album_year_max = self.first_album_year_max.unwrap_or(current_year).min(current_year);
        if first_album_year_min > first_album_year_max {
            return Err(Error::InvalidFilter(format!(
                "invalid first album year range: min ({first_album_year_min}) > max ({first_album_year_max})"
            )));
        }

        let mut members = BTreeSet::new();
        for &count in &self.members {
            if count < 1 {
                return Err(Error::InvalidFilter(format!("invalid member count: {count} (must be positive)")));
            }
            members.insert(count as usize);
        }

        let mut locations = Vec::with_capacity(self.locations.len());
        for location in &self.locations {
            let location = location.trim();
            if location.is_empty() {
                return Err(Error::InvalidFilter("empty location not allowed".into()));
            }
            locations.push(location.to_string());
        }

        Ok(FilterParams {
            creation_year_min,
            creation_year_max,
            first_album_year_min,
            first_album_year_max,
            members,
            locations,
        })
    }
}

/// Artists that pass `params` and match `query`, in snapshot order.
///
/// An empty query matches every admitted artist. A query of exactly four
/// digits matches `creation_date` exactly. Otherwise every whitespace
/// separated token must be found in the name, a member, the first album date
/// or a concert location; different tokens may match different fields.
pub fn filter<'a>(snapshot: &'a Snapshot, query: &str, params: &FilterParams) -> Vec<&'a Artist> {
    let tokens = tokenize(query);
    let year = year_query(query);

    snapshot
        .artists()
        .iter()
        .filter(|artist| {
            let locations = snapshot.locations_for(artist.id);
            if !params.admits(artist, locations) {
                return false;
            }
            if tokens.is_empty() {
                return true;
            }
            match year {
                Some(year) => artist.creation_date == year,
                None => matches_tokens(artist, locations, &tokens),
            }
        })
        .collect()
}

fn matches_tokens(artist: &Artist, locations: &[String], tokens: &[String]) -> bool {
    let fields: Vec<String> = std::iter::once(&artist.name)
        .chain(&artist.members)
        .chain(std::iter::once(&artist.first_album))
        .chain(locations)
        .map(|field| field.to_lowercase())
        .collect();

    tokens
        .iter()
        .all(|token| fields.iter().any(|field| field.contains(token.as_str())))
}
