//! Upstream record types and the values assembled from them.
//!
//! Field names follow the upstream JSON (camelCase) so records deserialize
//! straight from the source payloads and serialize back unchanged.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A musical artist or band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    /// Stable identity used for every join.
    pub id: u32,
    /// Image URL, passed through untouched.
    #[serde(default)]
    pub image: String,
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
    /// Year the artist was formed.
    pub creation_date: i32,
    /// First album release date as `DD-MM-YYYY`.
    pub first_album: String,
    /// Opaque cross-reference to the locations source.
    #[serde(default)]
    pub locations: String,
    /// Opaque cross-reference to the dates source.
    #[serde(default)]
    pub concert_dates: String,
    /// Opaque cross-reference to the relations source.
    #[serde(default)]
    pub relations: String,
}

impl Artist {
    /// Year of the first album, if `first_album` is well formed.
    pub fn first_album_year(&self) -> Option<i32> {
        parse_first_album_year(&self.first_album)
    }
}

/// Extract the year from a `DD-MM-YYYY` date.
///
/// The string must split on `-` into exactly three fields and the third must
/// parse as an integer; anything else yields `None`.
pub fn parse_first_album_year(first_album: &str) -> Option<i32> {
    let parts: Vec<&str> = first_album.split('-').collect();
    if parts.len() != 3 {
        return None;
    }
    parts[2].parse().ok()
}

/// Concert locations of one artist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LocationRecord {
    pub id: u32,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub dates: String,
}

/// Concert dates of one artist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DateRecord {
    pub id: u32,
    #[serde(default)]
    pub dates: Vec<String>,
}

/// Location to dates mapping of one artist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelationRecord {
    pub id: u32,
    #[serde(default)]
    pub dates_locations: BTreeMap<String, Vec<String>>,
}

/// A resolved address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GeoLocation {
    pub address: String,
    pub lat: f64,
    pub lon: f64,
}

/// One artist joined with its sub-records and geocoded locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ArtistDetail {
    pub artist: Artist,
    pub locations: Vec<GeoLocation>,
    pub dates: Vec<String>,
    pub relations: BTreeMap<String, Vec<String>>,
}
