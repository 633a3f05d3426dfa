//! The immutable, atomically swapped bundle of all four datasets.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use crate::model::{Artist, DateRecord, LocationRecord, RelationRecord};

/// All four upstream datasets as fetched by one refresh.
///
/// A snapshot is never mutated after construction; a refresh builds a new one
/// and swaps it in whole. Per-artist lookups go through id indices built here
/// once, so joins never scan the sub-collections.
#[derive(Debug, Clone)]
pub struct Snapshot {
    artists: Vec<Artist>,
    locations: Vec<LocationRecord>,
    dates: Vec<DateRecord>,
    relations: Vec<RelationRecord>,
    fetched_at: DateTime<Utc>,
    artist_index: HashMap<u32, usize>,
    location_index: HashMap<u32, usize>,
    date_index: HashMap<u32, usize>,
    relation_index: HashMap<u32, usize>,
}

impl Snapshot {
    pub fn new(
        artists: Vec<Artist>, locations: Vec<LocationRecord>, dates: Vec<DateRecord>, relations: Vec<RelationRecord>,
    ) -> Self {
        let (artists, artist_index) = first_per_id("artists", artists, |a| a.id);
        let (locations, location_index) = first_per_id("locations", locations, |l| l.id);
        let (dates, date_index) = first_per_id("dates", dates, |d| d.id);
        let (relations, relation_index) = first_per_id("relations", relations, |r| r.id);

        Self {
            artists,
            locations,
            dates,
            relations,
            fetched_at: Utc::now(),
            artist_index,
            location_index,
            date_index,
            relation_index,
        }
    }

    /// Artists in upstream order.
    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn len(&self) -> usize {
        self.artists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artists.is_empty()
    }

    /// Look up an artist. Id 0 never matches.
    pub fn artist(&self, id: u32) -> Option<&Artist> {
        if id == 0 {
            return None;
        }
        self.artist_index.get(&id).map(|&i| &self.artists[i])
    }

    /// Concert locations joined by id; empty when the artist has no record.
    pub fn locations_for(&self, id: u32) -> &[String] {
        self.location_index
            .get(&id)
            .map(|&i| self.locations[i].locations.as_slice())
            .unwrap_or_default()
    }

    /// Concert dates joined by id; empty when the artist has no record.
    pub fn dates_for(&self, id: u32) -> &[String] {
        self.date_index
            .get(&id)
            .map(|&i| self.dates[i].dates.as_slice())
            .unwrap_or_default()
    }

    /// Location to dates mapping joined by id.
    pub fn relations_for(&self, id: u32) -> Option<&BTreeMap<String, Vec<String>>> {
        self.relation_index
            .get(&id)
            .map(|&i| &self.relations[i].dates_locations)
    }
}

/// Drop records whose id was already seen and index the rest by id.
fn first_per_id<T>(dataset: &'static str, records: Vec<T>, id_of: fn(&T) -> u32) -> (Vec<T>, HashMap<u32, usize>) {
    let mut kept = Vec::with_capacity(records.len());
    let mut index = HashMap::with_capacity(records.len());
    for record in records {
        let id = id_of(&record);
        if index.contains_key(&id) {
            tracing::warn!(dataset, id, "duplicate record id in upstream payload; keeping the first");
            continue;
        }
        index.insert(id, kept.len());
        kept.push(record);
    }
    (kept, index)
}
