use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::datetime::DateFormat;
use crate::ports::listing_store::{ListingStore, Location, StoreResult, Venue};
use crate::services::SearchResults;
use crate::services::schedule::{ArtistAppearance, ShowBuckets, partition_shows};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueSummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: u64,
}

/// Venues sharing one (city, state) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationGroup {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueDetail {
    #[serde(flatten)]
    pub venue: Venue,
    #[serde(flatten)]
    pub shows: ShowBuckets<ArtistAppearance>,
}

/// Place every venue in the group of its (city, state).
///
/// Groups follow the order of `locations`; a venue whose location is not
/// listed gets a trailing group of its own. Groups without venues are dropped.
pub fn group_by_location(
    locations: &[Location],
    venues: Vec<Venue>,
    upcoming: &HashMap<i64, u64>,
) -> Vec<LocationGroup> {
    let mut groups: Vec<LocationGroup> = Vec::with_capacity(locations.len());
    let mut index: HashMap<Location, usize> = HashMap::with_capacity(locations.len());

    for location in locations {
        if index.contains_key(location) {
            continue;
        }
        index.insert(location.clone(), groups.len());
        groups.push(LocationGroup {
            city: location.city.clone(),
            state: location.state.clone(),
            venues: Vec::new(),
        });
    }

    for venue in venues {
        let location = venue.location();
        let slot = match index.get(&location) {
            Some(&slot) => slot,
            None => {
                index.insert(location.clone(), groups.len());
                groups.push(LocationGroup {
                    city: location.city,
                    state: location.state,
                    venues: Vec::new(),
                });
                groups.len() - 1
            }
        };
        groups[slot].venues.push(VenueSummary {
            num_upcoming_shows: upcoming.get(&venue.id).copied().unwrap_or(0),
            id: venue.id,
            name: venue.name,
        });
    }

    groups.retain(|group| !group.venues.is_empty());
    groups
}

pub struct VenueService {
    store: Arc<dyn ListingStore>,
    date_format: DateFormat,
}

impl VenueService {
    pub fn new(store: Arc<dyn ListingStore>, date_format: DateFormat) -> Self {
        Self { store, date_format }
    }

    pub async fn venues_by_location(&self, now: NaiveDateTime) -> StoreResult<Vec<LocationGroup>> {
        let locations = self.store.venue_locations().await?;
        let venues = self.store.list_venues().await?;
        let upcoming = self.store.upcoming_show_counts(now).await?;

        Ok(group_by_location(&locations, venues, &upcoming))
    }

    pub async fn search(&self, term: &str) -> StoreResult<SearchResults<Venue>> {
        let venues = self.store.search_venues(term).await?;
        Ok(SearchResults::new(venues))
    }

    pub async fn detail(&self, id: i64, now: NaiveDateTime) -> StoreResult<VenueDetail> {
        let venue = self.store.find_venue(id).await?;
        let shows = self.store.venue_shows(id).await?;
        let format = self.date_format;

        Ok(VenueDetail {
            venue,
            shows: partition_shows(shows, now, |show| {
                ArtistAppearance::from_scheduled(show, format)
            }),
        })
    }
}
