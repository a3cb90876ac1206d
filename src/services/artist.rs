use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::datetime::DateFormat;
use crate::ports::listing_store::{Artist, ListingStore, StoreResult};
use crate::services::SearchResults;
use crate::services::schedule::{ShowBuckets, VenueBooking, partition_shows};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistSummary {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistDetail {
    #[serde(flatten)]
    pub artist: Artist,
    #[serde(flatten)]
    pub shows: ShowBuckets<VenueBooking>,
}

pub struct ArtistService {
    store: Arc<dyn ListingStore>,
    date_format: DateFormat,
}

impl ArtistService {
    pub fn new(store: Arc<dyn ListingStore>, date_format: DateFormat) -> Self {
        Self { store, date_format }
    }

    pub async fn list(&self) -> StoreResult<Vec<ArtistSummary>> {
        let artists = self.store.list_artists().await?;
        Ok(artists
            .into_iter()
            .map(|artist| ArtistSummary {
                id: artist.id,
                name: artist.name,
            })
            .collect())
    }

    pub async fn search(&self, term: &str) -> StoreResult<SearchResults<Artist>> {
        let artists = self.store.search_artists(term).await?;
        Ok(SearchResults::new(artists))
    }

    pub async fn detail(&self, id: i64, now: NaiveDateTime) -> StoreResult<ArtistDetail> {
        let artist = self.store.find_artist(id).await?;
        let shows = self.store.artist_shows(id).await?;
        let format = self.date_format;

        Ok(ArtistDetail {
            artist,
            shows: partition_shows(shows, now, |show| VenueBooking::from_scheduled(show, format)),
        })
    }
}
