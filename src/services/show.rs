use std::sync::Arc;

use serde::Serialize;

use crate::ports::listing_store::{ListingStore, ShowListing, StoreResult};

/// One row of the shows page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowRow {
    pub show_id: i64,
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

impl From<ShowListing> for ShowRow {
    fn from(listing: ShowListing) -> Self {
        Self {
            show_id: listing.show_id,
            venue_id: listing.venue_id,
            venue_name: listing.venue_name,
            artist_id: listing.artist_id,
            artist_name: listing.artist_name,
            artist_image_link: listing.artist_image_link,
            start_time: listing.start_time.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

pub struct ShowService {
    store: Arc<dyn ListingStore>,
}

impl ShowService {
    pub fn new(store: Arc<dyn ListingStore>) -> Self {
        Self { store }
    }

    pub async fn listing(&self) -> StoreResult<Vec<ShowRow>> {
        let shows = self.store.list_shows().await?;
        Ok(shows.into_iter().map(ShowRow::from).collect())
    }
}
