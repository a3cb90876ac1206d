use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDateTime;
use sea_orm::DbErr;
use serde::Serialize;

/// Which kind of record a store operation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntityKind {
    Venue,
    Artist,
    Show,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Venue => "Venue",
            EntityKind::Artist => "Artist",
            EntityKind::Show => "Show",
        })
    }
}

/// The write that was attempted, phrased the way users read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAction {
    Listed,
    Updated,
    Deleted,
}

impl fmt::Display for WriteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WriteAction::Listed => "listed",
            WriteAction::Updated => "updated",
            WriteAction::Deleted => "deleted",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: i64 },
    #[error("{kind} {name} could not be {action}")]
    WriteFailed {
        kind: EntityKind,
        name: String,
        action: WriteAction,
        #[source]
        source: DbErr,
    },
    #[error("Failed to query {kind} records")]
    Query {
        kind: EntityKind,
        #[source]
        source: DbErr,
    },
}

impl StoreError {
    pub fn query(kind: EntityKind) -> impl FnOnce(DbErr) -> Self {
        move |source| StoreError::Query { kind, source }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A distinct (city, state) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Location {
    pub city: String,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Venue {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl Venue {
    pub fn location(&self) -> Location {
        Location {
            city: self.city.clone(),
            state: self.state.clone(),
        }
    }
}

/// Venue fields as submitted for insert or update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VenueDraft {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

/// Artist fields as submitted for insert or update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistDraft {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Show {
    pub id: i64,
    pub artist_id: i64,
    pub venue_id: i64,
    pub start_time: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowDraft {
    pub artist_id: i64,
    pub venue_id: i64,
    pub start_time: NaiveDateTime,
}

/// A show seen from one side: the other party plus the start time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledShow {
    pub counterpart_id: i64,
    pub counterpart_name: String,
    pub counterpart_image_link: Option<String>,
    pub start_time: NaiveDateTime,
}

/// One show joined with both of its parties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowListing {
    pub show_id: i64,
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: NaiveDateTime,
}

/// Data-access port for the listings directory.
///
/// Implemented by `database::Database` (production) or test mocks. Every write
/// is all-or-nothing.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ListingStore: Send + Sync {
    async fn find_venue(&self, id: i64) -> StoreResult<Venue>;

    async fn list_venues(&self) -> StoreResult<Vec<Venue>>;

    async fn search_venues(&self, term: &str) -> StoreResult<Vec<Venue>>;

    async fn venue_locations(&self) -> StoreResult<Vec<Location>>;

    /// Number of shows at or after `now`, keyed by venue id.
    async fn upcoming_show_counts(&self, now: NaiveDateTime) -> StoreResult<HashMap<i64, u64>>;

    /// Shows at a venue with their artists, ordered by start time.
    async fn venue_shows(&self, venue_id: i64) -> StoreResult<Vec<ScheduledShow>>;

    async fn insert_venue(&self, draft: VenueDraft) -> StoreResult<Venue>;

    async fn update_venue(&self, id: i64, draft: VenueDraft) -> StoreResult<Venue>;

    /// Returns the deleted venue's name.
    async fn delete_venue(&self, id: i64) -> StoreResult<String>;

    async fn find_artist(&self, id: i64) -> StoreResult<Artist>;

    async fn list_artists(&self) -> StoreResult<Vec<Artist>>;

    async fn search_artists(&self, term: &str) -> StoreResult<Vec<Artist>>;

    /// Shows of an artist with their venues, ordered by start time.
    async fn artist_shows(&self, artist_id: i64) -> StoreResult<Vec<ScheduledShow>>;

    async fn insert_artist(&self, draft: ArtistDraft) -> StoreResult<Artist>;

    async fn update_artist(&self, id: i64, draft: ArtistDraft) -> StoreResult<Artist>;

    /// Returns the deleted artist's name.
    async fn delete_artist(&self, id: i64) -> StoreResult<String>;

    async fn list_shows(&self) -> StoreResult<Vec<ShowListing>>;

    async fn insert_show(&self, draft: ShowDraft) -> StoreResult<Show>;
}
