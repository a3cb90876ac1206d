use color_eyre::{Result, eyre::Context};
use migration::MigratorTrait;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectOptions, ConnectionTrait,
    Database as SeaDatabase, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use chrono::NaiveDateTime;

use crate::entities::{artist, show, venue};
use crate::ports::listing_store::{
    Artist, ArtistDraft, EntityKind, ListingStore, Location, ScheduledShow, Show, ShowDraft,
    ShowListing, StoreError, StoreResult, Venue, VenueDraft, WriteAction,
};
use crate::text_search::TextSearch;

pub struct Database {
    pub(crate) conn: DatabaseConnection,
}

impl Database {
    /// Open or create a database at the given path
    pub async fn open(path: &Path) -> Result<Self> {
        log::debug!("Opening database at: {}", path.display());

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).context(format!(
                "Failed to create database directory: {}",
                parent.display()
            ))?;
        }

        // Create SQLite connection URL
        let url = format!("sqlite://{}?mode=rwc", path.display());

        // Configure connection options
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(16)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(8))
            .acquire_timeout(Duration::from_secs(8))
            .sqlx_logging(false);

        let conn = SeaDatabase::connect(opt)
            .await
            .context(format!("Failed to open database: {}", path.display()))?;

        Self::prepare(conn).await
    }

    /// Enable foreign keys and bring the schema up to date
    pub(crate) async fn prepare(conn: DatabaseConnection) -> Result<Self> {
        conn.execute_unprepared("PRAGMA foreign_keys = ON")
            .await
            .context("Failed to enable foreign keys")?;

        log::debug!("Running database migrations");
        migration::Migrator::up(&conn, None)
            .await
            .context("Failed to run database migrations")?;

        log::info!("Database ready");
        Ok(Database { conn })
    }
}

// ========== Record Conversion ==========

pub(crate) fn encode_genres(genres: &[String]) -> String {
    serde_json::Value::from(genres.to_vec()).to_string()
}

/// Genres are stored as a JSON array; anything else is read as a comma list.
fn decode_genres(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_else(|_| {
        raw.trim_matches(|c| c == '{' || c == '}')
            .split(',')
            .map(str::trim)
            .filter(|genre| !genre.is_empty())
            .map(str::to_owned)
            .collect()
    })
}

impl From<venue::Model> for Venue {
    fn from(model: venue::Model) -> Self {
        Venue {
            id: model.id,
            genres: decode_genres(&model.genres),
            name: model.name,
            city: model.city,
            state: model.state,
            address: model.address,
            phone: model.phone,
            image_link: model.image_link,
            facebook_link: model.facebook_link,
            website_link: model.website_link,
            seeking_talent: model.seeking_talent,
            seeking_description: model.seeking_description,
        }
    }
}

impl From<artist::Model> for Artist {
    fn from(model: artist::Model) -> Self {
        Artist {
            id: model.id,
            genres: decode_genres(&model.genres),
            name: model.name,
            city: model.city,
            state: model.state,
            phone: model.phone,
            image_link: model.image_link,
            facebook_link: model.facebook_link,
            website_link: model.website_link,
            seeking_venue: model.seeking_venue,
            seeking_description: model.seeking_description,
        }
    }
}

impl From<show::Model> for Show {
    fn from(model: show::Model) -> Self {
        Show {
            id: model.id,
            artist_id: model.artist_id,
            venue_id: model.venue_id,
            start_time: model.start_time,
        }
    }
}

fn apply_venue_draft(active: &mut venue::ActiveModel, draft: &VenueDraft) {
    active.name = ActiveValue::Set(draft.name.clone());
    active.city = ActiveValue::Set(draft.city.clone());
    active.state = ActiveValue::Set(draft.state.clone());
    active.address = ActiveValue::Set(draft.address.clone());
    active.phone = ActiveValue::Set(draft.phone.clone());
    active.genres = ActiveValue::Set(encode_genres(&draft.genres));
    active.image_link = ActiveValue::Set(draft.image_link.clone());
    active.facebook_link = ActiveValue::Set(draft.facebook_link.clone());
    active.website_link = ActiveValue::Set(draft.website_link.clone());
    active.seeking_talent = ActiveValue::Set(draft.seeking_talent);
    active.seeking_description = ActiveValue::Set(draft.seeking_description.clone());
}

fn apply_artist_draft(active: &mut artist::ActiveModel, draft: &ArtistDraft) {
    active.name = ActiveValue::Set(draft.name.clone());
    active.city = ActiveValue::Set(draft.city.clone());
    active.state = ActiveValue::Set(draft.state.clone());
    active.phone = ActiveValue::Set(draft.phone.clone());
    active.genres = ActiveValue::Set(encode_genres(&draft.genres));
    active.image_link = ActiveValue::Set(draft.image_link.clone());
    active.facebook_link = ActiveValue::Set(draft.facebook_link.clone());
    active.website_link = ActiveValue::Set(draft.website_link.clone());
    active.seeking_venue = ActiveValue::Set(draft.seeking_venue);
    active.seeking_description = ActiveValue::Set(draft.seeking_description.clone());
}

// ========== Transactions ==========

/// Describes a pending write for error reporting.
struct PendingWrite<'a> {
    kind: EntityKind,
    action: WriteAction,
    name: &'a str,
    id: Option<i64>,
}

impl PendingWrite<'_> {
    fn failed(&self, source: DbErr) -> StoreError {
        log::error!(
            "{} {} could not be {}: {}",
            self.kind,
            self.name,
            self.action,
            source
        );
        StoreError::WriteFailed {
            kind: self.kind,
            name: self.name.to_owned(),
            action: self.action,
            source,
        }
    }

    fn missing(&self) -> StoreError {
        StoreError::NotFound {
            kind: self.kind,
            id: self.id.unwrap_or_default(),
        }
    }
}

async fn rollback(txn: DatabaseTransaction) {
    if let Err(err) = txn.rollback().await {
        log::error!("Failed to roll back transaction: {}", err);
    }
}

/// Commit a successful write, roll back anything else.
///
/// `Ok(None)` means the target row does not exist.
async fn finish_write<T>(
    txn: DatabaseTransaction,
    outcome: std::result::Result<Option<T>, DbErr>,
    write: &PendingWrite<'_>,
) -> StoreResult<T> {
    match outcome {
        Ok(Some(value)) => match txn.commit().await {
            Ok(()) => Ok(value),
            Err(source) => Err(write.failed(source)),
        },
        Ok(None) => {
            rollback(txn).await;
            Err(write.missing())
        }
        Err(source) => {
            rollback(txn).await;
            Err(write.failed(source))
        }
    }
}

impl Database {
    async fn begin(&self, write: &PendingWrite<'_>) -> StoreResult<DatabaseTransaction> {
        self.conn
            .begin()
            .await
            .map_err(|source| write.failed(source))
    }
}

// ========== Listing Store ==========

#[async_trait::async_trait]
impl ListingStore for Database {
    async fn find_venue(&self, id: i64) -> StoreResult<Venue> {
        venue::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .map_err(StoreError::query(EntityKind::Venue))?
            .map(Venue::from)
            .ok_or(StoreError::NotFound {
                kind: EntityKind::Venue,
                id,
            })
    }

    async fn list_venues(&self) -> StoreResult<Vec<Venue>> {
        let venues = venue::Entity::find()
            .order_by_asc(venue::Column::Name)
            .all(&self.conn)
            .await
            .map_err(StoreError::query(EntityKind::Venue))?;

        Ok(venues.into_iter().map(Venue::from).collect())
    }

    async fn search_venues(&self, term: &str) -> StoreResult<Vec<Venue>> {
        let search = TextSearch::new(term);
        let mut venues = self.list_venues().await?;
        venues.retain(|venue| search.matches(&venue.name));

        log::debug!("Venue search '{}' matched {} rows", term, venues.len());
        Ok(venues)
    }

    async fn venue_locations(&self) -> StoreResult<Vec<Location>> {
        let pairs = venue::Entity::find()
            .select_only()
            .column(venue::Column::City)
            .column(venue::Column::State)
            .distinct()
            .order_by_asc(venue::Column::State)
            .order_by_asc(venue::Column::City)
            .into_tuple::<(String, String)>()
            .all(&self.conn)
            .await
            .map_err(StoreError::query(EntityKind::Venue))?;

        Ok(pairs
            .into_iter()
            .map(|(city, state)| Location { city, state })
            .collect())
    }

    async fn upcoming_show_counts(&self, now: NaiveDateTime) -> StoreResult<HashMap<i64, u64>> {
        let counts = show::Entity::find()
            .select_only()
            .column(show::Column::VenueId)
            .column_as(show::Column::Id.count(), "upcoming")
            .filter(show::Column::StartTime.gte(now))
            .group_by(show::Column::VenueId)
            .into_tuple::<(i64, i64)>()
            .all(&self.conn)
            .await
            .map_err(StoreError::query(EntityKind::Show))?;

        Ok(counts
            .into_iter()
            .map(|(venue_id, count)| (venue_id, u64::try_from(count).unwrap_or_default()))
            .collect())
    }

    async fn venue_shows(&self, venue_id: i64) -> StoreResult<Vec<ScheduledShow>> {
        let rows = show::Entity::find()
            .filter(show::Column::VenueId.eq(venue_id))
            .order_by_asc(show::Column::StartTime)
            .find_also_related(artist::Entity)
            .all(&self.conn)
            .await
            .map_err(StoreError::query(EntityKind::Show))?;

        Ok(rows
            .into_iter()
            .filter_map(|(show, artist)| {
                let artist = artist?;
                Some(ScheduledShow {
                    counterpart_id: artist.id,
                    counterpart_name: artist.name,
                    counterpart_image_link: artist.image_link,
                    start_time: show.start_time,
                })
            })
            .collect())
    }

    async fn insert_venue(&self, draft: VenueDraft) -> StoreResult<Venue> {
        let write = PendingWrite {
            kind: EntityKind::Venue,
            action: WriteAction::Listed,
            name: &draft.name,
            id: None,
        };
        let txn = self.begin(&write).await?;

        let mut active = <venue::ActiveModel as Default>::default();
        apply_venue_draft(&mut active, &draft);
        let outcome = active.insert(&txn).await.map(Some);

        let model = finish_write(txn, outcome, &write).await?;
        log::info!("Venue created: '{}' (ID: {})", model.name, model.id);
        Ok(model.into())
    }

    async fn update_venue(&self, id: i64, draft: VenueDraft) -> StoreResult<Venue> {
        let write = PendingWrite {
            kind: EntityKind::Venue,
            action: WriteAction::Updated,
            name: &draft.name,
            id: Some(id),
        };
        let txn = self.begin(&write).await?;

        let outcome = async {
            let Some(existing) = venue::Entity::find_by_id(id).one(&txn).await? else {
                return Ok::<_, DbErr>(None);
            };
            let mut active: venue::ActiveModel = existing.into();
            apply_venue_draft(&mut active, &draft);
            let updated = active.update(&txn).await?;
            Ok::<_, DbErr>(Some(updated))
        }
        .await;

        let model = finish_write(txn, outcome, &write).await?;
        log::info!("Venue updated: '{}' (ID: {})", model.name, model.id);
        Ok(model.into())
    }

    async fn delete_venue(&self, id: i64) -> StoreResult<String> {
        let label = format!("#{id}");
        let lookup = PendingWrite {
            kind: EntityKind::Venue,
            action: WriteAction::Deleted,
            name: &label,
            id: Some(id),
        };
        let txn = self.begin(&lookup).await?;

        let name = match venue::Entity::find_by_id(id).one(&txn).await {
            Ok(Some(existing)) => existing.name,
            Ok(None) => {
                rollback(txn).await;
                return Err(lookup.missing());
            }
            Err(source) => {
                rollback(txn).await;
                return Err(lookup.failed(source));
            }
        };

        let write = PendingWrite {
            name: &name,
            ..lookup
        };
        let outcome = venue::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map(|result| (result.rows_affected > 0).then(|| name.clone()));

        let name = finish_write(txn, outcome, &write).await?;
        log::info!("Venue deleted: '{}' (ID: {})", name, id);
        Ok(name)
    }

    async fn find_artist(&self, id: i64) -> StoreResult<Artist> {
        artist::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .map_err(StoreError::query(EntityKind::Artist))?
            .map(Artist::from)
            .ok_or(StoreError::NotFound {
                kind: EntityKind::Artist,
                id,
            })
    }

    async fn list_artists(&self) -> StoreResult<Vec<Artist>> {
        let artists = artist::Entity::find()
            .order_by_asc(artist::Column::Name)
            .all(&self.conn)
            .await
            .map_err(StoreError::query(EntityKind::Artist))?;

        Ok(artists.into_iter().map(Artist::from).collect())
    }

    async fn search_artists(&self, term: &str) -> StoreResult<Vec<Artist>> {
        let search = TextSearch::new(term);
        let mut artists = self.list_artists().await?;
        artists.retain(|artist| search.matches(&artist.name));

        log::debug!("Artist search '{}' matched {} rows", term, artists.len());
        Ok(artists)
    }

    async fn artist_shows(&self, artist_id: i64) -> StoreResult<Vec<ScheduledShow>> {
        let rows = show::Entity::find()
            .filter(show::Column::ArtistId.eq(artist_id))
            .order_by_asc(show::Column::StartTime)
            .find_also_related(venue::Entity)
            .all(&self.conn)
            .await
            .map_err(StoreError::query(EntityKind::Show))?;

        Ok(rows
            .into_iter()
            .filter_map(|(show, venue)| {
                let venue = venue?;
                Some(ScheduledShow {
                    counterpart_id: venue.id,
                    counterpart_name: venue.name,
                    counterpart_image_link: venue.image_link,
                    start_time: show.start_time,
                })
            })
            .collect())
    }

    async fn insert_artist(&self, draft: ArtistDraft) -> StoreResult<Artist> {
        let write = PendingWrite {
            kind: EntityKind::Artist,
            action: WriteAction::Listed,
            name: &draft.name,
            id: None,
        };
        let txn = self.begin(&write).await?;

        let mut active = <artist::ActiveModel as Default>::default();
        apply_artist_draft(&mut active, &draft);
        let outcome = active.insert(&txn).await.map(Some);

        let model = finish_write(txn, outcome, &write).await?;
        log::info!("Artist created: '{}' (ID: {})", model.name, model.id);
        Ok(model.into())
    }

    async fn update_artist(&self, id: i64, draft: ArtistDraft) -> StoreResult<Artist> {
        let write = PendingWrite {
            kind: EntityKind::Artist,
            action: WriteAction::Updated,
            name: &draft.name,
            id: Some(id),
        };
        let txn = self.begin(&write).await?;

        let outcome = async {
            let Some(existing) = artist::Entity::find_by_id(id).one(&txn).await? else {
                return Ok::<_, DbErr>(None);
            };
            let mut active: artist::ActiveModel = existing.into();
            apply_artist_draft(&mut active, &draft);
            let updated = active.update(&txn).await?;
            Ok::<_, DbErr>(Some(updated))
        }
        .await;

        let model = finish_write(txn, outcome, &write).await?;
        log::info!("Artist updated: '{}' (ID: {})", model.name, model.id);
        Ok(model.into())
    }

    async fn delete_artist(&self, id: i64) -> StoreResult<String> {
        let label = format!("#{id}");
        let lookup = PendingWrite {
            kind: EntityKind::Artist,
            action: WriteAction::Deleted,
            name: &label,
            id: Some(id),
        };
        let txn = self.begin(&lookup).await?;

        let name = match artist::Entity::find_by_id(id).one(&txn).await {
            Ok(Some(existing)) => existing.name,
            Ok(None) => {
                rollback(txn).await;
                return Err(lookup.missing());
            }
            Err(source) => {
                rollback(txn).await;
                return Err(lookup.failed(source));
            }
        };

        let write = PendingWrite {
            name: &name,
            ..lookup
        };
        let outcome = artist::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map(|result| (result.rows_affected > 0).then(|| name.clone()));

        let name = finish_write(txn, outcome, &write).await?;
        log::info!("Artist deleted: '{}' (ID: {})", name, id);
        Ok(name)
    }

    async fn list_shows(&self) -> StoreResult<Vec<ShowListing>> {
        let rows = show::Entity::find()
            .order_by_asc(show::Column::StartTime)
            .find_also_related(artist::Entity)
            .all(&self.conn)
            .await
            .map_err(StoreError::query(EntityKind::Show))?;

        let venue_ids: Vec<i64> = rows.iter().map(|(show, _)| show.venue_id).collect();
        let venues: HashMap<i64, venue::Model> = venue::Entity::find()
            .filter(venue::Column::Id.is_in(venue_ids))
            .all(&self.conn)
            .await
            .map_err(StoreError::query(EntityKind::Venue))?
            .into_iter()
            .map(|venue| (venue.id, venue))
            .collect();

        Ok(rows
            .into_iter()
            .filter_map(|(show, artist)| {
                let artist = artist?;
                let venue = venues.get(&show.venue_id)?;
                Some(ShowListing {
                    show_id: show.id,
                    venue_id: venue.id,
                    venue_name: venue.name.clone(),
                    artist_id: artist.id,
                    artist_name: artist.name,
                    artist_image_link: artist.image_link,
                    start_time: show.start_time,
                })
            })
            .collect())
    }

    async fn insert_show(&self, draft: ShowDraft) -> StoreResult<Show> {
        let label = format!(
            "for artist {} at venue {}",
            draft.artist_id, draft.venue_id
        );
        let write = PendingWrite {
            kind: EntityKind::Show,
            action: WriteAction::Listed,
            name: &label,
            id: None,
        };
        let txn = self.begin(&write).await?;

        let active = show::ActiveModel {
            id: ActiveValue::NotSet,
            artist_id: ActiveValue::Set(draft.artist_id),
            venue_id: ActiveValue::Set(draft.venue_id),
            start_time: ActiveValue::Set(draft.start_time),
        };
        let outcome = active.insert(&txn).await.map(Some);

        let model = finish_write(txn, outcome, &write).await?;
        log::info!(
            "Show created: artist {} at venue {} (ID: {})",
            model.artist_id,
            model.venue_id,
            model.id
        );
        Ok(model.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{at, sample_artist, sample_venue, test_db};

    async fn seed_venues(db: &Database) -> (Venue, Venue) {
        let hop = db
            .insert_venue(sample_venue("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        let park = db
            .insert_venue(sample_venue(
                "Park Square Live Music & Coffee",
                "San Francisco",
                "CA",
            ))
            .await
            .unwrap();
        (hop, park)
    }

    #[test]
    fn test_decode_genres_formats() {
        assert_eq!(
            decode_genres(r#"["Jazz","Rock n Roll"]"#),
            vec!["Jazz", "Rock n Roll"]
        );
        assert_eq!(decode_genres("{Jazz,Folk}"), vec!["Jazz", "Folk"]);
        assert_eq!(decode_genres("Jazz, Folk"), vec!["Jazz", "Folk"]);
        assert!(decode_genres("").is_empty());
        assert_eq!(
            decode_genres(&encode_genres(&["R&B".to_string(), "a, b".to_string()])),
            vec!["R&B", "a, b"]
        );
    }

    #[tokio::test]
    async fn test_insert_and_find_venue() {
        let db = test_db().await;
        let created = db
            .insert_venue(sample_venue("The Dueling Pianos Bar", "New York", "NY"))
            .await
            .unwrap();

        let found = db.find_venue(created.id).await.unwrap();
        assert_eq!(found, created);
        assert_eq!(found.genres, vec!["Jazz", "Classical"]);
        assert!(!found.seeking_talent);
    }

    #[tokio::test]
    async fn test_find_missing_venue() {
        let db = test_db().await;
        let err = db.find_venue(42).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound {
                kind: EntityKind::Venue,
                id: 42
            }
        ));
    }

    #[tokio::test]
    async fn test_search_venues_partial_match() {
        let db = test_db().await;
        seed_venues(&db).await;

        let hop = db.search_venues("Hop").await.unwrap();
        assert_eq!(hop.len(), 1);
        assert_eq!(hop[0].name, "The Musical Hop");

        let music = db.search_venues("Music").await.unwrap();
        assert_eq!(music.len(), 2);

        let lower = db.search_venues("music").await.unwrap();
        assert_eq!(lower, music);
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_and_accents_literally() {
        let db = test_db().await;
        seed_venues(&db).await;
        for name in ["CAFÉ ÉTOILE", "100% Jazz"] {
            db.insert_venue(sample_venue(name, "Montreal", "QC"))
                .await
                .unwrap();
        }

        assert!(db.search_venues("_").await.unwrap().is_empty());
        assert!(db.search_venues("%").await.unwrap().is_empty());

        let percent = db.search_venues("100%").await.unwrap();
        assert_eq!(percent.len(), 1);
        assert_eq!(percent[0].name, "100% Jazz");

        for term in ["étoile", "Café", "ÉTOILE"] {
            let found = db.search_venues(term).await.unwrap();
            assert_eq!(found.len(), 1, "{term}");
            assert_eq!(found[0].name, "CAFÉ ÉTOILE");
        }
    }

    #[tokio::test]
    async fn test_search_artists_case_insensitive() {
        let db = test_db().await;
        for name in ["Guns N Petals", "Matt Quevado", "The Wild Sax Band"] {
            db.insert_artist(sample_artist(name)).await.unwrap();
        }

        let band = db.search_artists("band").await.unwrap();
        let names: Vec<_> = band.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["The Wild Sax Band"]);

        let a = db.search_artists("A").await.unwrap();
        assert_eq!(a.len(), 3);

        let none = db.search_artists("zzz").await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_venue_locations_are_distinct() {
        let db = test_db().await;
        seed_venues(&db).await;
        db.insert_venue(sample_venue("The Dueling Pianos Bar", "New York", "NY"))
            .await
            .unwrap();

        let locations = db.venue_locations().await.unwrap();
        assert_eq!(
            locations,
            vec![
                Location {
                    city: "San Francisco".into(),
                    state: "CA".into()
                },
                Location {
                    city: "New York".into(),
                    state: "NY".into()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_upcoming_counts_are_per_venue() {
        let db = test_db().await;
        let (hop, park) = seed_venues(&db).await;
        let artist = db.insert_artist(sample_artist("Guns N Petals")).await.unwrap();
        let now = at("2030-01-01 12:00:00");

        for (venue_id, when) in [
            (hop.id, "2030-02-01 20:00:00"),
            (hop.id, "2030-01-01 12:00:00"),
            (hop.id, "2029-12-01 20:00:00"),
            (park.id, "2031-01-01 20:00:00"),
        ] {
            db.insert_show(ShowDraft {
                artist_id: artist.id,
                venue_id,
                start_time: at(when),
            })
            .await
            .unwrap();
        }

        let counts = db.upcoming_show_counts(now).await.unwrap();
        assert_eq!(counts.get(&hop.id), Some(&2));
        assert_eq!(counts.get(&park.id), Some(&1));
        assert_eq!(counts.len(), 2);
    }

    #[tokio::test]
    async fn test_venue_and_artist_shows_join_counterparts() {
        let db = test_db().await;
        let (hop, _) = seed_venues(&db).await;
        let artist = db.insert_artist(sample_artist("Matt Quevado")).await.unwrap();
        for when in ["2035-04-15 20:00:00", "2019-06-15 23:00:00"] {
            db.insert_show(ShowDraft {
                artist_id: artist.id,
                venue_id: hop.id,
                start_time: at(when),
            })
            .await
            .unwrap();
        }

        let at_venue = db.venue_shows(hop.id).await.unwrap();
        assert_eq!(at_venue.len(), 2);
        assert_eq!(at_venue[0].counterpart_name, "Matt Quevado");
        assert_eq!(at_venue[0].start_time, at("2019-06-15 23:00:00"));

        let by_artist = db.artist_shows(artist.id).await.unwrap();
        assert_eq!(by_artist.len(), 2);
        assert_eq!(by_artist[1].counterpart_id, hop.id);
        assert_eq!(by_artist[1].counterpart_name, "The Musical Hop");
    }

    #[tokio::test]
    async fn test_show_with_missing_artist_is_not_written() {
        let db = test_db().await;
        let (hop, _) = seed_venues(&db).await;

        let err = db
            .insert_show(ShowDraft {
                artist_id: 999,
                venue_id: hop.id,
                start_time: at("2035-04-15 20:00:00"),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            StoreError::WriteFailed {
                kind: EntityKind::Show,
                action: WriteAction::Listed,
                ..
            }
        ));
        assert!(db.list_shows().await.unwrap().is_empty());
        assert!(db.venue_shows(hop.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_show_with_missing_venue_is_not_written() {
        let db = test_db().await;
        let artist = db.insert_artist(sample_artist("Guns N Petals")).await.unwrap();

        let result = db
            .insert_show(ShowDraft {
                artist_id: artist.id,
                venue_id: 999,
                start_time: at("2035-04-15 20:00:00"),
            })
            .await;

        assert!(result.is_err());
        assert!(db.artist_shows(artist.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_artist_cascades_to_shows() {
        let db = test_db().await;
        let (hop, park) = seed_venues(&db).await;
        let doomed = db.insert_artist(sample_artist("Guns N Petals")).await.unwrap();
        let kept = db.insert_artist(sample_artist("Matt Quevado")).await.unwrap();
        for (artist_id, venue_id) in [(doomed.id, hop.id), (doomed.id, park.id), (kept.id, hop.id)]
        {
            db.insert_show(ShowDraft {
                artist_id,
                venue_id,
                start_time: at("2035-04-15 20:00:00"),
            })
            .await
            .unwrap();
        }

        let name = db.delete_artist(doomed.id).await.unwrap();
        assert_eq!(name, "Guns N Petals");

        let remaining = db.list_shows().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].artist_id, kept.id);
        assert!(db.artist_shows(doomed.id).await.unwrap().is_empty());
        assert!(matches!(
            db.find_artist(doomed.id).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_venue_cascades_to_shows() {
        let db = test_db().await;
        let (hop, _) = seed_venues(&db).await;
        let artist = db.insert_artist(sample_artist("Guns N Petals")).await.unwrap();
        db.insert_show(ShowDraft {
            artist_id: artist.id,
            venue_id: hop.id,
            start_time: at("2035-04-15 20:00:00"),
        })
        .await
        .unwrap();

        db.delete_venue(hop.id).await.unwrap();

        assert!(db.artist_shows(artist.id).await.unwrap().is_empty());
        assert_eq!(db.list_venues().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_artist() {
        let db = test_db().await;
        let err = db.delete_artist(7).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound {
                kind: EntityKind::Artist,
                id: 7
            }
        ));
    }

    #[tokio::test]
    async fn test_update_seeking_talent_persists() {
        let db = test_db().await;
        let (hop, _) = seed_venues(&db).await;

        let mut draft = sample_venue("The Musical Hop", "San Francisco", "CA");
        draft.seeking_talent = true;
        draft.seeking_description = Some("Looking for jazz trios".into());
        db.update_venue(hop.id, draft).await.unwrap();

        let reread = db.find_venue(hop.id).await.unwrap();
        assert!(reread.seeking_talent);
        assert_eq!(
            reread.seeking_description.as_deref(),
            Some("Looking for jazz trios")
        );
    }

    #[tokio::test]
    async fn test_update_with_identical_values_is_unchanged() {
        let db = test_db().await;
        let artist = db.insert_artist(sample_artist("The Wild Sax Band")).await.unwrap();
        let before = db.find_artist(artist.id).await.unwrap();

        db.update_artist(artist.id, sample_artist("The Wild Sax Band"))
            .await
            .unwrap();

        let after = db.find_artist(artist.id).await.unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_update_missing_venue() {
        let db = test_db().await;
        let err = db
            .update_venue(5, sample_venue("Nowhere", "Austin", "TX"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { id: 5, .. }));
        assert!(db.list_venues().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_shows_joins_both_sides() {
        let db = test_db().await;
        let (hop, _) = seed_venues(&db).await;
        let artist = db.insert_artist(sample_artist("Guns N Petals")).await.unwrap();
        db.insert_show(ShowDraft {
            artist_id: artist.id,
            venue_id: hop.id,
            start_time: at("2019-05-21 21:30:00"),
        })
        .await
        .unwrap();

        let shows = db.list_shows().await.unwrap();
        assert_eq!(shows.len(), 1);
        assert_eq!(shows[0].venue_name, "The Musical Hop");
        assert_eq!(shows[0].artist_name, "Guns N Petals");
        assert_eq!(
            shows[0].artist_image_link.as_deref(),
            Some("https://images.example.com/guns-n-petals.jpg")
        );
    }
}
