use std::sync::Arc;

use chrono::NaiveDateTime;
use sea_orm::{ConnectOptions, Database as SeaDatabase};

use crate::database::Database;
use crate::ports::listing_store::{ArtistDraft, VenueDraft};

pub async fn test_db() -> Arc<Database> {
    // A single connection keeps every query on the same in-memory database
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);

    let conn = SeaDatabase::connect(opt).await.unwrap();
    Arc::new(Database::prepare(conn).await.unwrap())
}

pub fn at(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

pub fn sample_venue(name: &str, city: &str, state: &str) -> VenueDraft {
    VenueDraft {
        name: name.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        address: "1015 Folsom Street".to_string(),
        phone: Some("123-123-1234".to_string()),
        genres: vec!["Jazz".to_string(), "Classical".to_string()],
        image_link: Some(format!("https://images.example.com/{}.jpg", slug(name))),
        facebook_link: None,
        website_link: None,
        seeking_talent: false,
        seeking_description: None,
    }
}

pub fn sample_artist(name: &str) -> ArtistDraft {
    ArtistDraft {
        name: name.to_string(),
        city: "San Francisco".to_string(),
        state: "CA".to_string(),
        phone: Some("326-123-5000".to_string()),
        genres: vec!["Rock n Roll".to_string()],
        image_link: Some(format!("https://images.example.com/{}.jpg", slug(name))),
        facebook_link: Some("https://www.facebook.com/example".to_string()),
        website_link: None,
        seeking_venue: true,
        seeking_description: Some("Looking for shows".to_string()),
    }
}
