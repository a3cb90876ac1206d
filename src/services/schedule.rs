use chrono::NaiveDateTime;
use serde::Serialize;

use crate::datetime::{DateFormat, format_timestamp};
use crate::ports::listing_store::ScheduledShow;

/// Shows of one venue or artist, split at the evaluation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowBuckets<T> {
    pub upcoming_shows: Vec<T>,
    pub upcoming_shows_count: usize,
    pub past_shows: Vec<T>,
    pub past_shows_count: usize,
}

/// Upcoming means `start_time >= now`; everything else is past.
///
/// Input order is preserved inside each bucket.
pub fn partition_shows<T>(
    shows: Vec<ScheduledShow>,
    now: NaiveDateTime,
    entry: impl Fn(ScheduledShow) -> T,
) -> ShowBuckets<T> {
    let (upcoming, past): (Vec<_>, Vec<_>) =
        shows.into_iter().partition(|show| show.start_time >= now);

    let upcoming_shows: Vec<T> = upcoming.into_iter().map(&entry).collect();
    let past_shows: Vec<T> = past.into_iter().map(&entry).collect();

    ShowBuckets {
        upcoming_shows_count: upcoming_shows.len(),
        upcoming_shows,
        past_shows_count: past_shows.len(),
        past_shows,
    }
}

/// A show on a venue page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistAppearance {
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

impl ArtistAppearance {
    pub fn from_scheduled(show: ScheduledShow, format: DateFormat) -> Self {
        Self {
            artist_id: show.counterpart_id,
            artist_name: show.counterpart_name,
            artist_image_link: show.counterpart_image_link,
            start_time: format_timestamp(show.start_time, format),
        }
    }
}

/// A show on an artist page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueBooking {
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: String,
}

impl VenueBooking {
    pub fn from_scheduled(show: ScheduledShow, format: DateFormat) -> Self {
        Self {
            venue_id: show.counterpart_id,
            venue_name: show.counterpart_name,
            venue_image_link: show.counterpart_image_link,
            start_time: format_timestamp(show.start_time, format),
        }
    }
}
