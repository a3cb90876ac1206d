use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::database::encode_genres;
use crate::datetime::parse_timestamp;
use crate::ports::listing_store::{Artist, ArtistDraft, ShowDraft, Venue, VenueDraft};

/// Per-field validation messages, keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn field(&self, name: &str) -> &[String] {
        self.0.get(name).map(Vec::as_slice).unwrap_or_default()
    }
}

fn describe(error: &ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => format!("Invalid value ({})", error.code),
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errors)| (field.to_string(), errors.iter().map(describe).collect()))
            .collect();
        Self(fields)
    }
}

fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    String::deserialize(deserializer).map(|value| value.trim().to_owned())
}

fn blank_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty()))
}

/// HTML checkboxes submit `y` (or `on`) when ticked and nothing otherwise.
fn checkbox<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Flag(flag)) => flag,
        Some(Raw::Text(text)) => matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "y" | "yes" | "on" | "true" | "1"
        ),
        None => false,
    })
}

fn tidy_genres(genres: Vec<String>) -> Vec<String> {
    genres
        .into_iter()
        .map(|genre| genre.trim().to_owned())
        .filter(|genre| !genre.is_empty())
        .collect()
}

/// Upper bound of the stored genres column, measured on its JSON encoding.
const GENRES_MAX_CHARS: usize = 120;

fn validate_genres(genres: &[String]) -> Result<(), ValidationError> {
    let genres = tidy_genres(genres.to_vec());
    if genres.is_empty() {
        return Err(ValidationError::new("required").with_message("Pick at least one genre".into()));
    }
    if encode_genres(&genres).chars().count() > GENRES_MAX_CHARS {
        return Err(ValidationError::new("length").with_message("Too many genres selected".into()));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct VenueForm {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 120, message = "City is required (max 120 characters)"))]
    pub city: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 120, message = "State is required (max 120 characters)"))]
    pub state: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(
        min = 1,
        max = 120,
        message = "Address is required (max 120 characters)"
    ))]
    pub address: String,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(length(max = 120, message = "Phone is too long"))]
    pub phone: Option<String>,
    #[validate(custom(function = "validate_genres"))]
    pub genres: Vec<String>,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(url(message = "Enter a valid image URL"), length(max = 500))]
    pub image_link: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(url(message = "Enter a valid Facebook URL"), length(max = 120))]
    pub facebook_link: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(url(message = "Enter a valid website URL"), length(max = 120))]
    pub website_link: Option<String>,
    #[serde(deserialize_with = "checkbox")]
    pub seeking_talent: bool,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(length(max = 120, message = "Description is too long"))]
    pub seeking_description: Option<String>,
}

impl VenueForm {
    pub fn validated(self) -> Result<VenueDraft, FormErrors> {
        self.validate()?;
        Ok(VenueDraft {
            name: self.name,
            city: self.city,
            state: self.state,
            address: self.address,
            phone: self.phone,
            genres: tidy_genres(self.genres),
            image_link: self.image_link,
            facebook_link: self.facebook_link,
            website_link: self.website_link,
            seeking_talent: self.seeking_talent,
            seeking_description: self.seeking_description,
        })
    }
}

impl From<&Venue> for VenueForm {
    fn from(venue: &Venue) -> Self {
        Self {
            name: venue.name.clone(),
            city: venue.city.clone(),
            state: venue.state.clone(),
            address: venue.address.clone(),
            phone: venue.phone.clone(),
            genres: venue.genres.clone(),
            image_link: venue.image_link.clone(),
            facebook_link: venue.facebook_link.clone(),
            website_link: venue.website_link.clone(),
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ArtistForm {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 120, message = "City is required (max 120 characters)"))]
    pub city: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 120, message = "State is required (max 120 characters)"))]
    pub state: String,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(length(max = 120, message = "Phone is too long"))]
    pub phone: Option<String>,
    #[validate(custom(function = "validate_genres"))]
    pub genres: Vec<String>,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(url(message = "Enter a valid image URL"), length(max = 500))]
    pub image_link: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(url(message = "Enter a valid Facebook URL"), length(max = 120))]
    pub facebook_link: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(url(message = "Enter a valid website URL"), length(max = 120))]
    pub website_link: Option<String>,
    #[serde(deserialize_with = "checkbox")]
    pub seeking_venue: bool,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(length(max = 120, message = "Description is too long"))]
    pub seeking_description: Option<String>,
}

impl ArtistForm {
    pub fn validated(self) -> Result<ArtistDraft, FormErrors> {
        self.validate()?;
        Ok(ArtistDraft {
            name: self.name,
            city: self.city,
            state: self.state,
            phone: self.phone,
            genres: tidy_genres(self.genres),
            image_link: self.image_link,
            facebook_link: self.facebook_link,
            website_link: self.website_link,
            seeking_venue: self.seeking_venue,
            seeking_description: self.seeking_description,
        })
    }
}

impl From<&Artist> for ArtistForm {
    fn from(artist: &Artist) -> Self {
        Self {
            name: artist.name.clone(),
            city: artist.city.clone(),
            state: artist.state.clone(),
            phone: artist.phone.clone(),
            genres: artist.genres.clone(),
            image_link: artist.image_link.clone(),
            facebook_link: artist.facebook_link.clone(),
            website_link: artist.website_link.clone(),
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_description.clone(),
        }
    }
}

fn parse_id(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

fn required_id(errors: &mut ValidationErrors, field: &'static str, value: &str) -> Option<i64> {
    let id = parse_id(value);
    if id.is_none() {
        errors.add(
            field,
            ValidationError::new("id").with_message("Enter a valid id".into()),
        );
    }
    id
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowForm {
    pub artist_id: String,
    pub venue_id: String,
    pub start_time: String,
}

impl ShowForm {
    pub fn validated(self) -> Result<ShowDraft, FormErrors> {
        let mut errors = ValidationErrors::new();
        let artist_id = required_id(&mut errors, "artist_id", &self.artist_id);
        let venue_id = required_id(&mut errors, "venue_id", &self.venue_id);
        let start_time = parse_timestamp(&self.start_time).ok();
        if start_time.is_none() {
            errors.add(
                "start_time",
                ValidationError::new("datetime")
                    .with_message("Enter a start time like 2035-04-01 20:00:00".into()),
            );
        }

        match (artist_id, venue_id, start_time) {
            (Some(artist_id), Some(venue_id), Some(start_time)) => Ok(ShowDraft {
                artist_id,
                venue_id,
                start_time,
            }),
            _ => Err(errors.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn venue_form() -> VenueForm {
        serde_json::from_value(json!({
            "name": "  The Musical Hop ",
            "city": "San Francisco",
            "state": "CA",
            "address": "1015 Folsom Street",
            "phone": "",
            "genres": ["Jazz", " ", "Reggae"],
            "image_link": "https://images.example.com/hop.jpg",
            "facebook_link": "",
            "seeking_talent": "y",
        }))
        .unwrap()
    }

    #[test]
    fn test_venue_form_normalizes_fields() {
        let draft = venue_form().validated().unwrap();
        assert_eq!(draft.name, "The Musical Hop");
        assert_eq!(draft.phone, None);
        assert_eq!(draft.facebook_link, None);
        assert_eq!(draft.genres, vec!["Jazz", "Reggae"]);
        assert!(draft.seeking_talent);
        assert_eq!(draft.seeking_description, None);
    }

    #[test]
    fn test_missing_checkbox_defaults_to_false() {
        let form: ArtistForm = serde_json::from_value(json!({
            "name": "Guns N Petals",
            "city": "San Francisco",
            "state": "CA",
            "genres": ["Rock n Roll"],
        }))
        .unwrap();
        let draft = form.validated().unwrap();
        assert!(!draft.seeking_venue);
    }

    #[test]
    fn test_venue_form_reports_each_failing_field() {
        let mut form = venue_form();
        form.name.clear();
        form.genres.clear();
        form.website_link = Some("not a url".into());

        let errors = form.validated().unwrap_err();
        assert_eq!(errors.field("name"), ["Name is required"]);
        assert_eq!(errors.field("genres"), ["Pick at least one genre"]);
        assert_eq!(errors.field("website_link"), ["Enter a valid website URL"]);
        assert!(errors.field("city").is_empty());
    }

    #[test]
    fn test_blank_genres_are_rejected() {
        let mut form = venue_form();
        form.genres = vec!["  ".into()];
        let errors = form.validated().unwrap_err();
        assert!(!errors.field("genres").is_empty());
    }

    #[test]
    fn test_genres_must_fit_the_stored_column() {
        let mut form = venue_form();
        form.genres = (1..=10).map(|n| format!("Experimental {n}")).collect();
        let errors = form.validated().unwrap_err();
        assert_eq!(errors.field("genres"), ["Too many genres selected"]);

        let mut form = venue_form();
        form.genres = vec!["Jazz".into(), "Reggae".into(), "Swing".into()];
        assert!(form.validated().is_ok());
    }

    #[test]
    fn test_overlong_city_is_rejected() {
        let mut form = venue_form();
        form.city = "x".repeat(121);
        let errors = form.validated().unwrap_err();
        assert!(!errors.field("city").is_empty());
    }

    #[test]
    fn test_prefilled_form_round_trips_to_same_draft() {
        let draft = venue_form().validated().unwrap();
        let venue = Venue {
            id: 1,
            name: draft.name.clone(),
            city: draft.city.clone(),
            state: draft.state.clone(),
            address: draft.address.clone(),
            phone: draft.phone.clone(),
            genres: draft.genres.clone(),
            image_link: draft.image_link.clone(),
            facebook_link: draft.facebook_link.clone(),
            website_link: draft.website_link.clone(),
            seeking_talent: draft.seeking_talent,
            seeking_description: draft.seeking_description.clone(),
        };

        assert_eq!(VenueForm::from(&venue).validated().unwrap(), draft);
    }

    #[test]
    fn test_show_form_parses_ids_and_time() {
        let form = ShowForm {
            artist_id: "4".into(),
            venue_id: " 1".into(),
            start_time: "2019-05-21T21:30".into(),
        };
        let draft = form.validated().unwrap();
        assert_eq!(draft.artist_id, 4);
        assert_eq!(draft.venue_id, 1);
        assert_eq!(draft.start_time.to_string(), "2019-05-21 21:30:00");
    }

    #[test]
    fn test_show_form_rejects_malformed_input() {
        let form = ShowForm {
            artist_id: "abc".into(),
            venue_id: "0".into(),
            start_time: "soon".into(),
        };
        let errors = form.validated().unwrap_err();
        assert_eq!(errors.field("artist_id"), ["Enter a valid id"]);
        assert_eq!(errors.field("venue_id"), ["Enter a valid id"]);
        assert!(!errors.field("start_time").is_empty());
    }

    #[test]
    fn test_form_errors_serialize_as_map() {
        let errors = ShowForm::default().validated().unwrap_err();
        let value = serde_json::to_value(&errors).unwrap();
        assert!(value["artist_id"].is_array());
        assert!(value["start_time"].is_array());
    }
}
