use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Response};
use axum_extra::extract::{CookieJar, Form};
use serde_json::json;

use crate::forms::ShowForm;
use crate::http_server::{
    error::AppError,
    http_routes::render_page,
    render::{Page, View},
    state::AppState,
};
use crate::services::show::ShowService;

pub async fn index(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let shows = ShowService::new(state.store.clone()).listing().await?;
    let view = View::new(Page::Shows).with_data(&json!({ "shows": shows }))?;
    render_page(&state, jar, StatusCode::OK, view)
}

pub async fn create_form(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let view = View::new(Page::NewShow).with_data(&json!({ "form": ShowForm::default() }))?;
    render_page(&state, jar, StatusCode::OK, view)
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<ShowForm>,
) -> Result<Response, AppError> {
    let draft = match form.validated() {
        Ok(draft) => draft,
        Err(errors) => {
            let view = View::new(Page::Home)
                .with_flash("Show failed due to validation error(s)!")
                .with_form_errors(errors);
            return render_page(&state, jar, StatusCode::UNPROCESSABLE_ENTITY, view);
        }
    };

    let (status, message) = match state.store.insert_show(draft).await {
        Ok(show) => {
            log::info!(
                "Listed show {} (artist {}, venue {})",
                show.id,
                show.artist_id,
                show.venue_id
            );
            (StatusCode::OK, "Show was successfully listed!")
        }
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "An error occurred. Show could not be listed.",
        ),
    };
    render_page(&state, jar, status, View::new(Page::Home).with_flash(message))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::http_server::http_routes::test_support::{app, get, json_body, post_form};
    use crate::ports::listing_store::ListingStore;
    use crate::test_utils::{sample_artist, sample_venue, test_db};

    #[tokio::test]
    async fn test_create_and_list_show() {
        let db = test_db().await;
        let venue = db
            .insert_venue(sample_venue("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        let artist = db.insert_artist(sample_artist("Guns N Petals")).await.unwrap();
        let app = app(db.clone());

        let form = format!(
            "artist_id={}&venue_id={}&start_time=2019-05-21T21%3A30%3A00.000Z",
            artist.id, venue.id
        );
        let response = post_form(&app, "/shows/create", &form).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await["flashes"][0],
            "Show was successfully listed!"
        );

        let body = json_body(get(&app, "/shows").await).await;
        let show = &body["data"]["shows"][0];
        assert_eq!(show["venue_name"], "The Musical Hop");
        assert_eq!(show["artist_name"], "Guns N Petals");
        assert_eq!(show["start_time"], "2019-05-21 21:30:00");
    }

    #[tokio::test]
    async fn test_create_with_missing_artist_lists_nothing() {
        let db = test_db().await;
        let venue = db
            .insert_venue(sample_venue("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        let app = app(db.clone());

        let form = format!("artist_id=999&venue_id={}&start_time=2035-04-01+20%3A00", venue.id);
        let response = post_form(&app, "/shows/create", &form).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await["flashes"][0],
            "An error occurred. Show could not be listed."
        );
        assert!(db.list_shows().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_with_bad_time_is_rejected() {
        let app = app(test_db().await);

        let response = post_form(&app, "/shows/create", "artist_id=1&venue_id=1&start_time=soon").await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["page"], "home");
        assert!(body["form_errors"]["start_time"].is_array());
    }

    #[tokio::test]
    async fn test_new_show_form() {
        let app = app(test_db().await);

        let body = json_body(get(&app, "/shows/create").await).await;
        assert_eq!(body["page"], "new_show");
        assert_eq!(body["data"]["form"]["start_time"], "");
    }
}
