use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{CookieJar, Form};
use serde_json::json;

use crate::forms::VenueForm;
use crate::http_server::{
    error::AppError,
    flash,
    http_routes::{EntityId, SearchForm, delete_response, now, render_page},
    render::{Page, View},
    state::AppState,
};
use crate::ports::listing_store::{EntityKind, StoreError};
use crate::services::venue::VenueService;

fn service(state: &AppState) -> VenueService {
    VenueService::new(state.store.clone(), state.date_format())
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let areas = service(&state).venues_by_location(now()).await?;
    let view = View::new(Page::Venues).with_data(&json!({ "areas": areas }))?;
    render_page(&state, jar, StatusCode::OK, view)
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<SearchForm>,
) -> Result<Response, AppError> {
    let results = service(&state).search(&form.search_term).await?;
    let view = View::new(Page::SearchVenues).with_data(&json!({
        "search_term": form.search_term,
        "results": results,
    }))?;
    render_page(&state, jar, StatusCode::OK, view)
}

pub async fn show(
    State(state): State<Arc<AppState>>,
    EntityId(id): EntityId,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let detail = service(&state).detail(id, now()).await?;
    let view = View::new(Page::ShowVenue).with_data(&detail)?;
    render_page(&state, jar, StatusCode::OK, view)
}

pub async fn create_form(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let view = View::new(Page::NewVenue).with_data(&json!({ "form": VenueForm::default() }))?;
    render_page(&state, jar, StatusCode::OK, view)
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<VenueForm>,
) -> Result<Response, AppError> {
    let name = form.name.clone();
    let draft = match form.validated() {
        Ok(draft) => draft,
        Err(errors) => {
            log::debug!("Rejected venue form for {name}");
            let view = View::new(Page::Home)
                .with_flash(format!("Venue {name} failed due to validation error(s)!"))
                .with_form_errors(errors);
            return render_page(&state, jar, StatusCode::UNPROCESSABLE_ENTITY, view);
        }
    };

    let (status, message) = match state.store.insert_venue(draft).await {
        Ok(venue) => (
            StatusCode::OK,
            format!("Venue {} was successfully listed!", venue.name),
        ),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("An error occurred. Venue {name} could not be listed."),
        ),
    };
    render_page(&state, jar, status, View::new(Page::Home).with_flash(message))
}

pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    EntityId(id): EntityId,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let venue = state.store.find_venue(id).await?;
    let view = View::new(Page::EditVenue).with_data(&json!({
        "id": venue.id,
        "form": VenueForm::from(&venue),
    }))?;
    render_page(&state, jar, StatusCode::OK, view)
}

pub async fn edit(
    State(state): State<Arc<AppState>>,
    EntityId(id): EntityId,
    jar: CookieJar,
    Form(form): Form<VenueForm>,
) -> Result<Response, AppError> {
    let name = form.name.clone();
    let draft = match form.clone().validated() {
        Ok(draft) => draft,
        Err(errors) => {
            state.store.find_venue(id).await?;
            let view = View::new(Page::EditVenue)
                .with_data(&json!({ "id": id, "form": form }))?
                .with_form_errors(errors);
            return render_page(&state, jar, StatusCode::UNPROCESSABLE_ENTITY, view);
        }
    };

    let message = match state.store.update_venue(id, draft).await {
        Ok(venue) => format!("Venue {} updated successfully.", venue.name),
        Err(StoreError::NotFound { .. }) => return Err(AppError::NotFound),
        Err(_) => format!("An error occurred. Venue {name} could not be updated."),
    };
    let jar = flash::push(jar, vec![message]);
    Ok((jar, Redirect::to(&format!("/venues/{id}"))).into_response())
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    EntityId(id): EntityId,
    jar: CookieJar,
) -> Response {
    let outcome = state.store.delete_venue(id).await;
    delete_response(jar, EntityKind::Venue, outcome)
}
