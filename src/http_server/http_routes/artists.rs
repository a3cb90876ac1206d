use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{CookieJar, Form};
use serde_json::json;

use crate::forms::ArtistForm;
use crate::http_server::{
    error::AppError,
    flash,
    http_routes::{EntityId, SearchForm, delete_response, now, render_page},
    render::{Page, View},
    state::AppState,
};
use crate::ports::listing_store::{EntityKind, StoreError};
use crate::services::artist::ArtistService;

fn service(state: &AppState) -> ArtistService {
    ArtistService::new(state.store.clone(), state.date_format())
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let artists = service(&state).list().await?;
    let view = View::new(Page::Artists).with_data(&json!({ "artists": artists }))?;
    render_page(&state, jar, StatusCode::OK, view)
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<SearchForm>,
) -> Result<Response, AppError> {
    let results = service(&state).search(&form.search_term).await?;
    let view = View::new(Page::SearchArtists).with_data(&json!({
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
    let view = View::new(Page::ShowArtist).with_data(&detail)?;
    render_page(&state, jar, StatusCode::OK, view)
}

pub async fn create_form(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let view = View::new(Page::NewArtist).with_data(&json!({ "form": ArtistForm::default() }))?;
    render_page(&state, jar, StatusCode::OK, view)
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<ArtistForm>,
) -> Result<Response, AppError> {
    let name = form.name.clone();
    let draft = match form.validated() {
        Ok(draft) => draft,
        Err(errors) => {
            let view = View::new(Page::Home)
                .with_flash(format!("Artist {name} failed due to validation error(s)!"))
                .with_form_errors(errors);
            return render_page(&state, jar, StatusCode::UNPROCESSABLE_ENTITY, view);
        }
    };

    let (status, message) = match state.store.insert_artist(draft).await {
        Ok(artist) => (
            StatusCode::OK,
            format!("Artist {} was successfully listed!", artist.name),
        ),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("An error occurred. Artist {name} could not be listed."),
        ),
    };
    render_page(&state, jar, status, View::new(Page::Home).with_flash(message))
}

pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    EntityId(id): EntityId,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let artist = state.store.find_artist(id).await?;
    let view = View::new(Page::EditArtist).with_data(&json!({
        "id": artist.id,
        "form": ArtistForm::from(&artist),
    }))?;
    render_page(&state, jar, StatusCode::OK, view)
}

pub async fn edit(
    State(state): State<Arc<AppState>>,
    EntityId(id): EntityId,
    jar: CookieJar,
    Form(form): Form<ArtistForm>,
) -> Result<Response, AppError> {
    let name = form.name.clone();
    let draft = match form.clone().validated() {
        Ok(draft) => draft,
        Err(errors) => {
            state.store.find_artist(id).await?;
            let view = View::new(Page::EditArtist)
                .with_data(&json!({ "id": id, "form": form }))?
                .with_form_errors(errors);
            return render_page(&state, jar, StatusCode::UNPROCESSABLE_ENTITY, view);
        }
    };

    let message = match state.store.update_artist(id, draft).await {
        Ok(artist) => format!("Artist {} updated successfully.", artist.name),
        Err(StoreError::NotFound { .. }) => return Err(AppError::NotFound),
        Err(_) => format!("An error occurred. Artist {name} could not be updated."),
    };
    let jar = flash::push(jar, vec![message]);
    Ok((jar, Redirect::to(&format!("/artists/{id}"))).into_response())
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    EntityId(id): EntityId,
    jar: CookieJar,
) -> Response {
    let outcome = state.store.delete_artist(id).await;
    delete_response(jar, EntityKind::Artist, outcome)
}
