pub mod artists;
pub mod home;
pub mod shows;
pub mod venues;

use axum::{
    Json,
    extract::{FromRequestParts, Path},
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::json;

use crate::http_server::{error::AppError, flash, render::View, state::AppState};
use crate::ports::listing_store::{EntityKind, StoreError, StoreResult};

/// Numeric `{id}` path segment; anything else is a missing page.
pub struct EntityId(pub i64);

impl<S: Send + Sync> FromRequestParts<S> for EntityId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound)?;
        raw.parse::<i64>().map(EntityId).map_err(|_| AppError::NotFound)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchForm {
    pub search_term: String,
}

pub(crate) fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Render `view` with any pending flash messages, consuming them.
pub(crate) fn render_page(
    state: &AppState,
    jar: CookieJar,
    status: StatusCode,
    view: View,
) -> Result<Response, AppError> {
    let (jar, pending) = flash::take(jar);
    let rendered = state.renderer.render(&view.with_flashes(pending))?;

    Ok((
        status,
        jar,
        [(header::CONTENT_TYPE, rendered.content_type)],
        rendered.body,
    )
        .into_response())
}

/// JSON `{"success": bool}` for a delete, flashing the outcome for the next page.
pub(crate) fn delete_response(
    jar: CookieJar,
    kind: EntityKind,
    outcome: StoreResult<String>,
) -> Response {
    let (status, message) = match outcome {
        Ok(name) => (
            StatusCode::OK,
            Some(format!("{kind} {name} was successfully deleted!")),
        ),
        Err(StoreError::NotFound { .. }) => (StatusCode::NOT_FOUND, None),
        Err(StoreError::WriteFailed { name, .. }) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Some(format!("An error occurred. {kind} {name} could not be deleted.")),
        ),
        Err(err) => {
            log::error!("{}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(format!("An error occurred. {kind} could not be deleted.")),
            )
        }
    };

    let jar = flash::push(jar, message.into_iter().collect());
    let success = status == StatusCode::OK;
    (status, jar, Json(json!({ "success": success }))).into_response()
}
