use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Response};
use axum_extra::extract::CookieJar;

use crate::http_server::{
    error::AppError,
    http_routes::render_page,
    render::{Page, View},
    state::AppState,
};

pub async fn index(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    render_page(&state, jar, StatusCode::OK, View::new(Page::Home))
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}
