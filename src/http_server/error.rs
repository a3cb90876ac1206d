use axum::{
    body::Body,
    extract::State,
    http::{Response, StatusCode, header},
    response::IntoResponse,
};
use std::sync::Arc;

use crate::http_server::render::{Page, View};
use crate::http_server::state::AppState;
use crate::ports::listing_store::StoreError;

/// Failures that end a request on a dedicated error page.
#[derive(Debug)]
pub enum AppError {
    NotFound,
    Internal(color_eyre::Report),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => AppError::NotFound,
            other => AppError::Internal(other.into()),
        }
    }
}

impl From<color_eyre::Report> for AppError {
    fn from(report: color_eyre::Report) -> Self {
        AppError::Internal(report)
    }
}

/// Marks a response whose body is drawn later by [`render_error_pages`].
#[derive(Debug, Clone, Copy)]
pub struct ErrorPage(pub Page);

// Tell axum how to convert `AppError` into a response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response<Body> {
        let (status, page) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, Page::NotFound),
            AppError::Internal(report) => {
                log::error!("{}", format!("{report:#}").replace('\n', " | "));
                (StatusCode::INTERNAL_SERVER_ERROR, Page::ServerError)
            }
        };

        let mut response = status.into_response();
        response.extensions_mut().insert(ErrorPage(page));
        response
    }
}

/// Draw the 404/500 pages through the configured renderer.
pub async fn render_error_pages(
    State(state): State<Arc<AppState>>,
    mut response: Response<Body>,
) -> Response<Body> {
    let Some(ErrorPage(page)) = response.extensions_mut().remove::<ErrorPage>() else {
        return response;
    };
    let status = response.status();

    match state.renderer.render(&View::new(page)) {
        Ok(rendered) => (
            status,
            [(header::CONTENT_TYPE, rendered.content_type)],
            rendered.body,
        )
            .into_response(),
        Err(err) => {
            log::error!("Failed to render {:?} page: {:#}", page, err);
            // Fallback
            (status, "Something went wrong".to_string()).into_response()
        }
    }
}
