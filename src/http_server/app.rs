use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use color_eyre::eyre::{Context, eyre};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{
    config::Config,
    database::Database,
    http_server::{
        error::render_error_pages,
        http_routes::{artists, home, shows, venues},
        render::JsonRenderer,
        state::AppState,
    },
};

pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
    pub database: Database,
    pub config: Config,
}

pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home::index))
        .route("/venues", get(venues::index))
        .route("/venues/search", post(venues::search))
        .route(
            "/venues/create",
            get(venues::create_form).post(venues::create),
        )
        .route("/venues/{id}", get(venues::show).delete(venues::delete))
        .route(
            "/venues/{id}/edit",
            get(venues::edit_form).post(venues::edit),
        )
        .route("/artists", get(artists::index))
        .route("/artists/search", post(artists::search))
        .route(
            "/artists/create",
            get(artists::create_form).post(artists::create),
        )
        .route("/artists/{id}", get(artists::show).delete(artists::delete))
        .route(
            "/artists/{id}/edit",
            get(artists::edit_form).post(artists::edit),
        )
        .route("/shows", get(shows::index))
        .route(
            "/shows/create",
            get(shows::create_form).post(shows::create),
        )
        .fallback(home::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::map_response_with_state(
                    app_state.clone(),
                    render_error_pages,
                )),
        )
        .with_state(app_state)
}

pub async fn start(server_config: HttpServerConfig) -> color_eyre::Result<()> {
    let HttpServerConfig {
        host,
        port,
        database,
        config,
    } = server_config;

    let app_state = Arc::new(AppState {
        store: Arc::new(database),
        renderer: Arc::new(JsonRenderer),
        config,
    });
    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .wrap_err_with(|| eyre!("Failed to bind to {}:{}", host, port))?;
    log::info!("Listening on http://{}:{}", host, port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("Failed to start HTTP server")?;

    log::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down HTTP server");
}
