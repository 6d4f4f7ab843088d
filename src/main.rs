mod config;
mod error;
mod models;
mod notion;
mod record;
mod routes;
#[cfg(test)]
mod testing;
mod translator;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{config::Config, notion::NotionClient, translator::MovieTranslator};

pub struct AppState {
    pub translator: MovieTranslator,
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/getAllMovieSelectOptions", get(routes::movie_select_options))
        .route("/createUnwatchedMovie", post(routes::create_unwatched_movie))
        .route("/createWatchedMovie", post(routes::create_watched_movie))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,moviedeck=debug".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let http = reqwest::Client::builder()
        .user_agent("moviedeck/0.1")
        .timeout(Duration::from_secs(config.notion_timeout_secs))
        .build()?;

    let notion = NotionClient::new(
        http,
        config.notion_api_key.clone(),
        config.notion_base_url.clone(),
        config.notion_version.clone(),
        config.notion_rps,
    );

    let translator = MovieTranslator::new(
        Arc::new(notion),
        config.movie_database_id.clone(),
        config.movie_fields.clone(),
    );

    let state = Arc::new(AppState { translator });

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, database = %config.movie_database_id, "listening");
    axum::serve(listener, app(state)).await?;

    Ok(())
}
