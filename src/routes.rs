use std::sync::Arc;

use axum::{Json, body::Bytes, extract::State};
use serde_json::Value;

use crate::{
    AppState,
    error::AppResult,
    models::{OptionCatalog, Outcome},
};

pub async fn movie_select_options(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<OptionCatalog>> {
    Ok(Json(state.translator.fetch_option_catalog().await?))
}

pub async fn create_unwatched_movie(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Json<Outcome> {
    match parse_body(&body) {
        Ok(body) => Json(state.translator.submit_unwatched(body).await),
        Err(err) => Json(Outcome::failed(err)),
    }
}

pub async fn create_watched_movie(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Json<Outcome> {
    match parse_body(&body) {
        Ok(body) => Json(state.translator.submit_watched(body).await),
        Err(err) => Json(Outcome::failed(err)),
    }
}

// JSON only; form-encoded posts are not accepted.
fn parse_body(body: &[u8]) -> serde_json::Result<Value> {
    serde_json::from_slice(body)
}
