use std::net::SocketAddr;

use anyhow::Context;

/// Notion property ids for every column the movie database exposes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MovieFields {
    pub watched: String,
    pub title: String,
    pub genre: String,
    pub year: String,
    pub run_time: String,
    pub rewatch: String,
    pub rating: String,
    pub scare_factor: String,
    pub franchise: String,
    pub chronological: String,
    pub release: String,
    pub poster: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub notion_api_key: String,
    pub notion_base_url: String,
    pub notion_version: String,
    pub notion_rps: u32,
    pub notion_timeout_secs: u64,
    pub movie_database_id: String,
    pub movie_fields: MovieFields,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |key: &str| -> anyhow::Result<String> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .with_context(|| format!("{key} must be set"))
        };

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 =
            lookup("PORT").unwrap_or_else(|| "3000".to_string()).parse().context("PORT")?;

        let notion_api_key = required("NOTION_API_KEY")?;
        let notion_base_url =
            lookup("NOTION_BASE_URL").unwrap_or_else(|| "https://api.notion.com/v1".to_string());
        let notion_version =
            lookup("NOTION_VERSION").unwrap_or_else(|| "2022-06-28".to_string());

        let notion_rps: u32 = lookup("NOTION_RPS").and_then(|s| s.parse().ok()).unwrap_or(3);

        let notion_timeout_secs: u64 =
            lookup("NOTION_TIMEOUT_SECS").and_then(|s| s.parse().ok()).unwrap_or(30);

        let movie_fields = MovieFields {
            watched: required("MOVIE_WATCHED_ID")?,
            title: required("MOVIE_TITLE_ID")?,
            genre: required("MOVIE_GENRE_ID")?,
            year: required("MOVIE_YEAR_ID")?,
            run_time: required("MOVIE_RUN_TIME_ID")?,
            rewatch: required("MOVIE_REWATCH_ID")?,
            rating: required("MOVIE_RATING_ID")?,
            scare_factor: required("MOVIE_SCARE_FACTOR_ID")?,
            franchise: required("MOVIE_FRANCHISE_ID")?,
            chronological: required("MOVIE_CHRONOLOGICAL_ID")?,
            release: required("MOVIE_RELEASE_ID")?,
            poster: required("MOVIE_POSTER_ID")?,
        };

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            notion_api_key,
            notion_base_url,
            notion_version,
            notion_rps,
            notion_timeout_secs,
            movie_database_id: required("NOTION_MOVIE_DATABASE_ID")?,
            movie_fields,
        })
    }
}
