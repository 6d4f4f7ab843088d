use std::{collections::HashMap, sync::Arc};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    config::MovieFields,
    error::TranslateError,
    models::{
        CatalogOption, MovieSubmission, OptionCatalog, Outcome, UNWATCHED_ADDED_MESSAGE,
        WATCHED_ADDED_MESSAGE,
    },
    notion::{DocumentStore, SchemaProperty, TitleYearFilter},
    record::{self, NewPage, RemoteRecord},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Watched {
    No,
    Yes,
}

/// Turns movie submissions into pages of the movie database.
#[derive(Clone)]
pub struct MovieTranslator {
    store: Arc<dyn DocumentStore>,
    database_id: String,
    fields: Arc<MovieFields>,
}

impl MovieTranslator {
    pub fn new(store: Arc<dyn DocumentStore>, database_id: String, fields: MovieFields) -> Self {
        Self { store, database_id, fields: Arc::new(fields) }
    }

    pub async fn submit_unwatched(&self, body: Value) -> Outcome {
        self.submit(body, Watched::No).await
    }

    pub async fn submit_watched(&self, body: Value) -> Outcome {
        self.submit(body, Watched::Yes).await
    }

    async fn submit(&self, body: Value, watched: Watched) -> Outcome {
        let result: Result<bool, TranslateError> = async {
            let movie: MovieSubmission = serde_json::from_value(body)?;

            if self.already_stored(&movie).await? {
                debug!(title = %movie.title, year = %movie.year, "duplicate submission rejected");
                return Ok(false);
            }

            let properties: RemoteRecord = match watched {
                Watched::No => record::unwatched_record(&self.fields, &movie),
                Watched::Yes => record::watched_record(&self.fields, &movie)?,
            };

            self.store.create_page(&NewPage::in_database(&self.database_id, properties)).await?;
            info!(title = %movie.title, year = %movie.year, watched = ?watched, "movie added");
            Ok(true)
        }
        .await;

        match result {
            Ok(true) => Outcome::created(match watched {
                Watched::No => UNWATCHED_ADDED_MESSAGE,
                Watched::Yes => WATCHED_ADDED_MESSAGE,
            }),
            Ok(false) => Outcome::duplicate(),
            Err(err) => {
                warn!(error = %err, watched = ?watched, "failed to add movie");
                Outcome::failed(err)
            },
        }
    }

    async fn already_stored(&self, movie: &MovieSubmission) -> Result<bool, TranslateError> {
        let filter = TitleYearFilter {
            title_property: self.fields.title.clone(),
            title: movie.title.clone(),
            year_property: self.fields.year.clone(),
            year: movie.year.clone(),
        };
        let matches = self.store.query_database(&self.database_id, &filter).await?;
        Ok(!matches.is_empty())
    }

    pub async fn fetch_option_catalog(&self) -> Result<OptionCatalog, TranslateError> {
        let schema = self.store.retrieve_database(&self.database_id).await?;
        let by_id = schema.by_id();

        Ok(OptionCatalog {
            genres: options_of(&by_id, &self.fields.genre)?,
            ratings: options_of(&by_id, &self.fields.rating)?,
            scare_factors: options_of(&by_id, &self.fields.scare_factor)?,
            franchises: options_of(&by_id, &self.fields.franchise)?,
        })
    }
}

fn options_of(
    by_id: &HashMap<&str, &SchemaProperty>,
    property_id: &str,
) -> Result<Vec<CatalogOption>, TranslateError> {
    let property = by_id
        .get(property_id)
        .ok_or_else(|| TranslateError::MissingProperty(property_id.to_string()))?;

    let options = property.kind.options().ok_or_else(|| TranslateError::WrongPropertyKind {
        id: property_id.to_string(),
        expected: "select",
    })?;

    Ok(options.iter().map(|o| CatalogOption { id: o.id.clone(), name: o.name.clone() }).collect())
}
