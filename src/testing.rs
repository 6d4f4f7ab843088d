//! In-memory store and fixtures shared by the unit tests.

use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::{
    config::MovieFields,
    error::RemoteError,
    models::MovieSubmission,
    notion::{DatabaseSchema, DocumentStore, PageRef, TitleYearFilter},
    record::{NewPage, PropertyValue, RichText},
};

pub fn movie_fields() -> MovieFields {
    MovieFields {
        watched: "w".to_string(),
        title: "title".to_string(),
        genre: "g".to_string(),
        year: "y".to_string(),
        run_time: "rt".to_string(),
        rewatch: "rw".to_string(),
        rating: "ra".to_string(),
        scare_factor: "sf".to_string(),
        franchise: "fr".to_string(),
        chronological: "ch".to_string(),
        release: "re".to_string(),
        poster: "po".to_string(),
    }
}

/// The Dune submission, with `extra` keys merged over it.
pub fn submission_body(extra: Value) -> Value {
    let mut body = json!({
        "title": "Dune",
        "genres": [{ "name": "Sci-Fi" }],
        "year": "2021",
        "runTime": "155",
        "poster": "http://x/p.jpg",
    });
    if let (Some(base), Value::Object(extra)) = (body.as_object_mut(), extra) {
        base.extend(extra);
    }
    body
}

pub fn submission(extra: Value) -> MovieSubmission {
    serde_json::from_value(submission_body(extra)).unwrap()
}

#[derive(Default)]
pub struct FakeStore {
    pages: Mutex<Vec<NewPage>>,
    queries: AtomicUsize,
    create_error: Option<String>,
    query_error: Option<String>,
}

impl FakeStore {
    pub fn failing_create(message: &str) -> Self {
        Self { create_error: Some(message.to_string()), ..Self::default() }
    }

    pub fn failing_query(message: &str) -> Self {
        Self { query_error: Some(message.to_string()), ..Self::default() }
    }

    pub fn created(&self) -> Vec<NewPage> {
        self.pages.lock().unwrap().clone()
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

fn plain_text(value: Option<&PropertyValue>) -> Option<&str> {
    match value? {
        PropertyValue::Title(text) | PropertyValue::RichText(text) => match text.first()? {
            RichText::Text { text } => Some(text.content.as_str()),
        },
        _ => None,
    }
}

#[async_trait]
impl DocumentStore for FakeStore {
    async fn create_page(&self, page: &NewPage) -> Result<(), RemoteError> {
        if let Some(message) = &self.create_error {
            return Err(RemoteError::Api {
                status: 429,
                code: "rate_limited".to_string(),
                message: message.clone(),
            });
        }
        self.pages.lock().unwrap().push(page.clone());
        Ok(())
    }

    async fn retrieve_database(&self, _database_id: &str) -> Result<DatabaseSchema, RemoteError> {
        let schema = json!({
            "properties": {
                "Title": { "id": "title", "name": "Title", "type": "title", "title": {} },
                "Genre": {
                    "id": "g",
                    "name": "Genre",
                    "type": "multi_select",
                    "multi_select": { "options": [
                        { "id": "g-2", "name": "Horror", "color": "red" },
                        { "id": "g-1", "name": "Comedy", "color": "yellow" },
                    ] },
                },
                "Rating": {
                    "id": "ra",
                    "name": "Rating",
                    "type": "select",
                    "select": { "options": [{ "id": "r-1", "name": "10/10" }] },
                },
                "Scare Factor": {
                    "id": "sf",
                    "name": "Scare Factor",
                    "type": "select",
                    "select": { "options": [{ "id": "sf-1", "name": "Spooky" }] },
                },
                "Franchise": {
                    "id": "fr",
                    "name": "Franchise",
                    "type": "select",
                    "select": { "options": [
                        { "id": "fr-0", "name": "None" },
                        { "id": "fr-1", "name": "Alien" },
                    ] },
                },
            }
        });
        Ok(serde_json::from_value(schema).unwrap())
    }

    async fn query_database(
        &self,
        _database_id: &str,
        filter: &TitleYearFilter,
    ) -> Result<Vec<PageRef>, RemoteError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.query_error {
            return Err(RemoteError::Api {
                status: 503,
                code: "service_unavailable".to_string(),
                message: message.clone(),
            });
        }
        let pages = self.pages.lock().unwrap();
        Ok(pages
            .iter()
            .enumerate()
            .filter(|(_, p)| {
                plain_text(p.properties.get(&filter.title_property)) == Some(filter.title.as_str())
                    && plain_text(p.properties.get(&filter.year_property))
                        == Some(filter.year.as_str())
            })
            .map(|(i, _)| PageRef { id: format!("page-{i}") })
            .collect())
    }
}
