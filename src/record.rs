//! Notion-shaped page payloads built from movie submissions.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::{
    config::MovieFields,
    error::TranslateError,
    models::{MovieSubmission, OptionRef},
};

const NO_FRANCHISE: &str = "None";

/// Property id -> typed property value, as sent on page create.
pub type RemoteRecord = BTreeMap<String, PropertyValue>;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyValue {
    Checkbox(bool),
    Title(Vec<RichText>),
    MultiSelect(Vec<SelectRef>),
    RichText(Vec<RichText>),
    Select(SelectRef),
    Number(Value),
    Files(Vec<FileRef>),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SelectRef {
    Id { id: String },
    Name { name: String },
}

impl SelectRef {
    pub fn name(name: impl Into<String>) -> Self {
        SelectRef::Name { name: name.into() }
    }

    pub fn id(id: impl Into<String>) -> Self {
        SelectRef::Id { id: id.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RichText {
    Text { text: TextContent },
}

impl RichText {
    pub fn plain(content: impl Into<String>) -> Vec<Self> {
        vec![RichText::Text { text: TextContent { content: content.into() } }]
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TextContent {
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FileRef {
    External { name: String, external: ExternalUrl },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExternalUrl {
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewPage {
    pub parent: Parent,
    pub properties: RemoteRecord,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Parent {
    pub database_id: String,
}

impl NewPage {
    pub fn in_database(database_id: &str, properties: RemoteRecord) -> Self {
        Self { parent: Parent { database_id: database_id.to_string() }, properties }
    }
}

pub fn unwatched_record(fields: &MovieFields, movie: &MovieSubmission) -> RemoteRecord {
    base_record(fields, movie, false)
}

pub fn watched_record(
    fields: &MovieFields,
    movie: &MovieSubmission,
) -> Result<RemoteRecord, TranslateError> {
    let rating_id = movie
        .rating
        .as_ref()
        .and_then(|r| r.id.clone())
        .ok_or_else(|| TranslateError::Build("a rating id is required".to_string()))?;

    let mut record = base_record(fields, movie, true);
    record.insert(fields.rewatch.clone(), PropertyValue::Checkbox(movie.rewatch.unwrap_or(false)));
    record.insert(fields.rating.clone(), PropertyValue::Select(SelectRef::id(rating_id)));

    if let Some(select) = movie.scare_factor.included().and_then(scare_factor_select) {
        record.insert(fields.scare_factor.clone(), PropertyValue::Select(select));
    }

    Ok(record)
}

fn scare_factor_select(option: &OptionRef) -> Option<SelectRef> {
    match (&option.id, &option.name) {
        (Some(id), _) => Some(SelectRef::id(id.clone())),
        (None, Some(name)) => Some(SelectRef::name(name.clone())),
        (None, None) => None,
    }
}

fn base_record(fields: &MovieFields, movie: &MovieSubmission, watched: bool) -> RemoteRecord {
    let mut record = RemoteRecord::new();

    record.insert(fields.watched.clone(), PropertyValue::Checkbox(watched));
    record.insert(fields.title.clone(), PropertyValue::Title(RichText::plain(&movie.title)));
    record.insert(
        fields.genre.clone(),
        PropertyValue::MultiSelect(
            movie.genres.iter().map(|g| SelectRef::name(g.name.clone())).collect(),
        ),
    );
    record.insert(fields.year.clone(), PropertyValue::RichText(RichText::plain(&movie.year)));
    record
        .insert(fields.run_time.clone(), PropertyValue::RichText(RichText::plain(&movie.run_time)));
    record.insert(
        fields.poster.clone(),
        PropertyValue::Files(vec![FileRef::External {
            name: format!("{} poster", movie.title),
            external: ExternalUrl { url: movie.poster.clone() },
        }]),
    );

    let franchise = movie.franchise.included().map_or(NO_FRANCHISE, |f| f.name.as_str());
    record.insert(fields.franchise.clone(), PropertyValue::Select(SelectRef::name(franchise)));

    if let Some(n) = movie.chronological.included() {
        record.insert(fields.chronological.clone(), PropertyValue::Number(n.clone()));
    }
    if let Some(n) = movie.release.included() {
        record.insert(fields.release.clone(), PropertyValue::Number(n.clone()));
    }

    record
}
