use std::{collections::HashMap, num::NonZeroU32, sync::Arc};

use async_trait::async_trait;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::{error::RemoteError, record::NewPage};

/// Exact-match filter over the title and year columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TitleYearFilter {
    pub title_property: String,
    pub title: String,
    pub year_property: String,
    pub year: String,
}

impl TitleYearFilter {
    fn to_query(&self) -> serde_json::Value {
        json!({
            "filter": {
                "and": [
                    { "property": self.title_property, "title": { "equals": self.title } },
                    { "property": self.year_property, "rich_text": { "equals": self.year } },
                ]
            },
            "page_size": 1,
        })
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct PageRef {
    pub id: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseSchema {
    /// Declared properties keyed by their human name.
    pub properties: HashMap<String, SchemaProperty>,
}

impl DatabaseSchema {
    /// Re-keys the declared properties by property id.
    pub fn by_id(&self) -> HashMap<&str, &SchemaProperty> {
        self.properties.values().map(|p| (p.id.as_str(), p)).collect()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct SchemaProperty {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub kind: PropertyKind,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyKind {
    Select { select: OptionList },
    MultiSelect { multi_select: OptionList },
    #[serde(other)]
    Other,
}

impl PropertyKind {
    pub fn options(&self) -> Option<&[SchemaOption]> {
        match self {
            PropertyKind::Select { select } => Some(&select.options),
            PropertyKind::MultiSelect { multi_select } => Some(&multi_select.options),
            PropertyKind::Other => None,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct OptionList {
    #[serde(default)]
    pub options: Vec<SchemaOption>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SchemaOption {
    pub id: String,
    pub name: String,
}

/// The remote document database, reached only through these calls.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create_page(&self, page: &NewPage) -> Result<(), RemoteError>;

    async fn retrieve_database(&self, database_id: &str) -> Result<DatabaseSchema, RemoteError>;

    async fn query_database(
        &self,
        database_id: &str,
        filter: &TitleYearFilter,
    ) -> Result<Vec<PageRef>, RemoteError>;
}

pub struct NotionClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    version: String,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl NotionClient {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        base_url: String,
        version: String,
        rps: u32,
    ) -> Self {
        let quota = Quota::per_second(NonZeroU32::new(rps).unwrap_or(NonZeroU32::MIN));
        let limiter = Arc::new(RateLimiter::direct(quota));
        Self { client, api_key, base_url, version, limiter }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, RemoteError> {
        self.limiter.until_ready().await;

        let resp = req
            .bearer_auth(&self.api_key)
            .header("Notion-Version", &self.version)
            .send()
            .await?;

        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), body = %body, "notion request failed");
        Err(api_error(status.as_u16(), &body))
    }
}

#[async_trait]
impl DocumentStore for NotionClient {
    async fn create_page(&self, page: &NewPage) -> Result<(), RemoteError> {
        let req = self.client.post(self.url("pages")).json(page);
        let created: PageRef = self.send(req).await?.json().await?;
        debug!(page_id = %created.id, "created page");
        Ok(())
    }

    async fn retrieve_database(&self, database_id: &str) -> Result<DatabaseSchema, RemoteError> {
        let req = self.client.get(self.url(&format!("databases/{database_id}")));
        Ok(self.send(req).await?.json().await?)
    }

    async fn query_database(
        &self,
        database_id: &str,
        filter: &TitleYearFilter,
    ) -> Result<Vec<PageRef>, RemoteError> {
        let req = self
            .client
            .post(self.url(&format!("databases/{database_id}/query")))
            .json(&filter.to_query());
        let resp: QueryResponse = self.send(req).await?.json().await?;
        Ok(resp.results)
    }
}

fn api_error(status: u16, body: &str) -> RemoteError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(err) => RemoteError::Api { status, code: err.code, message: err.message },
        Err(_) => RemoteError::Api {
            status,
            code: "unknown".to_string(),
            message: if body.trim().is_empty() {
                format!("request failed with status {status}")
            } else {
                body.trim().to_string()
            },
        },
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    results: Vec<PageRef>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: String,
    message: String,
}
