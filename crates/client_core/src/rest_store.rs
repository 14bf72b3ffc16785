//! Row store backed by a PostgREST-style HTTP endpoint.

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use shared::{
    domain::{TodoId, LISTING_ORDER},
    error::StoreErrorBody,
    protocol::{NewTodo, Todo, TodoPatch},
};
use tracing::debug;
use url::Url;

use crate::{
    config::{normalize_store_url, StoreSettings},
    error::StoreError,
    RowStore,
};

const PREFER_HEADER: &str = "Prefer";
const RETURN_REPRESENTATION: &str = "return=representation";

pub struct RestRowStore {
    http: Client,
    table_url: Url,
    api_key: Option<String>,
}

impl RestRowStore {
    pub fn new(store_url: &str, table: &str, api_key: Option<String>) -> anyhow::Result<Self> {
        Self::with_client(Client::new(), store_url, table, api_key)
    }

    pub fn from_settings(settings: &StoreSettings) -> anyhow::Result<Self> {
        let store_url = settings
            .store_url
            .as_deref()
            .ok_or_else(|| anyhow!("no store url configured"))?;
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .context("failed to build http client")?;
        Self::with_client(http, store_url, &settings.table, settings.api_key.clone())
    }

    fn with_client(
        http: Client,
        store_url: &str,
        table: &str,
        api_key: Option<String>,
    ) -> anyhow::Result<Self> {
        let mut table_url = normalize_store_url(store_url)?;
        table_url
            .path_segments_mut()
            .map_err(|()| anyhow!("store url '{store_url}' cannot carry a path"))?
            .pop_if_empty()
            .extend(["rest", "v1", table]);

        Ok(Self {
            http,
            table_url,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    pub fn table_url(&self) -> &Url {
        &self.table_url
    }

    fn request(&self, method: Method) -> RequestBuilder {
        let builder = self.http.request(method, self.table_url.clone());
        match &self.api_key {
            Some(key) => builder.header("apikey", key.as_str()).bearer_auth(key),
            None => builder,
        }
    }
}

fn id_filter(id: TodoId) -> [(&'static str, String); 1] {
    [("id", format!("eq.{}", id.0))]
}

async fn ensure_success(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let body = serde_json::from_str::<StoreErrorBody>(&text)
        .ok()
        .filter(|body| !body.message.is_empty())
        .unwrap_or_else(|| {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                StoreErrorBody::new(status.canonical_reason().unwrap_or("request failed"))
            } else {
                StoreErrorBody::new(trimmed)
            }
        });
    Err(StoreError::Rejected {
        status: status.as_u16(),
        exception: body.into(),
    })
}

async fn read_rows(response: Response) -> Result<Vec<Todo>, StoreError> {
    let bytes = ensure_success(response).await?.bytes().await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl RowStore for RestRowStore {
    async fn select_all(&self) -> Result<Vec<Todo>, StoreError> {
        debug!(url = %self.table_url, "selecting all rows");
        let response = self
            .request(Method::GET)
            .query(&[("select", "*"), ("order", LISTING_ORDER)])
            .send()
            .await?;
        read_rows(response).await
    }

    async fn insert(&self, row: NewTodo) -> Result<Vec<Todo>, StoreError> {
        let response = self
            .request(Method::POST)
            .header(PREFER_HEADER, RETURN_REPRESENTATION)
            .json(&[row])
            .send()
            .await?;
        read_rows(response).await
    }

    async fn update(&self, id: TodoId, patch: TodoPatch) -> Result<Vec<Todo>, StoreError> {
        let response = self
            .request(Method::PATCH)
            .query(&id_filter(id))
            .header(PREFER_HEADER, RETURN_REPRESENTATION)
            .json(&patch)
            .send()
            .await?;
        read_rows(response).await
    }

    async fn delete(&self, id: TodoId) -> Result<(), StoreError> {
        let response = self
            .request(Method::DELETE)
            .query(&id_filter(id))
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/rest_store_tests.rs"]
mod tests;
