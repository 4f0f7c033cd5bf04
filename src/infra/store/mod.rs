//! Thin request/response client for the remote course store.
//!
//! The store exposes a PostgREST-style REST dialect: one path segment
//! per table, filter clauses as query parameters, `Prefer` headers for
//! representation and conflict handling, and stored procedures under
//! `rpc/`. This client stays generic — table knowledge lives in the
//! typed repositories layered on top.
//!
//! Every request carries the configured timeout, so a hung store call
//! surfaces as a retryable error instead of waiting forever.

mod filter;

pub use filter::Filter;

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::config::StoreSettings;

const PREFER_REPRESENTATION: &str = "return=representation";
const PREFER_MINIMAL: &str = "return=minimal";
const PREFER_MERGE: &str = "resolution=merge-duplicates,return=minimal";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid store URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("store rejected request with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode store response: {0}")]
    Decode(String),
    #[error("store returned no rows where one was expected")]
    EmptyRepresentation,
}

#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    base: Url,
    api_key: String,
    timeout: Duration,
}

impl RestStore {
    pub fn new(settings: &StoreSettings) -> Result<Self, StoreError> {
        let mut base = Url::parse(&settings.base_url)?;
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }

        let client = Client::builder().user_agent(Self::user_agent()).build()?;

        Ok(Self {
            client,
            base,
            api_key: settings.api_key.clone(),
            timeout: settings.request_timeout,
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("aula/", env!("CARGO_PKG_VERSION"))
    }

    /// Fetch the rows matching `filter`.
    pub async fn select<T>(&self, table: &str, filter: &Filter) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned,
    {
        let url = self.table_url(table, filter)?;
        let response = self.send(self.request(Method::GET, url)).await?;
        Self::decode_rows(response).await
    }

    /// Insert one row and return it as the store persisted it, including
    /// the store-assigned id.
    pub async fn insert<T, B>(&self, table: &str, row: &B) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let url = self.table_url(table, &Filter::new())?;
        let response = self
            .send(
                self.request(Method::POST, url)
                    .header("Prefer", PREFER_REPRESENTATION)
                    .json(row),
            )
            .await?;
        Self::decode_single(response).await
    }

    /// Insert one row without asking for the representation back.
    pub async fn insert_unit<B>(&self, table: &str, row: &B) -> Result<(), StoreError>
    where
        B: Serialize,
    {
        let url = self.table_url(table, &Filter::new())?;
        self.send(
            self.request(Method::POST, url)
                .header("Prefer", PREFER_MINIMAL)
                .json(row),
        )
        .await?;
        Ok(())
    }

    /// Patch the rows matching `filter` and return the first updated row.
    pub async fn update_returning<T, B>(
        &self,
        table: &str,
        filter: &Filter,
        patch: &B,
    ) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let url = self.table_url(table, filter)?;
        let response = self
            .send(
                self.request(Method::PATCH, url)
                    .header("Prefer", PREFER_REPRESENTATION)
                    .json(patch),
            )
            .await?;
        Self::decode_single(response).await
    }

    /// Patch the rows matching `filter`.
    pub async fn update<B>(&self, table: &str, filter: &Filter, patch: &B) -> Result<(), StoreError>
    where
        B: Serialize,
    {
        let url = self.table_url(table, filter)?;
        self.send(
            self.request(Method::PATCH, url)
                .header("Prefer", PREFER_MINIMAL)
                .json(patch),
        )
        .await?;
        Ok(())
    }

    /// Delete the rows matching `filter`, returning how many went away.
    pub async fn delete(&self, table: &str, filter: &Filter) -> Result<u64, StoreError> {
        let url = self.table_url(table, filter)?;
        let response = self
            .send(
                self.request(Method::DELETE, url)
                    .header("Prefer", PREFER_REPRESENTATION),
            )
            .await?;
        let rows: Vec<serde_json::Value> = Self::decode_rows(response).await?;
        Ok(rows.len() as u64)
    }

    /// Insert-or-update on `conflict_key`.
    pub async fn upsert<B>(&self, table: &str, row: &B, conflict_key: &str) -> Result<(), StoreError>
    where
        B: Serialize,
    {
        let mut url = self.table_url(table, &Filter::new())?;
        url.query_pairs_mut()
            .append_pair("on_conflict", conflict_key);
        self.send(
            self.request(Method::POST, url)
                .header("Prefer", PREFER_MERGE)
                .json(row),
        )
        .await?;
        Ok(())
    }

    /// Invoke a stored procedure.
    pub async fn rpc<B>(&self, function: &str, params: &B) -> Result<(), StoreError>
    where
        B: Serialize,
    {
        let url = self.base.join(&format!("rpc/{function}"))?;
        self.send(self.request(Method::POST, url).json(params))
            .await?;
        Ok(())
    }

    fn table_url(&self, table: &str, filter: &Filter) -> Result<Url, StoreError> {
        let mut url = self.base.join(table)?;
        if !filter.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (column, clause) in filter.query_pairs() {
                pairs.append_pair(column, clause);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .timeout(self.timeout)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn decode_rows<T>(response: Response) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned,
    {
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes).map_err(|err| StoreError::Decode(err.to_string()))
    }

    async fn decode_single<T>(response: Response) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let bytes = response.bytes().await?;
        let value: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|err| StoreError::Decode(err.to_string()))?;

        let row = match value {
            serde_json::Value::Array(mut rows) => {
                if rows.is_empty() {
                    return Err(StoreError::EmptyRepresentation);
                }
                rows.remove(0)
            }
            other => other,
        };

        serde_json::from_value(row).map_err(|err| StoreError::Decode(err.to_string()))
    }
}
