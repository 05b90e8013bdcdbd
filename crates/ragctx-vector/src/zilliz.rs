//! Zilliz Cloud / Milvus client over the REST v2 API.
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

use ragctx_core::traits::VectorSearch;
use ragctx_core::{Error, Result, SearchHit};

use crate::store::{VectorRecord, VectorStore};

const OUTPUT_FIELDS: [&str; 4] = ["id", "title", "content", "section"];

pub struct ZillizClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
    collection: String,
    dim: usize,
}

#[derive(Deserialize)]
struct ApiResponse<T> {
    code: i64,
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
}

#[derive(Deserialize)]
struct RawHit {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    section: String,
    #[serde(default)]
    distance: f32,
}

#[derive(Deserialize)]
struct HasCollection {
    has: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CollectionStats {
    row_count: usize,
}

impl ZillizClient {
    pub fn new(endpoint: &str, token: &str, collection: &str, dim: usize, request_timeout: Duration) -> Result<Self> {
        if endpoint.trim().is_empty() || token.trim().is_empty() {
            return Err(Error::InvalidConfig("ZILLIZ_ENDPOINT and ZILLIZ_API_KEY are required".into()));
        }
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| Error::InvalidConfig(format!("http client: {}", e)))?;
        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token: token.to_string(),
            collection: collection.to_string(),
            dim,
        })
    }

    async fn call<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<Option<T>> {
        let url = format!("{}/v2/vectordb/{}", self.endpoint, path);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::VectorSearch(format!("{} failed: {}", path, e)))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::VectorSearch(format!("{} returned HTTP {}", path, status)));
        }
        let parsed: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| Error::VectorSearch(format!("{}: invalid response: {}", path, e)))?;
        if parsed.code != 0 {
            return Err(Error::VectorSearch(format!(
                "{} returned code {}: {}",
                path,
                parsed.code,
                parsed.message.unwrap_or_default()
            )));
        }
        Ok(parsed.data)
    }

    async fn has_collection(&self) -> Result<bool> {
        let data: Option<HasCollection> = self.call("collections/has", json!({ "collectionName": self.collection })).await?;
        Ok(data.map(|d| d.has).unwrap_or(false))
    }

    fn create_body(&self) -> Value {
        let varchar = |name: &str, max_length: usize, primary: bool| {
            json!({
                "fieldName": name,
                "dataType": "VarChar",
                "isPrimary": primary,
                "elementTypeParams": { "max_length": max_length },
            })
        };
        json!({
            "collectionName": self.collection,
            "schema": {
                "autoId": false,
                "enabledDynamicField": false,
                "fields": [
                    varchar("id", 64, true),
                    varchar("title", 256, false),
                    varchar("content", 8192, false),
                    varchar("section", 32, false),
                    { "fieldName": "embedding", "dataType": "FloatVector", "elementTypeParams": { "dim": self.dim } },
                ],
            },
            "indexParams": [
                { "fieldName": "embedding", "indexName": "embedding", "indexType": "AUTOINDEX", "metricType": "COSINE" }
            ],
        })
    }
}

fn hit_from_raw(raw: RawHit) -> SearchHit {
    let id = match raw.id {
        Value::String(s) => s,
        other => other.to_string(),
    };
    // COSINE metric: `distance` is a similarity, higher is better.
    SearchHit { id, title: raw.title, content: raw.content, section: raw.section, score: raw.distance }
}

#[async_trait]
impl VectorSearch for ZillizClient {
    async fn search(&self, embedding: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        let body = json!({
            "collectionName": self.collection,
            "data": [embedding],
            "annsField": "embedding",
            "limit": k,
            "outputFields": OUTPUT_FIELDS,
        });
        let hits: Option<Vec<RawHit>> = self.call("entities/search", body).await?;
        let hits: Vec<SearchHit> = hits.unwrap_or_default().into_iter().map(hit_from_raw).collect();
        debug!(collection = %self.collection, k, hits = hits.len(), "vector search");
        Ok(hits)
    }
}

#[async_trait]
impl VectorStore for ZillizClient {
    async fn ensure_collection(&self) -> Result<()> {
        if self.has_collection().await? {
            info!(collection = %self.collection, "collection already exists");
            return Ok(());
        }
        let _: Option<Value> = self.call("collections/create", self.create_body()).await?;
        info!(collection = %self.collection, dim = self.dim, "collection created and loaded");
        Ok(())
    }

    async fn drop_collection(&self) -> Result<()> {
        if !self.has_collection().await? { return Ok(()); }
        let _: Option<Value> = self.call("collections/drop", json!({ "collectionName": self.collection })).await?;
        info!(collection = %self.collection, "collection dropped");
        Ok(())
    }

    async fn insert(&self, records: &[VectorRecord]) -> Result<()> {
        if records.is_empty() { return Ok(()); }
        let body = json!({ "collectionName": self.collection, "data": records });
        let _: Option<Value> = self.call("entities/insert", body).await?;
        info!(collection = %self.collection, rows = records.len(), "inserted vectors");
        Ok(())
    }

    async fn row_count(&self) -> Result<usize> {
        let stats: Option<CollectionStats> =
            self.call("collections/get_stats", json!({ "collectionName": self.collection })).await?;
        Ok(stats.map(|s| s.row_count).unwrap_or(0))
    }
}
