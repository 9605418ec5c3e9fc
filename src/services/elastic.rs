use crate::models::{IndexDocument, RawRecord};
use crate::services::{IndexSink, RecordSource, SourceError};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Page size for the scroll scan of the raw index
const SCROLL_PAGE_SIZE: usize = 1000;
/// Keep-alive for the scroll cursor between pages
const SCROLL_KEEP_ALIVE: &str = "1m";

/// Errors that can occur when talking to Elasticsearch
#[derive(Debug, Error)]
pub enum ElasticError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Elasticsearch REST client
///
/// Handles all communication with the index store:
/// - Creating the recommendation index with its geo-point mapping
/// - Scanning the raw index as the bulk record source
/// - Upserting ranked results
pub struct ElasticClient {
    base_url: String,
    index: String,
    doc_type: String,
    raw_resource: String,
    client: Client,
}

impl ElasticClient {
    /// Create a new Elasticsearch client
    ///
    /// `raw_resource` is the `index/doc_type` path of the raw data to scan.
    pub fn new(base_url: String, index: String, doc_type: String, raw_resource: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            index,
            doc_type,
            raw_resource,
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Check whether the recommendation index exists
    pub async fn index_exists(&self) -> Result<bool, ElasticError> {
        let response = self.client.head(self.url(&self.index)).send().await?;

        match response.status() {
            status if status.is_success() => Ok(true),
            reqwest::StatusCode::NOT_FOUND => Ok(false),
            status => Err(ElasticError::ApiError(format!(
                "Index existence check failed: {}",
                status
            ))),
        }
    }

    /// Create the recommendation index with its mapping
    pub async fn create_index(&self) -> Result<(), ElasticError> {
        let body = json!({
            "mappings": {
                (self.doc_type.as_str()): {
                    "properties": {
                        "businessId": { "type": "string" },
                        "name": { "type": "string" },
                        "full_address": { "type": "string" },
                        "categories": { "type": "string" },
                        "stars": { "type": "string" },
                        "location": { "type": "geo_point", "index": "not_analyzed" },
                    }
                }
            }
        });

        let response = self
            .client
            .put(self.url(&self.index))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ElasticError::ApiError(format!(
                "Failed to create index {}: {}",
                self.index,
                response.status()
            )));
        }

        tracing::info!("Created index {} with geo-point mapping", self.index);
        Ok(())
    }

    /// Scan the raw index and return every record
    ///
    /// Uses the scroll API so indexes past the search window size are read
    /// in full, one page at a time. Hits that cannot be decoded are logged
    /// with their document id and skipped, never silently dropped.
    pub async fn fetch_raw(&self) -> Result<Vec<RawRecord>, ElasticError> {
        let first_url = format!(
            "{}?scroll={}&size={}",
            self.url(&format!("{}/_search", self.raw_resource)),
            SCROLL_KEEP_ALIVE,
            SCROLL_PAGE_SIZE
        );

        tracing::debug!("Scanning raw records from: {}", first_url);

        let mut page = self.fetch_json(self.client.get(&first_url)).await?;
        let mut records = Vec::new();

        loop {
            let hits = page
                .get("hits")
                .and_then(|h| h.get("hits"))
                .and_then(|h| h.as_array())
                .ok_or_else(|| ElasticError::InvalidResponse("Missing hits array".into()))?;

            if hits.is_empty() {
                break;
            }

            for hit in hits {
                let id = hit
                    .get("_id")
                    .and_then(|i| i.as_str())
                    .unwrap_or("<unknown>");

                let Some(source) = hit.get("_source") else {
                    tracing::warn!("Skipping hit {} without _source", id);
                    continue;
                };

                match serde_json::from_value::<RawRecord>(source.clone()) {
                    Ok(record) => records.push(record),
                    Err(e) => tracing::warn!("Skipping undecodable hit {}: {}", id, e),
                }
            }

            // A response without a cursor is a single page
            let Some(scroll_id) = page
                .get("_scroll_id")
                .and_then(|s| s.as_str())
                .map(str::to_string)
            else {
                break;
            };

            page = self
                .fetch_json(self.client.post(self.url("_search/scroll")).json(&json!({
                    "scroll": SCROLL_KEEP_ALIVE,
                    "scroll_id": scroll_id,
                })))
                .await?;
        }

        tracing::debug!("Scanned {} raw records", records.len());

        Ok(records)
    }

    async fn fetch_json(&self, request: reqwest::RequestBuilder) -> Result<Value, ElasticError> {
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(ElasticError::ApiError(format!(
                "Failed to scan {}: {}",
                self.raw_resource,
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    /// Write one document, keyed by its business id
    pub async fn upsert_document(&self, document: &IndexDocument) -> Result<(), ElasticError> {
        let path = format!(
            "{}/{}/{}",
            self.index, self.doc_type, document.business_id
        );

        let response = self
            .client
            .put(self.url(&path))
            .json(document)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ElasticError::ApiError(format!(
                "Failed to upsert document {}: {}",
                document.business_id,
                response.status()
            )));
        }

        tracing::debug!("Upserted document {}", document.business_id);

        Ok(())
    }
}

impl IndexSink for ElasticClient {
    async fn ensure_index(&self) -> Result<(), ElasticError> {
        if !self.index_exists().await? {
            self.create_index().await?;
        }
        Ok(())
    }

    async fn upsert(&self, document: &IndexDocument) -> Result<(), ElasticError> {
        self.upsert_document(document).await
    }
}

impl RecordSource for ElasticClient {
    async fn fetch_all(&self) -> Result<Vec<RawRecord>, SourceError> {
        Ok(self.fetch_raw().await?)
    }
}
