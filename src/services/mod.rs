// Service exports
pub mod elastic;
pub mod kafka;
pub mod source;

pub use elastic::{ElasticClient, ElasticError};
pub use kafka::{KafkaPublisher, PublishError};
pub use source::{FileLineSource, SourceError};

use crate::models::{IndexDocument, RawRecord};

/// Bulk record source collaborator
///
/// The core only needs a materializable batch of raw records; how it is
/// fetched (index scan, file, network cursor) is the implementation's
/// business.
#[allow(async_fn_in_trait)]
pub trait RecordSource {
    async fn fetch_all(&self) -> Result<Vec<RawRecord>, SourceError>;
}

/// Search index sink collaborator
#[allow(async_fn_in_trait)]
pub trait IndexSink {
    /// Create the target index with its mapping if it does not exist yet
    async fn ensure_index(&self) -> Result<(), ElasticError>;

    async fn upsert(&self, document: &IndexDocument) -> Result<(), ElasticError>;
}

/// Message broker publish channel collaborator
#[allow(async_fn_in_trait)]
pub trait Publisher {
    async fn publish(&self, payload: &[u8]) -> Result<(), PublishError>;
}

/// Line-oriented source for the ingestion relay
#[allow(async_fn_in_trait)]
pub trait LineSource {
    /// Next logical record, or `None` when the source is exhausted
    async fn next_line(&mut self) -> Result<Option<String>, SourceError>;
}
