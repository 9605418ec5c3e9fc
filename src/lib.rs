//! Yelp Reco - geo-filtered top-N restaurant recommender
//!
//! This library ingests restaurant records, republishes them onto a Kafka
//! topic, filters them by proximity and category, ranks them by star rating
//! and writes the top results to an Elasticsearch index. The reusable core
//! is the ranking engine in [`core`]; Elasticsearch, Kafka and the record
//! sources are collaborators behind the narrow traits in [`services`].

pub mod config;
pub mod core;
pub mod models;
pub mod pipeline;
pub mod relay;
pub mod services;

// Re-export commonly used types
pub use crate::core::{distance::haversine_distance, select_top_n, Recommender};
pub use crate::models::{BusinessRecord, Coordinate, RawRecord, RecommendationResult, UserQuery};
pub use crate::relay::Relay;
