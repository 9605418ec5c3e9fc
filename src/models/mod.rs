// Model exports
pub mod domain;

pub use domain::{
    BusinessRecord, Coordinate, IndexDocument, RawRecord, RecommendationResult, RecordError,
    UserQuery,
};
