use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True when both components are inside the valid degree ranges
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Untyped record as it comes out of the bulk source
///
/// The raw index mixes field types depending on which ingest path wrote the
/// row: the CSV-derived dumps store everything as strings, direct JSON
/// loads keep numbers numeric and category lists as arrays. Every field is
/// coerced to an optional string here; validation happens in
/// `BusinessRecord::try_from`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default, deserialize_with = "de_stringly")]
    pub business_id: Option<String>,
    #[serde(default, deserialize_with = "de_stringly")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de_stringly")]
    pub full_address: Option<String>,
    #[serde(default, deserialize_with = "de_stringly")]
    pub categories: Option<String>,
    #[serde(default, deserialize_with = "de_stringly")]
    pub stars: Option<String>,
    #[serde(default, deserialize_with = "de_stringly")]
    pub latitude: Option<String>,
    #[serde(default, deserialize_with = "de_stringly")]
    pub longitude: Option<String>,
}

/// Accept string, number, bool or array for a stringly source field
fn de_stringly<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(coerce_to_string))
}

fn coerce_to_string(value: serde_json::Value) -> Option<String> {
    use serde_json::Value;

    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        // Category lists arrive as arrays from some ingest paths
        Value::Array(items) => {
            let parts: Vec<String> = items.into_iter().filter_map(coerce_to_string).collect();
            Some(parts.join(", "))
        }
        Value::Null | Value::Object(_) => None,
    }
}

/// Per-record validation failure
///
/// Skipped and logged by the pipeline; never aborts the batch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("record {}: missing or invalid field `{field}`", .business_id.as_deref().unwrap_or("<unknown>"))]
    Malformed {
        field: &'static str,
        business_id: Option<String>,
    },
}

/// Validated, immutable business snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRecord {
    pub business_id: String,
    pub name: String,
    pub full_address: String,
    pub categories: String,
    /// Numeric rating used for ranking
    pub stars: f64,
    /// Verbatim rating string from the source, kept for display and indexing
    pub stars_raw: String,
    pub coordinate: Coordinate,
}

impl BusinessRecord {
    fn parse_f64(
        value: Option<&String>,
        field: &'static str,
        business_id: &Option<String>,
    ) -> Result<f64, RecordError> {
        value
            .and_then(|v| v.trim().parse::<f64>().ok())
            // "NaN"/"inf" parse as f64 but have no place in ranking
            .filter(|v| v.is_finite())
            .ok_or_else(|| RecordError::Malformed {
                field,
                business_id: business_id.clone(),
            })
    }
}

impl TryFrom<RawRecord> for BusinessRecord {
    type Error = RecordError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let business_id = raw.business_id.clone().ok_or(RecordError::Malformed {
            field: "business_id",
            business_id: None,
        })?;

        let stars = Self::parse_f64(raw.stars.as_ref(), "stars", &raw.business_id)?;
        let latitude = Self::parse_f64(raw.latitude.as_ref(), "latitude", &raw.business_id)?;
        let longitude = Self::parse_f64(raw.longitude.as_ref(), "longitude", &raw.business_id)?;

        let coordinate = Coordinate::new(latitude, longitude);
        if !coordinate.is_valid() {
            return Err(RecordError::Malformed {
                field: "coordinate",
                business_id: raw.business_id,
            });
        }

        Ok(Self {
            business_id,
            name: raw.name.unwrap_or_default(),
            full_address: raw.full_address.unwrap_or_default(),
            categories: raw.categories.unwrap_or_default(),
            stars,
            stars_raw: raw.stars.unwrap_or_default(),
            coordinate,
        })
    }
}

/// User-side query constraints for one recommendation run
#[derive(Debug, Clone)]
pub struct UserQuery {
    pub origin: Coordinate,
    /// Category filter; `None` means every category passes
    pub category: Option<String>,
    pub max_distance_km: f64,
    pub top_n: usize,
}

/// Result of one recommendation run
#[derive(Debug, Clone)]
pub struct RecommendationResult {
    /// At most `top_n` records, stars descending, unique business ids
    pub records: Vec<BusinessRecord>,
    pub total_candidates: usize,
    pub skipped_malformed: usize,
}

/// Document shape written to the recommendation index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexDocument {
    #[serde(rename = "businessId")]
    pub business_id: String,
    pub name: String,
    pub full_address: String,
    pub categories: String,
    pub stars: String,
    /// Geo-point encoded as "lat,lon"
    pub location: String,
}

impl From<&BusinessRecord> for IndexDocument {
    fn from(record: &BusinessRecord) -> Self {
        Self {
            business_id: record.business_id.clone(),
            name: record.name.clone(),
            full_address: record.full_address.clone(),
            categories: record.categories.clone(),
            stars: record.stars_raw.clone(),
            location: format!(
                "{},{}",
                record.coordinate.latitude, record.coordinate.longitude
            ),
        }
    }
}
