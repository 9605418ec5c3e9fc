use crate::models::{Coordinate, UserQuery};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub elasticsearch: ElasticsearchSettings,
    #[serde(default)]
    pub kafka: KafkaSettings,
    #[serde(default)]
    pub relay: RelaySettings,
    #[serde(default)]
    pub query: QuerySettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElasticsearchSettings {
    #[serde(default = "default_es_url")]
    pub url: String,
    #[serde(default = "default_index")]
    pub index: String,
    #[serde(default = "default_doc_type")]
    pub doc_type: String,
    /// `index/doc_type` path of the raw data scanned by the pipeline
    #[serde(default = "default_raw_resource")]
    pub raw_resource: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KafkaSettings {
    #[serde(default = "default_brokers")]
    pub brokers: String,
    #[serde(default = "default_topic")]
    pub topic: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelaySettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_source_path")]
    pub source_path: String,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuerySettings {
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default = "default_max_distance_km")]
    pub max_distance_km: f64,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Ranked-prefix cap applied before dedup selection
    #[serde(default = "default_sort_cap")]
    pub sort_cap: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_es_url() -> String { "http://localhost:9200".to_string() }
fn default_index() -> String { "yelpreco".to_string() }
fn default_doc_type() -> String { "restaurant".to_string() }
fn default_raw_resource() -> String { "yelpraw/restaurant".to_string() }
fn default_brokers() -> String { "localhost:9092".to_string() }
fn default_topic() -> String { "yelp-stream".to_string() }
fn default_true() -> bool { true }
fn default_source_path() -> String { "VegasRestaurantData.json".to_string() }
fn default_interval_ms() -> u64 { 1000 }
fn default_latitude() -> f64 { 36.1027496 }
fn default_longitude() -> f64 { -115.1686673 }
fn default_max_distance_km() -> f64 { 5.0 }
fn default_top_n() -> usize { 5 }
fn default_sort_cap() -> usize { 150 }
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Default for ElasticsearchSettings {
    fn default() -> Self {
        Self {
            url: default_es_url(),
            index: default_index(),
            doc_type: default_doc_type(),
            raw_resource: default_raw_resource(),
        }
    }
}

impl Default for KafkaSettings {
    fn default() -> Self {
        Self {
            brokers: default_brokers(),
            topic: default_topic(),
        }
    }
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            source_path: default_source_path(),
            interval_ms: default_interval_ms(),
        }
    }
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            latitude: default_latitude(),
            longitude: default_longitude(),
            max_distance_km: default_max_distance_km(),
            top_n: default_top_n(),
            sort_cap: default_sort_cap(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Settings {
    /// Load configuration from files and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with RECO__, e.g.
    ///    RECO__KAFKA__BROKERS -> kafka.brokers)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("RECO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("RECO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Build the run's query from configured origin/limits plus the CLI
    /// category filter
    pub fn user_query(&self, category: Option<String>) -> UserQuery {
        UserQuery {
            origin: Coordinate::new(self.query.latitude, self.query.longitude),
            category,
            max_distance_km: self.query.max_distance_km,
            top_n: self.query.top_n,
        }
    }
}
