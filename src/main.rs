use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};
use yelp_reco::config::Settings;
use yelp_reco::core::Recommender;
use yelp_reco::pipeline;
use yelp_reco::relay::Relay;
use yelp_reco::services::{ElasticClient, FileLineSource, IndexSink, KafkaPublisher};

/// A collaborator (index, broker, source) was unreachable
const EXIT_COLLABORATOR: i32 = 1;
/// Configuration failed to load or parse
const EXIT_CONFIG: i32 = 2;

#[tokio::main]
async fn main() {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    // One optional positional argument: the category filter
    let category = std::env::args().nth(1).filter(|c| !c.is_empty());
    println!(
        "Category: {}",
        category.as_deref().unwrap_or("No specific category")
    );

    info!("Starting Yelp Reco recommendation run...");

    // Load configuration
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    info!("Configuration loaded successfully");

    // Initialize the Elasticsearch client (bulk source and index sink)
    let elastic = ElasticClient::new(
        settings.elasticsearch.url.clone(),
        settings.elasticsearch.index.clone(),
        settings.elasticsearch.doc_type.clone(),
        settings.elasticsearch.raw_resource.clone(),
    );

    if let Err(e) = elastic.ensure_index().await {
        error!("Index store unavailable: {}", e);
        std::process::exit(EXIT_COLLABORATOR);
    }

    info!("Index {} ready", settings.elasticsearch.index);

    // Spawn the ingestion relay as an independent task; it shares nothing
    // with the pipeline except the external broker and index
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let relay_handle = if settings.relay.enabled {
        let publisher = match KafkaPublisher::new(&settings.kafka.brokers, settings.kafka.topic.clone())
        {
            Ok(publisher) => publisher,
            Err(e) => {
                error!("Broker unavailable: {}", e);
                std::process::exit(EXIT_COLLABORATOR);
            }
        };

        match FileLineSource::open(&settings.relay.source_path).await {
            Ok(source) => {
                let relay = Relay::new(publisher, Duration::from_millis(settings.relay.interval_ms));
                info!(
                    "Relay started: {} -> topic {} every {}ms",
                    settings.relay.source_path, settings.kafka.topic, settings.relay.interval_ms
                );
                Some(tokio::spawn(async move {
                    relay.run(source, shutdown_rx).await
                }))
            }
            Err(e) => {
                // Open failure ends the relay normally, the run continues
                warn!(
                    "Relay source {} not readable, relay disabled: {}",
                    settings.relay.source_path, e
                );
                None
            }
        }
    } else {
        None
    };

    // Run the recommendation pipeline
    let recommender = Recommender::new(settings.query.sort_cap);
    let query = settings.user_query(category);

    match pipeline::run(&elastic, &elastic, &recommender, &query).await {
        Ok(result) => {
            info!(
                "Run complete: {} recommendations from {} candidates",
                result.records.len(),
                result.total_candidates
            );
        }
        Err(e) => {
            error!("Recommendation run failed: {}", e);
            let _ = shutdown_tx.send(true);
            std::process::exit(EXIT_COLLABORATOR);
        }
    }

    // Stop the relay at its next cancellation point and wait for it
    let _ = shutdown_tx.send(true);
    if let Some(handle) = relay_handle {
        match handle.await {
            Ok(published) => info!("Relay finished, {} records published", published),
            Err(e) => error!("Relay task panicked: {}", e),
        }
    }
}
