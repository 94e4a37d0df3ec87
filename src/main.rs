use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use venue_finder::config::Settings;
use venue_finder::routes::{self, AppState};
use venue_finder::services::{CatalogStore, CsvSource, RefreshLoop};
use venue_finder::{load_initial_catalog, SearchEngine, StartupError};

#[actix_web::main]
async fn main() -> Result<(), StartupError> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Initialize logging; environment wins over the config file
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting venue finder...");

    if settings.source.csv_url.is_empty() {
        error!("No catalog source configured");
        return Err(StartupError::MissingSourceUrl);
    }

    let mut source = CsvSource::new(settings.source.csv_url.clone(), settings.source.request_timeout())
        .map_err(StartupError::InitialLoad)?;

    // Refuse to serve without an initial catalog
    let catalog = load_initial_catalog(&mut source).await.map_err(|e| {
        error!("Failed to load initial catalog from {}: {}", source.url(), e);
        e
    })?;

    info!("Initial catalog loaded with {} venues", catalog.len());

    let (store, writer) = CatalogStore::open(catalog);

    let refresher = RefreshLoop::new(source, writer, settings.source.refresh_interval());
    let refresh_task = tokio::spawn(refresher.run());

    let engine = SearchEngine::new(settings.search.shard_count, settings.search.distance_formula);

    info!(
        "Search engine initialized ({} shards, {:?} distance)",
        engine.shard_count(),
        engine.formula()
    );

    let app_state = AppState::new(store, engine);

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    let served = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await;

    if refresh_task.is_finished() {
        tracing::warn!("Catalog refresh task stopped before shutdown");
    }
    refresh_task.abort();
    info!("Venue finder stopped");

    Ok(served?)
}
