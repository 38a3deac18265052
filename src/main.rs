use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use baraka_finder::config::{MailTransport, Settings, StorageBackend};
use baraka_finder::core::{InsightGenerator, Matcher};
use baraka_finder::routes::{self, AppState};
use baraka_finder::services::{
    default_catalog, CatalogCache, LogMailer, MatchingService, MemoryStore, PostgresClient, ResultsMailer,
    ResultsStore, SmtpMailer,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing(default_level: &str, default_format: &str) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| default_level.to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| default_format.to_string());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

fn startup_error(context: &str, e: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, e);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, e))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Logging settings come from the environment until the config is loaded
    init_tracing("info", "json");

    info!("Starting Business Baraka Finder...");

    let settings = Settings::load().map_err(|e| startup_error("Configuration error", e))?;

    info!("Configuration loaded successfully (log level {})", settings.logging.level);

    let store: Arc<dyn ResultsStore> = match settings.storage.backend {
        StorageBackend::Postgres => {
            let db_max_conn = settings.database.max_connections.unwrap_or(10);
            let client = PostgresClient::from_settings(
                &settings.database.url,
                Some(db_max_conn),
                settings.database.min_connections,
                settings.database.acquire_timeout_secs,
                settings.database.idle_timeout_secs,
            )
            .await
            .map_err(|e| startup_error("PostgreSQL connection error", e))?;

            info!("PostgreSQL client initialized (max: {} connections)", db_max_conn);
            Arc::new(client)
        }
        StorageBackend::Memory => {
            info!("Using in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let weights = settings.scoring_weights();
    let matcher = Matcher::new(weights);

    info!("Matcher initialized with weights: {:?}", weights);

    let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
    let service = Arc::new(MatchingService::new(
        store,
        CatalogCache::new(cache_ttl),
        matcher,
        InsightGenerator::from_seed(settings.insights.seed),
    ));

    if settings.catalog.seed_on_startup {
        let inserted = service
            .seed_catalog(&default_catalog())
            .await
            .map_err(|e| startup_error("Catalog seeding failed", e))?;
        info!("Seeded {} support resources", inserted);
    }

    let mailer: Arc<dyn ResultsMailer> = match settings.mail.transport {
        MailTransport::Smtp => {
            let smtp = SmtpMailer::new(&settings.mail.smtp_options())
                .map_err(|e| startup_error("SMTP configuration error", e))?;
            info!("SMTP mailer configured for {}:{}", settings.mail.host, settings.mail.port);
            Arc::new(smtp)
        }
        MailTransport::Log => {
            info!("Email delivery disabled, results emails are only logged");
            Arc::new(LogMailer)
        }
    };

    let app_state = AppState { service, mailer };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(routes::json_config())
            .app_data(routes::query_config())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
