//! TechPack Server
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use techpack_auth::jwt::decoder::JwtDecoder;
use techpack_core::config::AppConfig;
use techpack_core::error::AppError;
use techpack_database::repositories::design::{DesignStore, PgDesignStore};
use techpack_database::repositories::grant::{GrantStore, PgGrantStore};
use techpack_service::design::DesignService;
use techpack_service::share::{AccessService, ShareService, TokenGenerator};
use techpack_service::techpack::{HttpImageFetcher, ImageFetcher, TechPackService};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from files and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("TECHPACK_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting TechPack v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    tracing::info!("Connecting to database...");
    let db_pool = techpack_database::connection::create_pool(&config.database).await?;

    tracing::info!("Running database migrations...");
    techpack_database::migration::run_migrations(&db_pool).await?;
    tracing::info!("Database migrations complete");

    // ── Step 2: Stores ───────────────────────────────────────────
    let grant_store: Arc<dyn GrantStore> = Arc::new(PgGrantStore::new(db_pool.clone()));
    let design_store: Arc<dyn DesignStore> = Arc::new(PgDesignStore::new(db_pool.clone()));

    // ── Step 3: Auth ─────────────────────────────────────────────
    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

    // ── Step 4: Services ─────────────────────────────────────────
    tracing::info!("Initializing services...");
    let token_generator = Arc::new(TokenGenerator::new());
    let design_service = Arc::new(DesignService::new(Arc::clone(&design_store)));
    let share_service = Arc::new(ShareService::new(
        Arc::clone(&grant_store),
        Arc::clone(&design_store),
        Arc::clone(&token_generator),
        config.share.clone(),
    ));
    let access_service = Arc::new(AccessService::new(
        Arc::clone(&grant_store),
        Arc::clone(&design_store),
    ));
    let image_fetcher: Arc<dyn ImageFetcher> = Arc::new(HttpImageFetcher::new(&config.render)?);
    let techpack_service = Arc::new(TechPackService::new(image_fetcher));
    tracing::info!("Services initialized");

    // ── Step 5: Build and start HTTP server ──────────────────────
    tracing::info!(
        "Starting HTTP server on {}:{}...",
        config.server.host,
        config.server.port
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app_state = techpack_api::state::AppState {
        config: Arc::new(config),
        jwt_decoder,
        grant_store,
        design_service,
        share_service,
        access_service,
        techpack_service,
    };
    let app = techpack_api::build_app(app_state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("TechPack server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    tracing::info!("TechPack server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
