use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use triage_core::{
    load_config, validate_config, Doctor, DoctorStore, PatientStore, SqliteDoctorStore,
    SqlitePatientStore,
};
use triage_server::{api::create_router, state::AppState};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    let json = std::env::var("TRIAGE_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn run() -> Result<()> {
    init_tracing();

    // Determine config path
    let config_path = std::env::var("TRIAGE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Database path: {:?}", config.database.path);

    // Create SQLite doctor store
    let doctor_store: Arc<dyn DoctorStore> = Arc::new(
        SqliteDoctorStore::new(&config.database.path).context("Failed to create doctor store")?,
    );
    info!("Doctor store initialized");

    // Create SQLite patient store
    let patient_store: Arc<dyn PatientStore> = Arc::new(
        SqlitePatientStore::new(&config.database.path)
            .context("Failed to create patient store")?,
    );
    info!("Patient store initialized");

    // Seed the roster
    if config.roster.seed_on_startup {
        let seed: Vec<Doctor> = config.roster.seed.iter().map(Doctor::from).collect();
        let inserted = doctor_store
            .seed(&seed)
            .context("Failed to seed doctor roster")?;
        info!(inserted, configured = seed.len(), "Doctor roster seeded");
    } else {
        info!("Roster seeding disabled in config");
    }

    info!(
        validate_inputs = config.dispatch.validate_inputs,
        "Dispatcher configured"
    );

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), doctor_store, patient_store));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
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
