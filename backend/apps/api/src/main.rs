//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request-level errors are rendered by
//! the `star` crate as problem documents.

use axum::{Router, ServiceExt, extract::Request, middleware};
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use star::{InMemoryDelegationRepository, PgDelegationRepository, StarConfig};
use std::time::Duration;
use tokio::net::TcpListener;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// STAR delegation server
#[derive(Debug, Parser)]
#[command(name = "api", about = "STAR delegation server", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "STAR_LISTEN", default_value = "localhost:3000")]
    listen: String,

    /// Scheme and authority used to build `Location` headers
    #[arg(long, env = "STAR_VIRTUAL_HOST", default_value = "http://localhost:3000")]
    virtual_host: String,

    /// Ceiling for the delegation duration, in seconds
    #[arg(long, env = "STAR_MAX_DURATION_SECS", default_value_t = 31_536_000)]
    max_duration_secs: u64,

    /// Ceiling for the certificate lifetime, in seconds
    #[arg(long, env = "STAR_MAX_CERT_LIFETIME_SECS", default_value_t = 604_800)]
    max_cert_lifetime_secs: u64,

    /// PostgreSQL connection string; without it delegations live in memory
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Connection pool size
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 5)]
    max_connections: u32,
}

impl Args {
    fn star_config(&self) -> StarConfig {
        StarConfig {
            max_duration: Duration::from_secs(self.max_duration_secs),
            max_cert_lifetime: Duration::from_secs(self.max_cert_lifetime_secs),
            virtual_host: self.virtual_host.clone(),
            ..StarConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,star=info,platform=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // STAR configuration
    let star_config = args.star_config();
    let bounds = star_config.bounds()?;
    let delegation_path = star_config.collection_route()?;
    tracing::info!(
        max_duration_secs = bounds.max_duration_secs(),
        max_cert_lifetime_secs = bounds.max_cert_lifetime_secs(),
        virtual_host = %star_config.virtual_host,
        delegation_path = %delegation_path,
        "Delegation service configured"
    );

    let star = match &args.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(args.max_connections)
                .connect(database_url)
                .await?;

            tracing::info!("Connected to database");

            // Run migrations
            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            star::star_router(PgDelegationRepository::new(pool), star_config)?
        }
        None => {
            tracing::warn!("DATABASE_URL not set, delegations are kept in memory only");
            star::star_router_generic(InMemoryDelegationRepository::new(), star_config)?
        }
    };

    // Build router
    let router = Router::new()
        .merge(star)
        .layer(middleware::from_fn(platform::access_log::access_log))
        .layer(TraceLayer::new_for_http());
    let app = NormalizePathLayer::trim_trailing_slash().layer(router);

    // Start server
    let listener = TcpListener::bind(&args.listen).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install SIGINT handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!(signal = "SIGINT", "Shutting down"),
        _ = terminate => tracing::info!(signal = "SIGTERM", "Shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["api"]).unwrap();
        assert_eq!(args.listen, "localhost:3000");
        assert_eq!(args.max_connections, 5);

        let config = args.star_config();
        assert_eq!(config.max_duration, Duration::from_secs(31_536_000));
        assert_eq!(config.max_cert_lifetime, Duration::from_secs(604_800));
        assert_eq!(config.delegation_path, "/star/delegation");
    }

    #[test]
    fn test_args_overrides() {
        let args = Args::try_parse_from([
            "api",
            "--listen",
            "0.0.0.0:8080",
            "--virtual-host",
            "https://star.example",
            "--max-duration-secs",
            "86400",
            "--max-cert-lifetime-secs",
            "3600",
        ])
        .unwrap();
        assert_eq!(args.listen, "0.0.0.0:8080");

        let config = args.star_config();
        assert_eq!(config.virtual_host, "https://star.example");
        assert_eq!(config.bounds().unwrap().max_duration_secs(), 86_400);
        assert_eq!(config.bounds().unwrap().max_cert_lifetime_secs(), 3_600);
    }

    #[test]
    fn test_zero_ceiling_rejected() {
        let args = Args::try_parse_from(["api", "--max-cert-lifetime-secs", "0"]).unwrap();
        assert!(args.star_config().bounds().is_err());
    }
}
