//! # Uzduotys API Server
//!
//! A small multi-user to-do application: registration, login, personal
//! task lists, and password reset by email.
//!
//! ## Usage
//!
//! ```bash
//! SECRET_KEY=$(openssl rand -hex 32) cargo run -p uzduotys-api
//! ```

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uzduotys_api::{
    app::{build_router, AppState},
    config::Config,
};
use uzduotys_shared::{
    db::{create_pool, run_migrations},
    mail::{LogMailer, Mailer, SmtpMailer},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "uzduotys_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("uzduotys v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let pool = create_pool(&config.database).await?;
    run_migrations(&pool).await?;

    let mailer: Arc<dyn Mailer> = match &config.smtp {
        Some(smtp) => {
            tracing::info!(host = %smtp.host, "using SMTP mail transport");
            Arc::new(SmtpMailer::new(smtp)?)
        }
        None => {
            tracing::info!("no SMTP_HOST configured, outbound mail will be logged");
            Arc::new(LogMailer)
        }
    };

    let bind_address = config.bind_address();
    let state = AppState::new(pool, config, mailer);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {}", e);
    }
}
