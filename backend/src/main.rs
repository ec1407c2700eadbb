use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use lifeline_backend::config::AppConfig;
use lifeline_backend::{create_router, initialize_backend};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Emergency response coordination server
#[derive(Parser, Debug)]
#[command(name = "lifeline-server", version, about)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "LIFELINE_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on, overrides `server.bind_addr`
    #[arg(long, env = "LIFELINE_BIND")]
    bind: Option<String>,

    /// SQLite database URL, overrides `storage.database_url`
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// SMTP password, overrides `email.password`
    #[arg(long, env = "LIFELINE_SMTP_PASSWORD", hide_env_values = true)]
    smtp_password: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = AppConfig::load_or_default(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.server.bind_addr = bind;
    }
    if let Some(database_url) = args.database_url {
        config.storage.database_url = database_url;
    }
    if let Some(password) = args.smtp_password {
        config.email.password = password;
    }
    config.validate()?;

    let app_state = initialize_backend(&config).await?;
    let app = create_router(app_state, &config.server.cors_origin)?;

    info!("Starting server on {}", config.server.bind_addr);
    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
