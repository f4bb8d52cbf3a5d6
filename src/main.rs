use anyhow::Context;
use expense_manager::{
    api::routes::build_app,
    cli::{config_summary, Cli, Commands},
    AppConfig, AppState, TursoClient,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("invalid configuration ({})", cli.config.display()))?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level(&config))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if !cli.config.exists() {
        info!("No configuration file at {:?}, using defaults", cli.config);
    }

    if let Some(Commands::CheckConfig) = cli.command {
        println!("{}", config_summary(&config));
        println!("configuration OK");
        return Ok(());
    }

    let jwt_secret = config.jwt_secret()?;
    let store = Arc::new(
        TursoClient::new_local(&config.database.url)
            .await
            .context("failed to open the user database")?,
    );

    let addr = config.bind_address();
    let state = AppState::new(config, &jwt_secret, store)?;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Expense manager listening on {}", addr);

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
    info!("Shutdown signal received, closing server");
}
