use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

mod config;
mod context;
mod http;

use config::Settings;
use context::ServerContext;

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("pagesmith=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(sub).expect("Failed to set global subscriber");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let settings = Settings::from_env()?;
    info!(
        "{} v{} starting on {}",
        settings.app_name, settings.app_version, settings.bind_addr
    );

    let ctx = Arc::new(ServerContext::new(settings).await?);
    let bind_addr = ctx.settings.bind_addr.clone();
    let app = http::router(ctx);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HTTP server listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped. Goodbye!");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {:?}", e);
        return;
    }
    info!("Ctrl-C detected; shutting down...");
}
