use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use keyward::config::Config;
use keyward::handlers;
use keyward::id::generate_admin_token;
use keyward::service::LicenseService;
use keyward::state::AppState;
use keyward::store::FileStore;

#[derive(Parser, Debug)]
#[command(name = "keyward")]
#[command(about = "License-key issuance and verification service")]
struct Cli {
    /// Address to bind (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// License store file (overrides DATA_FILE)
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Print a freshly generated admin token and exit
    #[arg(long)]
    generate_admin_token: bool,
}

fn fail(msg: &str, err: impl std::fmt::Display) -> ! {
    tracing::error!("{}: {}", msg, err);
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.generate_admin_token {
        println!("{}", generate_admin_token());
        return;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "keyward=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env();
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(data_file) = cli.data_file {
        config.data_file = data_file;
    }

    if config.admin_token_is_default {
        tracing::warn!("============================================");
        tracing::warn!("ADMIN_TOKEN is not set; using the built-in development token.");
        tracing::warn!("Set ADMIN_TOKEN before exposing this server.");
        tracing::warn!("Generate one with: keyward --generate-admin-token");
        tracing::warn!("============================================");
    }

    let store = FileStore::new(&config.data_file);
    if let Err(e) = store.ensure_exists() {
        fail(&format!("Failed to initialize {}", config.data_file.display()), e);
    }
    tracing::info!("License store: {}", config.data_file.display());

    let service = LicenseService::new(Arc::new(store), config.admin_token.clone())
        .with_key_format(config.key_format);
    let state = AppState::new(service).with_trust_proxy(config.trust_proxy);

    if config.rate_limit.is_enabled() {
        tracing::info!(
            "Rate limit: {} requests/minute per client",
            config.rate_limit.requests_per_minute
        );
    } else {
        tracing::info!("Rate limiting disabled");
    }

    let app = handlers::router(state, config.rate_limit);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| fail(&format!("Failed to bind to {}", addr), e));

    tracing::info!("License server listening on {}", addr);

    // Connect info supplies the peer address for IP binding and rate limiting
    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    {
        fail("Server error", e);
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}
