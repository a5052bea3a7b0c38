use clap::Parser;
use relay_core::RelayConfig;
use tokio::sync::broadcast;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "relay.toml")]
    config: String,

    /// Print the resolved configuration and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (local development)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Load config
    let config = match RelayConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", args.config, e);
            std::process::exit(1);
        }
    };

    // Init logging: RUST_LOG wins, otherwise service.log_level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.service.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    if args.check {
        println!("listen: {}:{}", config.http.host, config.http.port);
        match config.relay.endpoint() {
            Some(url) => println!("✅ endpoint: {}", url),
            None => {
                println!(
                    "❌ endpoint not configured (set {} or relay.endpoint_url)",
                    relay_core::ENDPOINT_ENV_VAR
                );
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    if config.relay.endpoint().is_none() {
        tracing::warn!(
            "{} not set; assistant messages will be answered with a configuration error",
            relay_core::ENDPOINT_ENV_VAR
        );
    }

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    relay_server::http::start_http_server(config, shutdown_rx).await?;

    Ok(())
}
