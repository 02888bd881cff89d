use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

mod routes;
mod tasks;

use linkrot_core::cache::StatusCache;
use routes::AppState;
use tasks::TaskStore;

/// Linkrot analysis server — link status checks and task results over HTTP.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 5000)]
    port: u16,

    /// Per-URL check timeout in seconds
    #[arg(long, default_value_t = 20)]
    check_timeout: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();
    let args = Args::parse();

    let state = AppState {
        client: reqwest::Client::new(),
        store: Arc::new(TaskStore::default()),
        cache: Arc::new(StatusCache::default()),
        check_timeout: Duration::from_secs(args.check_timeout),
    };
    let app = routes::router(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    log::info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    log::info!("shutting down");
}

fn init_logging() {
    use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

    let _ = TermLogger::init(
        log::LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );
}
