//! Holoview License Activation Service
//!
//! Serves license lookups and applies purchase-completion events to the
//! ledger. The ledger is mirrored to a CSV file in a GitHub repository;
//! without a token it falls back to a local directory, which is the mode
//! used for development.
//!
//! Usage:
//!   holoview-server --owner holoview --repo licenses --github-token <token>

use anyhow::Result;
use clap::Parser;
use holoview_ledger::LedgerStore;
use holoview_remote::{FileStore, GitHubConfig, GitHubStore, RemoteLocator, RemoteStore};
use holoview_server::build_router;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "holoview-server")]
#[command(about = "Holoview license activation service")]
struct Args {
    /// Owner of the repository holding the ledger object
    #[arg(long, default_value = "holoview")]
    owner: String,

    /// Repository holding the ledger object
    #[arg(long, default_value = "licenses")]
    repo: String,

    /// Path of the ledger object within the repository
    #[arg(long, default_value = "licenses.csv")]
    path: String,

    /// Branch the ledger object lives on
    #[arg(long, default_value = "main")]
    branch: String,

    /// GitHub token; falls back to $HOLOVIEW_GITHUB_TOKEN, then local mode
    #[arg(long)]
    github_token: Option<String>,

    /// Root directory for the local store used when no token is configured
    #[arg(long, default_value = "ledger-data")]
    local_root: PathBuf,

    /// HTTP port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    info!("Holoview license service starting...");

    let token = args
        .github_token
        .or_else(|| std::env::var("HOLOVIEW_GITHUB_TOKEN").ok());

    let remote: Arc<dyn RemoteStore> = match token {
        Some(token) => Arc::new(GitHubStore::new(GitHubConfig {
            token,
            ..Default::default()
        })),
        None => {
            info!(
                "No GitHub token configured, mirroring ledger to {:?}",
                args.local_root
            );
            Arc::new(FileStore::new(args.local_root))
        }
    };

    let locator = RemoteLocator::new(args.owner, args.repo, args.path, args.branch);
    info!("Ledger object: {} (via {})", locator, remote.provider_name());

    let store = Arc::new(LedgerStore::new(remote, locator));
    store.load().await;
    info!("Ledger ready with {} records", store.record_count().await);

    let app = build_router(store);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", args.port)).await?;
    info!("Listening on port {}", args.port);
    axum::serve(listener, app).await?;

    Ok(())
}
