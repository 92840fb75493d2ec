//! `vibe-serve`: HTTP server scoring terms against memoized anchor embeddings.
//!
//! Config: process env > `.env` > `~/.config/vibe/config.toml` (see the `config` crate).

use std::sync::Arc;

use clap::Parser;
use config::ServeSettings;
use serve::AppState;
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(name = "vibe-serve")]
#[command(about = "Vibe HTTP server")]
struct Args {
    /// Listen address (default: VIBE_ADDR or 127.0.0.1:8787)
    #[arg(long, value_name = "ADDR")]
    addr: Option<String>,

    /// Compute anchor embeddings before accepting requests. On failure the server still
    /// starts and the first request retries.
    #[arg(long)]
    warm: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    let applied = config::load_and_apply("vibe", None)?;
    let _tracing = config::init_tracing("info")?;
    debug!(?applied, "config keys applied from .env / xdg");

    let settings = ServeSettings::from_env();
    let index = Arc::new(serve::build_index(&settings));

    if args.warm {
        match index.embeddings().await {
            Ok(anchors) => info!(
                count = anchors.len(),
                dimension = anchors.dimension(),
                "anchor embeddings warmed"
            ),
            Err(e) => warn!(error = %e, "anchor warm-up failed, first request will retry"),
        }
    }

    let addr = args.addr.unwrap_or(settings.addr);
    serve::run_serve(&addr, Arc::new(AppState::new(index))).await
}
