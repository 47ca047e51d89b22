mod routes;

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use farm_core::io::seed::Seed;
use farm_core::settings::{
    FileSettingsStorage, MemorySettingsStorage, SettingsManager, SettingsStorage,
};
use farm_core::store::MemoryStore;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::routes::{router, AppState};

#[derive(Parser, Debug)]
#[command(name = "farmd", about = "Run submission and leaderboard service for farm seeds")]
struct Args {
    /// Directory of seed JSON documents served by code.
    #[arg(long = "seeds-dir", value_name = "DIR")]
    seeds_dir: PathBuf,

    /// Directory for persisted player settings. Settings live in memory when omitted.
    #[arg(long = "settings-dir", value_name = "DIR")]
    settings_dir: Option<PathBuf>,

    /// Address to bind (defaults to 127.0.0.1).
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8787)]
    port: u16,
}

/// Load and validate every `*.json` seed in `dir`, in file-name order.
fn load_seeds_dir(dir: &Path) -> Result<Vec<Seed>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("failed to read seeds directory {:?}", dir))?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("failed to list seeds directory {:?}", dir))?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    paths
        .iter()
        .map(|path| {
            let seed = Seed::load_from_path(path)
                .with_context(|| format!("failed to load seed from {:?}", path))?;
            seed.validate()
                .with_context(|| format!("seed {:?} rejected", path))?;
            Ok(seed)
        })
        .collect()
}

fn settings_storage(dir: Option<&Path>) -> Box<dyn SettingsStorage + Send> {
    match dir {
        Some(dir) => Box::new(FileSettingsStorage::new(dir)),
        None => Box::new(MemorySettingsStorage::default()),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(?err, "failed to listen for ctrl-c");
    }
    info!("shutting down farmd");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let args = Args::parse();

    let seeds = load_seeds_dir(&args.seeds_dir)?;
    if seeds.is_empty() {
        anyhow::bail!("no seed documents found in {:?}", args.seeds_dir);
    }
    info!(count = seeds.len(), "seeds loaded");
    let store = MemoryStore::with_seeds(seeds);

    let mut settings = SettingsManager::new(settings_storage(args.settings_dir.as_deref()));
    settings.load();

    let app = router(AppState::new(store, settings));

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", args.bind, args.port))?;

    info!(%addr, "starting farmd");
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}
