//! Agora server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, starts the periodic status sweeper, and serves
//! the JSON API over HTTP.

use std::{path::PathBuf, time::Duration};

use agora_api::{AppState, ServerConfig};
use agora_core::store::DebateStore as _;
use agora_store_sqlite::SqliteStore;
use anyhow::Context as _;
use chrono::Utc;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Agora debate server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("AGORA"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Open SQLite store.
  let store = SqliteStore::open(&server_cfg.db_path)
    .await
    .with_context(|| {
      format!("failed to open store at {:?}", server_cfg.db_path)
    })?;

  let state = AppState::new(
    store,
    Duration::from_secs(server_cfg.category_ttl_secs),
  );

  // Background sweeper: moves debates across window edges that elapsed
  // since the last tick, paying finish rewards as a side effect.
  let sweep_store = state.store.clone();
  let sweep_every = Duration::from_secs(server_cfg.sweep_interval_secs.max(1));
  tokio::spawn(async move {
    let mut ticker = tokio::time::interval(sweep_every);
    loop {
      ticker.tick().await;
      match sweep_store.sweep_statuses(Utc::now()).await {
        Ok(0) => {}
        Ok(n) => tracing::info!(transitions = n, "status sweep applied transitions"),
        Err(e) => tracing::warn!(error = %e, "status sweep failed"),
      }
    }
  });

  let app = agora_api::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
