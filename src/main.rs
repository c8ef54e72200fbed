mod app;
mod cache;
mod collection;
mod config;
mod debounce;
mod error;
mod event;
mod logging;
mod mutation;
mod notehub;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "notehub")]
#[command(about = "A terminal client for NoteHub notes")]
#[command(version)]
struct Args {
  /// Path to config file (default: ./notehub.yaml or $XDG_CONFIG_HOME/notehub/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// NoteHub API base URL
  #[arg(long)]
  api_url: Option<String>,

  /// Notes per page
  #[arg(long)]
  per_page: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let mut config = config::Config::load(args.config.as_deref())?;

  // Command line overrides
  if let Some(api_url) = args.api_url {
    config.api_url = api_url;
  }
  if let Some(per_page) = args.per_page {
    config.per_page = per_page.max(1);
  }

  let _guard = logging::init()?;
  info!(api_url = %config.api_url, per_page = config.per_page, "Starting notehub");

  // Initialize and run the app
  let mut app = app::App::new(&config)?;
  app.run().await?;

  info!("Exiting");
  Ok(())
}
