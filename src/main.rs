mod app;
mod cache;
mod config;
mod event;
mod feed;
mod flickr;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "flickgrid")]
#[command(about = "A terminal UI for browsing and searching Flickr photos")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/flickgrid/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Start with this search query instead of the home feed
  #[arg(short, long)]
  query: Option<String>,
}

/// Log to a file under the data dir; stdout belongs to the TUI.
fn init_logging() -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
  let Some(data_dir) = dirs::data_dir() else {
    return Ok(None);
  };

  let log_dir = data_dir.join("flickgrid");
  std::fs::create_dir_all(&log_dir)?;

  let appender = tracing_appender::rolling::never(log_dir, "flickgrid.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(writer)
    .with_ansi(false)
    .init();

  Ok(Some(guard))
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Keep the guard alive so buffered log lines get flushed on exit
  let _log_guard = init_logging()?;

  // Load configuration
  let config = config::Config::load(args.config.as_deref())?;

  // Initialize and run the app
  let mut app = app::App::new(config, args.query)?;
  app.run().await?;

  Ok(())
}
