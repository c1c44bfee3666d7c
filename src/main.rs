mod app;
mod config;
mod input;
mod term;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let args = config::Args::parse();
    init_tracing(args.log.as_deref())?;
    let settings = config::resolve(&args);
    tracing::debug!(?settings, "settings resolved");
    app::run(settings)
}

// The terminal belongs to the renderer, so logs go to a file or nowhere.
fn init_tracing(log: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_env("WARPFIELD_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info,warpfield=debug"));
    match log {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("could not create log file {}", path.display()))?;
            fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => fmt().with_env_filter(filter).with_writer(std::io::sink).init(),
    }
    Ok(())
}
