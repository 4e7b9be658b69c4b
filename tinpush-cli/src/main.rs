// tinpush: announce a directory of package files over USB and serve the
// installer's range requests until it exits.

mod config;
mod scan;
mod usb;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tinpush_core::{session, Manifest};
use tracing::{error, info};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run() {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut positional = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--version" || arg == "-V" {
            println!("tinpush {}", VERSION);
            return Ok(());
        }
        positional.push(arg);
    }
    let dir = match positional.as_slice() {
        [dir] => PathBuf::from(dir),
        [] => bail!("usage: tinpush <package-directory>"),
        args => bail!("expected one directory argument, got {}", args.len()),
    };
    let meta = std::fs::metadata(&dir)
        .with_context(|| format!("directory does not exist: {}", dir.display()))?;
    if !meta.is_dir() {
        bail!("not a directory: {}", dir.display());
    }

    let cfg = config::load();
    let files = scan::package_files(&dir, &cfg.extension)?;
    let manifest = Manifest::build(files).context("building file list")?;
    info!(files = manifest.paths().len(), "found package files");

    let mut transport = usb::open(cfg.vendor_id, cfg.product_id)?;
    session::announce(&mut transport, &manifest)?;
    session::run_session(&mut transport)?;
    info!("transfer finished");
    Ok(())
}
