use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::config::Config;

/// Log file inside the config directory. The TUI owns the terminal, so logs never go to stderr.
pub fn log_path() -> Result<PathBuf> {
    Ok(Config::config_dir()?.join("codemaster.log"))
}

fn open_log(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

pub fn init(level: Level) -> Result<PathBuf> {
    let path = log_path()?;
    let file = open_log(&path)?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(path)
}
