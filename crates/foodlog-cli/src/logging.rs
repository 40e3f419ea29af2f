// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use std::fs::{self, File, OpenOptions};
use std::path::Path;

/// Sends `log` records to `path`; the terminal belongs to the UI.
/// `RUST_LOG` wins over `level` when set.
pub fn init(level: &str, path: &Path) -> Result<()> {
    let file = open_log_file(path)?;
    builder(level, file)
        .try_init()
        .context("install logger")?;
    log::info!("logging to {} at {level}", path.display());
    Ok(())
}

fn builder(level: &str, file: File) -> Builder {
    let mut builder = Builder::from_env(Env::default().default_filter_or(level));
    builder
        .format_timestamp_millis()
        .target(Target::Pipe(Box::new(file)));
    builder
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}; set [log].file to a writable path", path.display()))
}
