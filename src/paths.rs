use std::path::PathBuf;

use anyhow::{Context, Result};

pub fn database_file_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("marathon.db"))
}

pub fn ranking_file_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("ranking.csv"))
}

fn data_dir() -> Result<PathBuf> {
    let base = dirs::data_dir().context("unable to resolve data directory")?;
    Ok(base.join("marathon"))
}
