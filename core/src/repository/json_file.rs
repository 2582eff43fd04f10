use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Creates `dir/name` holding `initial` when it does not exist yet.
pub fn ensure_file<T: Serialize>(dir: &Path, name: &str, initial: &T) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Could not create data directory {}", dir.display()))?;
    let path = dir.join(name);
    if !path.exists() {
        write_json(&path, initial)?;
    }
    Ok(path)
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("Could not open {}", path.display()))?;
    let reader = BufReader::new(file);
    let value = serde_json::from_reader(reader)
        .with_context(|| format!("Malformed data in {}", path.display()))?;
    Ok(value)
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Could not write {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}
