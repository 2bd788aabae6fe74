//! Atomic file publication.
//!
//! Every artifact is staged into a temporary file in its destination directory
//! and renamed into place, so readers never observe a half-written file.
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

pub fn write_atomic_bytes(dest: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    let mut staged = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("stage {}", dest.display()))?;
    staged
        .write_all(bytes)
        .with_context(|| format!("write staged {}", dest.display()))?;
    staged
        .as_file()
        .sync_all()
        .with_context(|| format!("sync staged {}", dest.display()))?;
    staged
        .persist(dest)
        .map_err(|err| err.error)
        .with_context(|| format!("publish {}", dest.display()))?;
    Ok(())
}

pub fn write_atomic_text(dest: &Path, text: &str) -> Result<()> {
    write_atomic_bytes(dest, text.as_bytes())
}

pub fn write_atomic_json<T: serde::Serialize>(dest: &Path, value: &T) -> Result<()> {
    let mut bytes = serde_json::to_vec_pretty(value).context("serialize staged JSON")?;
    bytes.push(b'\n');
    write_atomic_bytes(dest, &bytes)
}
