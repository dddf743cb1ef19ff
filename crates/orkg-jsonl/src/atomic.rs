//! Crash-safe JSONL file replacement.
//!
//! Data is written to `<file>.<ext>.tmp` in the target directory, flushed, and
//! renamed over the target. Renames within one filesystem are atomic on POSIX,
//! so readers see either the previous snapshot or the new one.

use crate::{JsonlWriter, Result};
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs::File;

/// Atomically replaces the file at `path` with `values`, one per line.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be written or renamed. The
/// original file is left untouched in that case.
pub async fn write_jsonl_atomic<T, P>(path: P, values: &[T]) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    write_jsonl_atomic_iter(path, values.iter()).await
}

/// Like [`write_jsonl_atomic`], for any iterator of serializable values.
///
/// # Errors
///
/// See [`write_jsonl_atomic`].
pub async fn write_jsonl_atomic_iter<T, I, P>(path: P, values: I) -> Result<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let temp_path = temp_path_for(path);

    match write_temp(&temp_path, values).await {
        Ok(count) => {
            tokio::fs::rename(&temp_path, path).await?;
            tracing::debug!(path = %path.display(), records = count, "Wrote JSONL snapshot");
            Ok(())
        }
        Err(e) => {
            let _ = tokio::fs::remove_file(&temp_path).await;
            Err(e)
        }
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let extension = match path.extension() {
        Some(ext) => {
            let mut ext = ext.to_os_string();
            ext.push(".tmp");
            ext
        }
        None => OsString::from("tmp"),
    };
    path.with_extension(extension)
}

async fn write_temp<T, I>(temp_path: &Path, values: I) -> Result<usize>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let file = File::create(temp_path).await?;
    let mut writer = JsonlWriter::new(file);
    writer.write_all(values).await?;
    writer.flush().await?;
    let count = writer.written();
    writer.into_inner().sync_all().await?;
    Ok(count)
}
