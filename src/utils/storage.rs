use crate::errors::UploadError;
use actix_multipart::Field;
use actix_web::web;
use futures::TryStreamExt;
use log::{debug, warn};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Final name of a stored image: `<epoch millis>--<original name>`.
/// Path separators and reserved characters are stripped from the original name.
pub fn stored_file_name(timestamp_millis: i64, original_name: &str) -> String {
    format!(
        "{}--{}",
        timestamp_millis,
        sanitize_filename::sanitize(original_name)
    )
}

/// Stream one multipart field into `images_dir`.
///
/// Bytes land in a temporary `.part` file first, which is renamed to its
/// final name once the field has been read completely. The temporary file is
/// deleted when dropped, so a field growing past `max_file_size` or a request
/// cancelled mid-stream leaves nothing behind.
pub async fn save_file(
    field: &mut Field,
    original_name: &str,
    images_dir: &Path,
    max_file_size: usize,
) -> Result<PathBuf, UploadError> {
    let final_path = images_dir.join(stored_file_name(
        chrono::Utc::now().timestamp_millis(),
        original_name,
    ));

    let temp_file = {
        let images_dir = images_dir.to_path_buf();
        web::block(move || {
            tempfile::Builder::new()
                .prefix(".")
                .suffix(".part")
                .tempfile_in(images_dir)
        })
        .await??
    };

    let (temp_file, written) = write_chunks(field, temp_file, max_file_size).await?;

    let persisted = {
        let final_path = final_path.clone();
        web::block(move || temp_file.persist(final_path)).await?
    };
    persisted.map_err(|e| e.error)?;

    debug!("Stored {} bytes at {}", written, final_path.display());
    Ok(final_path)
}

async fn write_chunks(
    field: &mut Field,
    mut file: NamedTempFile,
    max_file_size: usize,
) -> Result<(NamedTempFile, usize), UploadError> {
    let mut written: usize = 0;
    while let Some(bytes) = field.try_next().await? {
        written += bytes.len();
        if written > max_file_size {
            return Err(UploadError::FileTooLarge);
        }
        // fs operations are blocking, we have to execute writes
        // on threadpool
        file = web::block(move || file.write_all(&bytes).map(|_| file)).await??;
    }
    Ok((file, written))
}

fn remove_quietly(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Could not remove {}: {}", path.display(), e);
        }
    }
}

/// Files stored while handling one request.
///
/// Unless the batch is committed, dropping it removes every file again, so
/// an aborted request leaves nothing behind.
#[derive(Debug, Default)]
pub struct StoredBatch {
    paths: Vec<PathBuf>,
}

impl StoredBatch {
    pub fn new() -> Self {
        StoredBatch::default()
    }

    pub fn push(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Keep the files on disk. Returns how many were stored.
    pub fn commit(mut self) -> usize {
        let count = self.paths.len();
        self.paths.clear();
        count
    }
}

impl Drop for StoredBatch {
    fn drop(&mut self) {
        for path in self.paths.drain(..) {
            debug!("Discarding {}", path.display());
            remove_quietly(&path);
        }
    }
}
