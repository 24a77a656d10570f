use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{info, warn};
use tokio::fs;
use uuid::Uuid;

use crate::errors::AppError;
use crate::utils::multipart::ImagePart;
use crate::utils::validation::{normalize_mime_type, original_extension, validate_image};

pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;
pub const UPLOADS_PREFIX: &str = "/uploads";

/// Local directory that accepted images are written to and served from.
#[derive(Debug, Clone)]
pub struct UploadStorage {
    dir: PathBuf,
    max_file_size: usize,
}

impl UploadStorage {
    /// Creates the directory (and parents) if needed.
    pub async fn init(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let storage = UploadStorage {
            dir: dir.into(),
            max_file_size: MAX_FILE_SIZE,
        };
        storage.ensure_dir().await?;
        Ok(storage)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    pub async fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir).await
    }

    /// Validates `image` and writes it under a `<millis><ext>` name, returning that name.
    ///
    /// Names are not unique within a millisecond; a later write replaces an earlier one.
    pub async fn accept(&self, image: &ImagePart) -> Result<String, AppError> {
        validate_image(&image.filename, &image.content_type, image.size, self.max_file_size)?;

        if let Some(detected) = detected_mismatch(&image.content_type, &image.data) {
            warn!(
                "Declared type {} for {} does not match detected {}",
                image.content_type, image.filename, detected
            );
        }

        // validate_image already rejected names without an extension
        let extension = original_extension(&image.filename).unwrap_or_default();
        let filename = format!("{}{}", Utc::now().timestamp_millis(), extension);

        self.write(&filename, &image.data)
            .await
            .map_err(|err| AppError::StorageError(err.to_string()))?;

        info!("Stored {} ({} bytes) as {}", image.filename, image.data.len(), filename);
        Ok(filename)
    }

    /// Writes through a per-call temporary sibling, so the final name only ever holds
    /// one complete file even when two writes race for it.
    async fn write(&self, filename: &str, data: &[u8]) -> io::Result<()> {
        self.ensure_dir().await?;

        let target = self.dir.join(filename);
        let partial = self.dir.join(format!(".{}.{}.part", filename, Uuid::new_v4()));

        if let Err(err) = fs::write(&partial, data).await {
            let _ = fs::remove_file(&partial).await;
            return Err(err);
        }
        if let Err(err) = fs::rename(&partial, &target).await {
            let _ = fs::remove_file(&partial).await;
            return Err(err);
        }
        Ok(())
    }
}

/// Sniffed type of `data` when it disagrees with the declared one.
fn detected_mismatch(declared: &str, data: &[u8]) -> Option<&'static str> {
    let kind = infer::get(data)?;
    if kind.mime_type() == normalize_mime_type(declared) {
        None
    } else {
        Some(kind.mime_type())
    }
}
