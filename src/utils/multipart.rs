use actix_multipart::{Field, Multipart};
use futures_util::TryStreamExt;

use crate::errors::AppError;
use crate::utils::validation::UploadForm;

pub const IMAGE_FIELD: &str = "image";

/// The file part of an upload as the client declared it.
#[derive(Debug)]
pub struct ImagePart {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
    /// Total bytes received, even when the payload was dropped for exceeding the cap.
    pub size: usize,
}

#[derive(Debug, Default)]
pub struct UploadSubmission {
    pub form: UploadForm,
    pub image: Option<ImagePart>,
}

fn multipart_error(err: actix_multipart::MultipartError) -> AppError {
    AppError::BadRequest(format!("Invalid multipart body: {}", err))
}

async fn read_text(field: &mut Field) -> Result<String, AppError> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
        buf.extend_from_slice(&chunk);
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

async fn drain(field: &mut Field) -> Result<(), AppError> {
    while field.try_next().await.map_err(multipart_error)?.is_some() {}
    Ok(())
}

/// Buffers at most `max_size` bytes; past that the data is discarded but still counted.
async fn read_image(field: &mut Field, filename: String, max_size: usize) -> Result<ImagePart, AppError> {
    // A part without a Content-Type header declares nothing and fails the type check.
    let content_type = field
        .content_type()
        .map(|mime| mime.to_string())
        .unwrap_or_default();
    let mut data = Vec::new();
    let mut size = 0usize;

    while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
        size = size.saturating_add(chunk.len());
        if size > max_size {
            data = Vec::new();
            continue;
        }
        data.extend_from_slice(&chunk);
    }

    Ok(ImagePart {
        filename,
        content_type,
        data,
        size,
    })
}

pub async fn read_submission(mut payload: Multipart, max_size: usize) -> Result<UploadSubmission, AppError> {
    let mut submission = UploadSubmission::default();

    while let Some(mut field) = payload.try_next().await.map_err(multipart_error)? {
        let disposition = field.content_disposition();
        let field_name = disposition.get_name().unwrap_or_default().to_string();
        let filename = disposition
            .get_filename()
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        match (field_name.as_str(), filename) {
            ("name", None) => submission.form.name = read_text(&mut field).await?,
            ("email", None) => submission.form.email = read_text(&mut field).await?,
            (IMAGE_FIELD, Some(filename)) if submission.image.is_none() => {
                submission.image = Some(read_image(&mut field, filename, max_size).await?);
            }
            _ => drain(&mut field).await?,
        }
    }

    Ok(submission)
}
