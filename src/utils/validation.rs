use std::path::Path;

use validator::Validate;

use crate::errors::AppError;

pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];
pub const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png"];

#[derive(Debug, Default, Validate)]
pub struct UploadForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub email: String,
}

pub fn validate_form(form: &UploadForm) -> Result<(), AppError> {
    form.validate().map_err(|_| AppError::MissingFields)
}

/// Returns the extension of `filename` including the leading dot, case preserved.
pub fn original_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{}", ext))
}

pub fn is_allowed_extension(filename: &str) -> bool {
    original_extension(filename)
        .map(|ext| {
            let ext = ext.trim_start_matches('.').to_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Lowercased type without parameters such as `; charset=...`, with `image/jpg` folded into `image/jpeg`.
pub fn normalize_mime_type(content_type: &str) -> String {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    if essence == "image/jpg" {
        "image/jpeg".to_string()
    } else {
        essence
    }
}

pub fn is_allowed_mime_type(content_type: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&normalize_mime_type(content_type).as_str())
}

/// Checks extension, then declared type, then size. The declared type is taken on trust.
pub fn validate_image(
    filename: &str,
    content_type: &str,
    size: usize,
    max_size: usize,
) -> Result<(), AppError> {
    if !is_allowed_extension(filename) || !is_allowed_mime_type(content_type) {
        return Err(AppError::InvalidFileType);
    }
    if size > max_size {
        return Err(AppError::FileTooLarge);
    }
    Ok(())
}
