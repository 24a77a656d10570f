use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse};
use log::{error, warn};
use serde::Serialize;
use url::Url;

use crate::errors::AppError;
use crate::models::upload::NewUploadRecord;
use crate::state::AppState;
use crate::utils::multipart::read_submission;
use crate::utils::storage::UPLOADS_PREFIX;
use crate::utils::validation::{validate_form, UploadForm};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    message: &'static str,
    name: String,
    email: String,
    image_url: String,
}

/// Base of the static-serving prefix as seen by the client, e.g. `http://host/uploads/`.
fn uploads_base_url(req: &HttpRequest) -> Result<Url, AppError> {
    let info = req.connection_info();
    Url::parse(&format!("{}://{}", info.scheme(), info.host()))
        .and_then(|origin| origin.join(&format!("{}/", UPLOADS_PREFIX.trim_start_matches('/'))))
        .map_err(|err| AppError::InternalServerError(format!("Invalid request host: {}", err)))
}

pub async fn create_upload(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, actix_web::Error> {
    let submission = read_submission(payload, state.storage.max_file_size()).await?;

    validate_form(&submission.form)?;
    let UploadForm { name, email } = submission.form;

    // Read-then-insert; concurrent requests with the same email can both get through.
    let existing = state.store.find_by_email(&email).await.map_err(|err| {
        error!("Database error during email lookup: {}", err);
        err
    })?;
    if existing.is_some() {
        return Err(AppError::EmailTaken.into());
    }

    let image = submission.image.ok_or(AppError::NoFile)?;

    // Resolved before the write so a bad Host header leaves nothing on disk.
    let base_url = uploads_base_url(&req)?;

    let filename = state.storage.accept(&image).await.map_err(|err| {
        match &err {
            AppError::StorageError(_) => error!("Failed to store {}: {}", image.filename, err),
            _ => warn!("Rejected upload {} ({}): {}", image.filename, image.content_type, err),
        }
        err
    })?;

    let image_url = base_url
        .join(&filename)
        .map_err(|err| AppError::InternalServerError(err.to_string()))?
        .to_string();

    let record = state
        .store
        .insert(NewUploadRecord {
            name,
            email,
            image_url,
        })
        .await
        .map_err(|err| {
            // The stored file is kept; there is no cleanup path.
            error!("Database error during insert, {} has no record: {}", filename, err);
            err
        })?;

    Ok(HttpResponse::Ok().json(UploadResponse {
        message: "Image uploaded successfully!",
        name: record.name,
        email: record.email,
        image_url: record.image_url,
    }))
}

pub async fn list_uploads(state: web::Data<AppState>) -> Result<HttpResponse, actix_web::Error> {
    let records = state.store.list_all().await.map_err(|err| {
        error!("Database error during listing: {}", err);
        err
    })?;

    Ok(HttpResponse::Ok().json(records))
}
