use std::path::Path;

use actix_files::Files;
use actix_web::web;

use crate::utils::storage::UPLOADS_PREFIX;

pub mod upload;

pub fn routes(cfg: &mut web::ServiceConfig, upload_dir: &Path) {
    cfg.service(
        web::resource("/upload")
            .route(web::post().to(upload::create_upload)),
    )
    .service(
        web::resource("/images")
            .route(web::get().to(upload::list_uploads)),
    )
    .service(Files::new(UPLOADS_PREFIX, upload_dir));
}
