use std::sync::Arc;

use crate::db::RecordStore;
use crate::utils::storage::UploadStorage;

/// Shared resources handed to every request through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub storage: UploadStorage,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, storage: UploadStorage) -> Self {
        AppState { store, storage }
    }
}
