use std::sync::Arc;

use mri_classifier::Pipeline;

/// Everything a request handler needs. Built once in `main`, never mutated,
/// so handlers share it without a lock.
pub struct AppState {
    pub pipeline: Pipeline,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(pipeline: Pipeline, max_upload_bytes: usize) -> Self {
        AppState { pipeline, max_upload_bytes }
    }
}

/// Shared state type, an `Arc<AppState>` handed to every request thread.
pub type SharedState = Arc<AppState>;
