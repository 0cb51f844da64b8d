use std::sync::Arc;

use crate::config::Config;
use crate::render::LetterRenderer;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only: each request builds its own batch, nothing is shared between uploads.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub renderer: Arc<LetterRenderer>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let renderer = Arc::new(LetterRenderer::from_config(&config));
        Self { config, renderer }
    }
}
