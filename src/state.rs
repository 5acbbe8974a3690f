// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    config::Config,
    utils::{
        html::HtmlCleaner,
        sanitizer::HtmlSanitizer,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub cleaner: Arc<HtmlCleaner>,
    pub config: Config,
}

impl AppState {
    /// Builds the shared cleaner from the configured escape mode.
    pub fn new(config: Config) -> Self {
        let cleaner = HtmlCleaner::new(HtmlSanitizer::new(config.escape_mode));
        Self {
            cleaner: Arc::new(cleaner),
            config,
        }
    }
}

impl FromRef<AppState> for Arc<HtmlCleaner> {
    fn from_ref(state: &AppState) -> Self {
        state.cleaner.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
