use std::sync::Arc;

use crate::config::Config;
use crate::store::SurveyStore;

/// Shared, read-only state handed to every request handler.
pub struct AppState {
    pub store: Arc<dyn SurveyStore>,
    pub expose_field_errors: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn SurveyStore>, config: &Config) -> Arc<Self> {
        Arc::new(Self {
            store,
            expose_field_errors: config.expose_field_errors,
        })
    }
}
