use std::sync::Arc;

use crate::activity::ActivityClient;
use crate::config::AppConfig;
use crate::db::UserStore;

/// Shared handler state. Cloned per request, so everything sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub activity: Arc<dyn ActivityClient>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn UserStore>,
        activity: Arc<dyn ActivityClient>,
        config: AppConfig,
    ) -> Self {
        Self {
            store,
            activity,
            config: Arc::new(config),
        }
    }
}
