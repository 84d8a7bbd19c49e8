use std::sync::Arc;

use crate::modules::storage::KvStore;

/// Long-lived collaborators shared by every request.
pub struct CoreServices {
    pub store: Arc<dyn KvStore>,
}

// Axum application state
#[derive(Clone)]
pub struct AppState {
    pub core: Arc<CoreServices>,
}

impl AppState {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            core: Arc::new(CoreServices { store }),
        }
    }
}

impl axum::extract::FromRef<AppState> for Arc<CoreServices> {
    fn from_ref(state: &AppState) -> Self {
        state.core.clone()
    }
}
