use std::sync::Arc;

use crate::database::backend::Backend;
use crate::web::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn Backend>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(backend: Arc<dyn Backend>, sessions: SessionStore) -> Self {
        Self { backend, sessions }
    }
}
