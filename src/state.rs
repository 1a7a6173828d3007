use std::sync::Arc;

use crate::config::Config;
use crate::email::Mailer;
use crate::storage::DocumentStore;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn DocumentStore>,
    pub mailer: Arc<dyn Mailer>,
}
