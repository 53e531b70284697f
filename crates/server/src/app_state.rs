use std::path::PathBuf;

use tokio::sync::broadcast;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) events: broadcast::Sender<String>,
    pub(crate) index_path: PathBuf,
    pub(crate) static_dir: PathBuf,
}
