use std::sync::Arc;

use crate::{
    config::Config,
    gateway::Gateway,
    hub::BroadcastHub,
    session::Lifecycle,
    storage::DiskStorage,
    store::UploadStore,
};

/* ------------ 全部共享狀態，啟動時建一次 ------------ */
#[derive(Clone)]
pub struct AppState {
    pub store:     UploadStore,
    pub hub:       BroadcastHub,
    pub gateway:   Gateway,
    pub lifecycle: Lifecycle,
    pub server_url: Arc<str>,
}

impl AppState {
    pub fn new(cfg: &Config, server_url: impl Into<Arc<str>>) -> Self {
        let store = UploadStore::new();
        let hub   = BroadcastHub::new(cfg.session_queue);
        let gateway = Gateway::new(
            store.clone(),
            hub.clone(),
            DiskStorage::new(&cfg.upload_dir),
            cfg.max_upload_bytes,
        );
        let lifecycle = Lifecycle::new(hub.clone(), cfg.max_message_chars);
        Self { store, hub, gateway, lifecycle, server_url: server_url.into() }
    }
}
