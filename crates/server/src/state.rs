use std::sync::Arc;

use wri_blobstore::ObjectStore;
use wri_render::VideoRenderer;
use wri_stats::{ShipParamsProvider, SkillNameTable, StaticShipParamsTable, UpgradeNameTable};
use wri_store::{KeyValueStore, Persister};

use crate::config::Config;

/// Everything a handler needs, built once in `main` and cloned (cheaply,
/// via `Arc`) into every request. No handler reaches back into `std::env`
/// or touches a global -- spec.md §9's module-level-mutable-state redesign
/// flag applies to the whole server, not just the decoder's lookup tables.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn KeyValueStore>,
    pub blobs: Arc<dyn ObjectStore>,
    pub persister: Arc<Persister>,
    pub renderer: Arc<VideoRenderer>,
    pub ship_params: Arc<dyn ShipParamsProvider>,
    pub skill_names: Arc<SkillNameTable>,
    pub upgrade_names: Arc<UpgradeNameTable>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn KeyValueStore>, blobs: Arc<dyn ObjectStore>) -> Self {
        let persister = Arc::new(Persister::new(store.clone()));
        Self {
            config,
            store,
            blobs,
            persister,
            renderer: Arc::new(VideoRenderer::new()),
            ship_params: Arc::new(StaticShipParamsTable::sample()),
            skill_names: Arc::new(SkillNameTable::sample()),
            upgrade_names: Arc::new(UpgradeNameTable::sample()),
            http: reqwest::Client::new(),
        }
    }
}
