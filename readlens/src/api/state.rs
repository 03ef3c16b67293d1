use std::sync::Arc;

use crate::config::Config;
use crate::engine::EngineRegistry;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub engines: EngineRegistry,
}

impl AppState {
    pub fn new(config: Config, engines: EngineRegistry) -> Self {
        Self {
            config: Arc::new(config),
            engines,
        }
    }
}
