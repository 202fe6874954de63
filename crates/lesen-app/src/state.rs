use std::sync::Arc;

use lesen_config::Config;

use crate::pipeline::Pipeline;

pub struct AppState {
    pub config: Config,
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(config: Config, pipeline: Pipeline) -> Self {
        Self {
            config,
            pipeline: Arc::new(pipeline),
        }
    }
}
