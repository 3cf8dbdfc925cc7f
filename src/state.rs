use crate::config::AppConfig;
use crate::services::EstimatePipeline;

pub struct AppState {
    pub config: AppConfig,
    pub pipeline: EstimatePipeline,
}
