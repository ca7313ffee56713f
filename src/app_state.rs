use crate::service::AnalyzerService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AnalyzerService>,
}

impl AppState {
    pub fn new(service: AnalyzerService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
