use std::sync::Arc;

use crate::{config::AppConfig, services::trips::TripService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub trips: TripService,
}

impl AppState {
    pub fn new(config: AppConfig, trips: TripService) -> Self {
        Self {
            config: Arc::new(config),
            trips,
        }
    }
}
