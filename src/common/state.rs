use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::Config;
use crate::services::{Capabilities, CityNameNormalizer, CityPipeline};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub normalizer: Arc<CityNameNormalizer>,
    pub apis: Capabilities,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        config: Config,
        normalizer: CityNameNormalizer,
        apis: Capabilities,
    ) -> Self {
        Self {
            db,
            config: Arc::new(config),
            normalizer: Arc::new(normalizer),
            apis,
        }
    }

    /// Pipeline borrowing this state's connection, normalizer and clients.
    #[must_use]
    pub fn pipeline(&self) -> CityPipeline<'_> {
        CityPipeline::new(&self.db, &self.normalizer, &self.apis)
    }
}
