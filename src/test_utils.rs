use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::error::{AppError, AppResult};
use crate::services::pipeline::Capabilities;
use crate::upstream::{GeoApi, SolarApi, TimeZoneApi};

/// Fresh in-memory database with all migrations applied.
pub async fn test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub const LONDON_GEO: &str =
    r#"[{"name":"London","lat":51.5073219,"lon":-0.1276474,"country":"GB"}]"#;
pub const LONDON_TZ: &str = r#"{"status":"OK","message":"","countryCode":"GB","countryName":"United Kingdom","zoneName":"Europe/London","gmtOffset":0}"#;
pub const STOCKHOLM_SOLAR: &str = r#"{"results":{"sunrise":"8:35:12 AM","sunset":"3:14:40 PM","solar_noon":"11:54:56 AM","day_length":"6:39:28"},"status":"OK"}"#;

/// Canned upstream body, or a transport failure when `Err`.
#[derive(Debug)]
pub struct Stub {
    response: Result<String, String>,
    calls: AtomicUsize,
}

impl Stub {
    pub fn ok(body: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(body.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn respond(&self) -> AppResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone().map_err(AppError::Upstream)
    }
}

#[async_trait]
impl GeoApi for Stub {
    async fn get_coordinates(&self, _city: &str) -> AppResult<String> {
        self.respond()
    }
}

#[async_trait]
impl TimeZoneApi for Stub {
    async fn get_time_zone(&self, _latitude: &str, _longitude: &str) -> AppResult<String> {
        self.respond()
    }
}

#[async_trait]
impl SolarApi for Stub {
    async fn get_solar_data(
        &self,
        _date: NaiveDate,
        _latitude: f64,
        _longitude: f64,
        _timezone: Option<&str>,
    ) -> AppResult<String> {
        self.respond()
    }
}

pub fn capabilities(geo: &Arc<Stub>, time_zone: &Arc<Stub>, solar: &Arc<Stub>) -> Capabilities {
    Capabilities {
        geo: geo.clone(),
        time_zone: time_zone.clone(),
        solar: Some(solar.clone()),
    }
}
