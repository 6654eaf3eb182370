//! City-data resolution: normalize, consult the database, then fall through to
//! geocoding, timezone lookup and (for solar requests) sunrise/sunset.
//!
//! Every step is awaited before the next one starts. The database is always
//! checked first, at city granularity and at `(city, date)` granularity.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use sea_orm::DatabaseConnection;

use crate::entity::{cities, solar_data};
use crate::error::{AppError, AppResult};
use crate::repository::{CityRepository, NewCity, NewSolarData, SolarRepository};
use crate::services::combine::combine;
use crate::services::normalize::CityNameNormalizer;
use crate::upstream::classify::{classify_geo, classify_solar, classify_time_zone};
use crate::upstream::parse::{parse_geo, parse_solar, parse_time_zone};
use crate::upstream::{GeoApi, SolarApi, TimeZoneApi};

/// The upstream APIs a pipeline may call. Location lookups need only
/// geocoding and timezone; solar lookups also need `solar`.
#[derive(Clone)]
pub struct Capabilities {
    pub geo: Arc<dyn GeoApi>,
    pub time_zone: Arc<dyn TimeZoneApi>,
    pub solar: Option<Arc<dyn SolarApi>>,
}

pub struct CityPipeline<'a> {
    db: &'a DatabaseConnection,
    normalizer: &'a CityNameNormalizer,
    apis: &'a Capabilities,
}

impl<'a> CityPipeline<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        normalizer: &'a CityNameNormalizer,
        apis: &'a Capabilities,
    ) -> Self {
        Self {
            db,
            normalizer,
            apis,
        }
    }

    /// Stored city, or a freshly resolved and persisted one.
    ///
    /// # Errors
    ///
    /// Validation and classified upstream outcomes come back as-is; every
    /// other failure is reported as `BadRequest`.
    pub async fn get_location(&self, city: &str) -> AppResult<cities::Model> {
        finish("get_location", city, self.location(city).await)
    }

    /// Stored solar record for `(city, date)`, fetching and persisting it on a miss.
    ///
    /// # Errors
    ///
    /// Same mapping as [`Self::get_location`].
    pub async fn get_solar_data(
        &self,
        city: &str,
        date: Option<NaiveDate>,
    ) -> AppResult<solar_data::Model> {
        finish("get_solar_data", city, self.solar_data(city, date).await)
    }

    /// Re-resolve `city` upstream and overwrite row `id` with the result.
    ///
    /// # Errors
    ///
    /// `NotFound` when row `id` does not exist, otherwise as [`Self::get_location`].
    pub async fn refresh_location(&self, id: i32, city: &str) -> AppResult<cities::Model> {
        let result: AppResult<cities::Model> = async {
            validate_city(city)?;
            let resolved = self.resolve(city).await?;
            self.cities()
                .update_city(id, resolved)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("City {id} not found")))
        }
        .await;

        finish("refresh_location", city, result)
    }

    async fn location(&self, city: &str) -> AppResult<cities::Model> {
        validate_city(city)?;
        self.find_or_resolve_city(city).await
    }

    async fn solar_data(
        &self,
        city: &str,
        date: Option<NaiveDate>,
    ) -> AppResult<solar_data::Model> {
        validate_city(city)?;
        let date = validate_date(date)?;

        let solar = self
            .apis
            .solar
            .as_ref()
            .ok_or_else(|| AppError::Internal("Solar API is not configured".to_string()))?;

        let solar_repo = SolarRepository::new(self.db, self.normalizer);
        if let Some(cached) = solar_repo.get_solar_data(city, date).await? {
            tracing::debug!(city = %cached.city, %date, "Solar data cache hit");
            return Ok(cached);
        }

        let stored_city = self.find_or_resolve_city(city).await?;

        let raw = solar
            .get_solar_data(
                date,
                stored_city.latitude,
                stored_city.longitude,
                stored_city.timezone.as_deref(),
            )
            .await?;
        classify_solar(&raw).into_result()?;
        let times = parse_solar(&raw)?;

        let record = solar_repo
            .add_solar_data(NewSolarData {
                city: stored_city.name.clone(),
                date,
                sunrise: times.sunrise,
                sunset: times.sunset,
                solar_noon: times.solar_noon,
                day_length: times.day_length,
                country: stored_city.country.clone(),
                timezone: stored_city.timezone.clone(),
            })
            .await?;

        tracing::info!(city = %record.city, %date, id = record.id, "Solar data stored");
        Ok(record)
    }

    async fn find_or_resolve_city(&self, city: &str) -> AppResult<cities::Model> {
        let repo = self.cities();

        if let Some(cached) = repo.get_city(city).await? {
            tracing::debug!(city = %cached.name, "City cache hit");
            return Ok(cached);
        }

        tracing::debug!(city, "City cache miss, resolving upstream");
        let resolved = self.resolve(city).await?;
        let stored = repo.add_city(resolved).await?;

        tracing::info!(city = %stored.name, id = stored.id, "City stored");
        Ok(stored)
    }

    /// Geocode, then look up the timezone for the coordinates found.
    async fn resolve(&self, city: &str) -> AppResult<NewCity> {
        let raw_geo = self.apis.geo.get_coordinates(city).await?;
        classify_geo(&raw_geo).into_result()?;
        let geo = parse_geo(&raw_geo)?;

        let (latitude, longitude) = geo
            .coordinates()
            .ok_or_else(|| AppError::Parse("Geocoding response has no coordinates".to_string()))?;

        let raw_tz = self
            .apis
            .time_zone
            .get_time_zone(&latitude.to_string(), &longitude.to_string())
            .await?;
        classify_time_zone(&raw_tz).into_result()?;
        let tz = parse_time_zone(&raw_tz)?;

        let combined = combine(&geo, &tz);

        Ok(NewCity {
            name: self.normalizer.normalize(city),
            latitude,
            longitude,
            timezone: combined.timezone,
            country: combined.country,
        })
    }

    fn cities(&self) -> CityRepository<'a, DatabaseConnection> {
        CityRepository::new(self.db, self.normalizer)
    }
}

fn validate_city(city: &str) -> AppResult<()> {
    if city.trim().is_empty() {
        return Err(AppError::BadRequest("City cannot be empty".to_string()));
    }
    Ok(())
}

/// The year-1 sentinel counts as missing.
fn validate_date(date: Option<NaiveDate>) -> AppResult<NaiveDate> {
    match date {
        Some(date) if !(date.year() == 1 && date.ordinal() == 1) => Ok(date),
        _ => Err(AppError::BadRequest("Date is required".to_string())),
    }
}

fn finish<T>(operation: &'static str, city: &str, result: AppResult<T>) -> AppResult<T> {
    result.map_err(|err| {
        tracing::warn!(operation, city, error = %err, "City data request failed");
        err.into_bad_request()
    })
}

#[cfg(test)]
mod tests {
    use sea_orm::EntityTrait;

    use super::*;
    use crate::test_utils::{
        LONDON_GEO, LONDON_TZ, STOCKHOLM_SOLAR, Stub, capabilities, test_db,
    };

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[tokio::test]
    async fn resolves_and_persists_a_new_city() {
        let db = test_db().await;
        let normalizer = CityNameNormalizer::default();
        let (geo, tz, solar) = (Stub::ok(LONDON_GEO), Stub::ok(LONDON_TZ), Stub::ok(""));
        let apis = capabilities(&geo, &tz, &solar);
        let pipeline = CityPipeline::new(&db, &normalizer, &apis);

        let city = pipeline.get_location("london").await.unwrap();

        assert_eq!(city.name, "London");
        assert_eq!(city.latitude, 51.5073219);
        assert_eq!(city.longitude, -0.1276474);
        assert_eq!(city.timezone.as_deref(), Some("Europe/London"));
        assert_eq!(city.country.as_deref(), Some("United Kingdom"));
        assert_eq!((geo.calls(), tz.calls(), solar.calls()), (1, 1, 0));

        let stored = cities::Entity::find().all(&db).await.unwrap();
        assert_eq!(stored, vec![city]);
    }

    #[tokio::test]
    async fn stored_city_short_circuits_upstream() {
        let db = test_db().await;
        let normalizer = CityNameNormalizer::default();
        let (geo, tz, solar) = (Stub::ok(LONDON_GEO), Stub::ok(LONDON_TZ), Stub::ok(""));
        let apis = capabilities(&geo, &tz, &solar);
        let pipeline = CityPipeline::new(&db, &normalizer, &apis);

        let first = pipeline.get_location("london").await.unwrap();
        let second = pipeline.get_location("  LONDON").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(geo.calls(), 1);
        assert_eq!(tz.calls(), 1);
    }

    #[tokio::test]
    async fn solar_uses_stored_city_and_then_caches() {
        let db = test_db().await;
        let normalizer = CityNameNormalizer::default();
        CityRepository::new(&db, &normalizer)
            .add_city(NewCity {
                name: "Stockholm".to_string(),
                latitude: 59.3251172,
                longitude: 18.0710935,
                timezone: Some("Europe/Stockholm".to_string()),
                country: Some("Sweden".to_string()),
            })
            .await
            .unwrap();

        let (geo, tz, solar) = (Stub::ok(""), Stub::ok(""), Stub::ok(STOCKHOLM_SOLAR));
        let apis = capabilities(&geo, &tz, &solar);
        let pipeline = CityPipeline::new(&db, &normalizer, &apis);

        let record = pipeline.get_solar_data("stockholm", Some(date())).await.unwrap();

        assert_eq!(record.city, "Stockholm");
        assert_eq!(record.date, date());
        assert_eq!(record.sunrise.to_string(), "08:35:12");
        assert_eq!(record.sunset.to_string(), "15:14:40");
        assert_eq!(record.country.as_deref(), Some("Sweden"));
        assert_eq!(record.timezone.as_deref(), Some("Europe/Stockholm"));
        assert_eq!((geo.calls(), tz.calls(), solar.calls()), (0, 0, 1));

        let again = pipeline.get_solar_data("Stockholm", Some(date())).await.unwrap();
        assert_eq!(again, record);
        assert_eq!(solar.calls(), 1);
    }

    #[tokio::test]
    async fn solar_for_unknown_city_resolves_it_first() {
        let db = test_db().await;
        let normalizer = CityNameNormalizer::default();
        let (geo, tz, solar) = (
            Stub::ok(LONDON_GEO),
            Stub::ok(LONDON_TZ),
            Stub::ok(STOCKHOLM_SOLAR),
        );
        let apis = capabilities(&geo, &tz, &solar);
        let pipeline = CityPipeline::new(&db, &normalizer, &apis);

        let record = pipeline.get_solar_data("london", Some(date())).await.unwrap();

        assert_eq!(record.city, "London");
        assert_eq!(record.timezone.as_deref(), Some("Europe/London"));
        assert_eq!((geo.calls(), tz.calls(), solar.calls()), (1, 1, 1));
        assert!(CityRepository::new(&db, &normalizer)
            .get_city("London")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn ligature_city_name_hits_the_cache_on_repeat() {
        let db = test_db().await;
        let normalizer = CityNameNormalizer::default();
        let (geo, tz, solar) = (
            Stub::ok(LONDON_GEO),
            Stub::ok(LONDON_TZ),
            Stub::ok(STOCKHOLM_SOLAR),
        );
        let apis = capabilities(&geo, &tz, &solar);
        let pipeline = CityPipeline::new(&db, &normalizer, &apis);

        let first = pipeline.get_solar_data("ﬁnland", Some(date())).await.unwrap();
        let second = pipeline.get_solar_data("ﬁnland", Some(date())).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.city, "Finland");
        assert_eq!((geo.calls(), tz.calls(), solar.calls()), (1, 1, 1));

        let names: Vec<String> = cities::Entity::find()
            .all(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|city| city.name)
            .collect();
        assert_eq!(names, vec!["Finland".to_string()]);
    }

    #[tokio::test]
    async fn validation_runs_before_any_collaborator() {
        let db = test_db().await;
        let normalizer = CityNameNormalizer::default();
        let (geo, tz, solar) = (Stub::ok(LONDON_GEO), Stub::ok(LONDON_TZ), Stub::ok(STOCKHOLM_SOLAR));
        let apis = capabilities(&geo, &tz, &solar);
        let pipeline = CityPipeline::new(&db, &normalizer, &apis);

        let err = pipeline.get_location("   ").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "City cannot be empty"));

        let err = pipeline.get_solar_data("London", None).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "Date is required"));

        let sentinel = NaiveDate::from_ymd_opt(1, 1, 1);
        let err = pipeline.get_solar_data("London", sentinel).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "Date is required"));

        assert_eq!((geo.calls(), tz.calls(), solar.calls()), (0, 0, 0));
    }

    #[tokio::test]
    async fn geocoder_transport_failure_persists_nothing() {
        let db = test_db().await;
        let normalizer = CityNameNormalizer::default();
        let (geo, tz, solar) = (Stub::failing("connection refused"), Stub::ok(LONDON_TZ), Stub::ok(""));
        let apis = capabilities(&geo, &tz, &solar);
        let pipeline = CityPipeline::new(&db, &normalizer, &apis);

        let err = pipeline.get_location("London").await.unwrap_err();

        assert!(matches!(err, AppError::BadRequest(msg) if msg == "connection refused"));
        assert_eq!(tz.calls(), 0);
        assert!(cities::Entity::find().all(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_city_is_not_found() {
        let db = test_db().await;
        let normalizer = CityNameNormalizer::default();
        let (geo, tz, solar) = (Stub::ok("[]"), Stub::ok(LONDON_TZ), Stub::ok(""));
        let apis = capabilities(&geo, &tz, &solar);
        let pipeline = CityPipeline::new(&db, &normalizer, &apis);

        let err = pipeline.get_location("Atlantis").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(msg) if msg == "Data not found"));
        assert_eq!(tz.calls(), 0);
    }

    #[tokio::test]
    async fn time_zone_failure_status_is_a_bad_request() {
        let db = test_db().await;
        let normalizer = CityNameNormalizer::default();
        let (geo, tz, solar) = (
            Stub::ok(LONDON_GEO),
            Stub::ok(r#"{"status":"FAILED","message":"Invalid API key."}"#),
            Stub::ok(""),
        );
        let apis = capabilities(&geo, &tz, &solar);
        let pipeline = CityPipeline::new(&db, &normalizer, &apis);

        let err = pipeline.get_location("London").await.unwrap_err();

        assert!(matches!(err, AppError::BadRequest(msg) if msg == "Invalid API key."));
        assert!(cities::Entity::find().all(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn solar_sentinel_keeps_the_city_but_stores_no_record() {
        let db = test_db().await;
        let normalizer = CityNameNormalizer::default();
        let (geo, tz, solar) = (
            Stub::ok(LONDON_GEO),
            Stub::ok(LONDON_TZ),
            Stub::ok(r#"{"results":"","status":"INVALID_DATE"}"#),
        );
        let apis = capabilities(&geo, &tz, &solar);
        let pipeline = CityPipeline::new(&db, &normalizer, &apis);

        let err = pipeline.get_solar_data("London", Some(date())).await.unwrap_err();

        assert!(matches!(err, AppError::BadRequest(msg) if msg == "Invalid date"));
        assert_eq!(cities::Entity::find().all(&db).await.unwrap().len(), 1);
        assert!(solar_data::Entity::find().all(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn refresh_overwrites_existing_row() {
        let db = test_db().await;
        let normalizer = CityNameNormalizer::default();
        let stored = CityRepository::new(&db, &normalizer)
            .add_city(NewCity {
                name: "London".to_string(),
                latitude: 0.0,
                longitude: 0.0,
                timezone: None,
                country: None,
            })
            .await
            .unwrap();
        let (geo, tz, solar) = (Stub::ok(LONDON_GEO), Stub::ok(LONDON_TZ), Stub::ok(""));
        let apis = capabilities(&geo, &tz, &solar);
        let pipeline = CityPipeline::new(&db, &normalizer, &apis);

        let refreshed = pipeline.refresh_location(stored.id, "london").await.unwrap();

        assert_eq!(refreshed.id, stored.id);
        assert_eq!(refreshed.latitude, 51.5073219);
        assert!(refreshed.is_complete());

        let err = pipeline.refresh_location(999, "london").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
