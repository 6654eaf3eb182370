use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Response};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::normalize::capitalize_first;

/// Forward geocoding: city name to coordinates.
#[async_trait]
pub trait GeoApi: Send + Sync {
    async fn get_coordinates(&self, city: &str) -> AppResult<String>;
}

/// Timezone and country for a coordinate pair, passed as invariant decimal strings.
#[async_trait]
pub trait TimeZoneApi: Send + Sync {
    async fn get_time_zone(&self, latitude: &str, longitude: &str) -> AppResult<String>;
}

/// Sunrise, sunset and solar noon for a date and location.
#[async_trait]
pub trait SolarApi: Send + Sync {
    async fn get_solar_data(
        &self,
        date: NaiveDate,
        latitude: f64,
        longitude: f64,
        timezone: Option<&str>,
    ) -> AppResult<String>;
}

/// The body is returned as text regardless of status; classification decides
/// what it means.
async fn read_body(api: &'static str, response: Response) -> AppResult<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| AppError::Upstream(format!("{api}: failed to read response: {e}")))?;

    if !status.is_success() {
        tracing::warn!(api, %status, "Upstream returned non-success status");
    }

    Ok(body)
}

pub struct GeoClient {
    http_client: Client,
    base_url: String,
    api_key: String,
}

impl GeoClient {
    #[must_use]
    pub fn new(http_client: Client, config: &Config) -> Self {
        Self {
            http_client,
            base_url: config.geo_base_url.trim_end_matches('/').to_string(),
            api_key: config.geo_api_key.clone(),
        }
    }
}

#[async_trait]
impl GeoApi for GeoClient {
    async fn get_coordinates(&self, city: &str) -> AppResult<String> {
        let url = format!("{}/geo/1.0/direct", self.base_url);
        let city = capitalize_first(city);
        tracing::debug!(%url, %city, "Calling geocoding API");

        let response = self
            .http_client
            .get(&url)
            .query(&[("q", city.as_str()), ("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Geocoding request failed: {}", e.without_url())))?;

        read_body("geocoding", response).await
    }
}

pub struct TimeZoneClient {
    http_client: Client,
    base_url: String,
    api_key: String,
}

impl TimeZoneClient {
    #[must_use]
    pub fn new(http_client: Client, config: &Config) -> Self {
        Self {
            http_client,
            base_url: config.timezone_base_url.trim_end_matches('/').to_string(),
            api_key: config.timezone_api_key.clone(),
        }
    }
}

#[async_trait]
impl TimeZoneApi for TimeZoneClient {
    async fn get_time_zone(&self, latitude: &str, longitude: &str) -> AppResult<String> {
        let url = format!("{}/v2.1/get-time-zone", self.base_url);
        tracing::debug!(%url, latitude, longitude, "Calling time zone API");

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("format", "json"),
                ("by", "position"),
                ("lat", latitude),
                ("lng", longitude),
            ])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Time zone request failed: {}", e.without_url())))?;

        read_body("timezone", response).await
    }
}

pub struct SolarClient {
    http_client: Client,
    base_url: String,
}

impl SolarClient {
    #[must_use]
    pub fn new(http_client: Client, config: &Config) -> Self {
        Self {
            http_client,
            base_url: config.solar_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SolarApi for SolarClient {
    async fn get_solar_data(
        &self,
        date: NaiveDate,
        latitude: f64,
        longitude: f64,
        timezone: Option<&str>,
    ) -> AppResult<String> {
        let url = format!("{}/json", self.base_url);

        let mut query = vec![
            ("lat", latitude.to_string()),
            ("lng", longitude.to_string()),
            ("date", date.format("%Y-%m-%d").to_string()),
        ];
        if let Some(tzid) = timezone {
            query.push(("tzid", tzid.to_string()));
        }
        tracing::debug!(%url, %date, latitude, longitude, ?timezone, "Calling sunrise/sunset API");

        let response = self
            .http_client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Solar request failed: {}", e.without_url())))?;

        read_body("solar", response).await
    }
}
