use serde::Deserialize;

/// One element of the geocoding API's top-level array.
#[derive(Debug, Clone, Deserialize)]
pub struct GeoEntry {
    #[serde(default)]
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

/// Response from `/v2.1/get-time-zone`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeZoneResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub zone_name: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
}

/// Response from the sunrise/sunset `/json` endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SolarResponse {
    pub results: SolarResults,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolarResults {
    pub sunrise: String,
    pub sunset: String,
    #[serde(default)]
    pub solar_noon: Option<String>,
    /// `"9:14:33"` when formatted, a number of seconds otherwise
    #[serde(default)]
    pub day_length: Option<serde_json::Value>,
}
