use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::cities;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CityResponse {
    pub id: i32,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Option<String>,
    pub country: Option<String>,
}

impl From<cities::Model> for CityResponse {
    fn from(city: cities::Model) -> Self {
        Self {
            id: city.id,
            name: city.name,
            latitude: city.latitude,
            longitude: city.longitude,
            timezone: city.timezone,
            country: city.country,
        }
    }
}

/// City to re-resolve into an existing row
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateLocationRequest {
    pub city: String,
}
