use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::solar_data;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SolarDataResponse {
    pub id: i32,
    pub city: String,
    pub date: NaiveDate,
    #[schema(value_type = String, example = "08:35:12")]
    pub sunrise: NaiveTime,
    #[schema(value_type = String, example = "15:14:40")]
    pub sunset: NaiveTime,
    #[schema(value_type = Option<String>)]
    pub solar_noon: Option<NaiveTime>,
    pub day_length: Option<String>,
    pub country: Option<String>,
    pub timezone: Option<String>,
}

impl From<solar_data::Model> for SolarDataResponse {
    fn from(record: solar_data::Model) -> Self {
        Self {
            id: record.id,
            city: record.city,
            date: record.date,
            sunrise: record.sunrise,
            sunset: record.sunset,
            solar_noon: record.solar_noon,
            day_length: record.day_length,
            country: record.country,
            timezone: record.timezone,
        }
    }
}

/// Fields to change on a stored record; omitted fields keep their value
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSolarDataRequest {
    pub city: Option<String>,
    pub date: Option<NaiveDate>,
    #[schema(value_type = Option<String>)]
    pub sunrise: Option<NaiveTime>,
    #[schema(value_type = Option<String>)]
    pub sunset: Option<NaiveTime>,
    #[schema(value_type = Option<String>)]
    pub solar_noon: Option<NaiveTime>,
    pub day_length: Option<String>,
    pub country: Option<String>,
    pub timezone: Option<String>,
}
