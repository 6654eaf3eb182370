//! Typed extraction from upstream bodies that passed classification.

use chrono::NaiveTime;

use crate::error::{AppError, AppResult};
use crate::services::combine::CityData;
use crate::upstream::models::{GeoEntry, SolarResponse, TimeZoneResponse};

/// Solar times for one date and location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolarTimes {
    pub sunrise: NaiveTime,
    pub sunset: NaiveTime,
    pub solar_noon: Option<NaiveTime>,
    pub day_length: Option<String>,
}

/// First element of the geocoding array as a partial record.
pub fn parse_geo(raw: &str) -> AppResult<CityData> {
    let entries: Vec<GeoEntry> = serde_json::from_str(raw)
        .map_err(|e| AppError::Parse(format!("Invalid geocoding response: {e}")))?;

    let first = entries
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Parse("Geocoding response has no entries".to_string()))?;

    Ok(CityData {
        name: first.name,
        latitude: Some(first.lat),
        longitude: Some(first.lon),
        ..CityData::default()
    })
}

/// `zoneName` and `countryName` as a partial record.
pub fn parse_time_zone(raw: &str) -> AppResult<CityData> {
    let response: TimeZoneResponse = serde_json::from_str(raw)
        .map_err(|e| AppError::Parse(format!("Invalid time zone response: {e}")))?;

    let timezone = response
        .zone_name
        .ok_or_else(|| AppError::Parse("Time zone response is missing zoneName".to_string()))?;
    let country = response
        .country_name
        .ok_or_else(|| AppError::Parse("Time zone response is missing countryName".to_string()))?;

    Ok(CityData {
        timezone: Some(timezone),
        country: Some(country),
        ..CityData::default()
    })
}

pub fn parse_solar(raw: &str) -> AppResult<SolarTimes> {
    let response: SolarResponse = serde_json::from_str(raw)
        .map_err(|e| AppError::Parse(format!("Invalid solar response: {e}")))?;
    let results = response.results;

    let solar_noon = results
        .solar_noon
        .as_deref()
        .map(|raw| parse_clock_time("solar_noon", raw))
        .transpose()?;

    Ok(SolarTimes {
        sunrise: parse_clock_time("sunrise", &results.sunrise)?,
        sunset: parse_clock_time("sunset", &results.sunset)?,
        solar_noon,
        day_length: results.day_length.as_ref().and_then(day_length_text),
    })
}

/// Parse `h:mm:ss AM` or `hh:mm:ss PM`.
fn parse_clock_time(field: &str, raw: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%I:%M:%S %p")
        .map_err(|e| AppError::Parse(format!("Invalid {field} time {raw:?}: {e}")))
}

fn day_length_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(text) => Some(text.clone()),
        serde_json::Value::Number(seconds) => seconds.as_u64().map(|total| {
            format!("{}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geo_takes_the_first_entry() {
        let raw = r#"[
            {"name":"London","lat":51.5073219,"lon":-0.1276474,"country":"GB"},
            {"name":"London","lat":42.9832406,"lon":-81.243372,"country":"CA"}
        ]"#;

        let city = parse_geo(raw).unwrap();

        assert_eq!(city.name.as_deref(), Some("London"));
        assert_eq!(city.coordinates(), Some((51.5073219, -0.1276474)));
        assert_eq!(city.timezone, None);
    }

    #[test]
    fn geo_rejects_unexpected_shapes() {
        assert!(matches!(parse_geo(r#"{"cod":401}"#), Err(AppError::Parse(_))));
        assert!(matches!(parse_geo(r#"[{"name":"X"}]"#), Err(AppError::Parse(_))));
    }

    #[test]
    fn time_zone_fields() {
        let raw = r#"{"status":"OK","message":"","countryCode":"SE","countryName":"Sweden","zoneName":"Europe/Stockholm","gmtOffset":3600}"#;

        let city = parse_time_zone(raw).unwrap();

        assert_eq!(city.timezone.as_deref(), Some("Europe/Stockholm"));
        assert_eq!(city.country.as_deref(), Some("Sweden"));
        assert_eq!(city.name, None);
    }

    #[test]
    fn time_zone_missing_zone_is_a_parse_error() {
        assert!(matches!(
            parse_time_zone(r#"{"status":"OK","countryName":"Sweden"}"#),
            Err(AppError::Parse(_))
        ));
    }

    #[test]
    fn solar_accepts_one_and_two_digit_hours() {
        let raw = r#"{"results":{"sunrise":"7:27:02 AM","sunset":"10:05:55 PM","solar_noon":"12:16:28 PM","day_length":"9:38:53"},"status":"OK"}"#;

        let times = parse_solar(raw).unwrap();

        assert_eq!(times.sunrise, NaiveTime::from_hms_opt(7, 27, 2).unwrap());
        assert_eq!(times.sunset, NaiveTime::from_hms_opt(22, 5, 55).unwrap());
        assert_eq!(times.solar_noon, NaiveTime::from_hms_opt(12, 16, 28));
        assert_eq!(times.day_length.as_deref(), Some("9:38:53"));
    }

    #[test]
    fn solar_midnight_and_numeric_day_length() {
        let raw = r#"{"results":{"sunrise":"12:00:01 AM","sunset":"11:59:59 PM","day_length":86398},"status":"OK"}"#;

        let times = parse_solar(raw).unwrap();

        assert_eq!(times.sunrise, NaiveTime::from_hms_opt(0, 0, 1).unwrap());
        assert_eq!(times.sunset, NaiveTime::from_hms_opt(23, 59, 59).unwrap());
        assert_eq!(times.solar_noon, None);
        assert_eq!(times.day_length.as_deref(), Some("23:59:58"));
    }

    #[test]
    fn solar_malformed_time_fails_loudly() {
        let raw = r#"{"results":{"sunrise":"not a time","sunset":"5:05:55 PM"},"status":"OK"}"#;

        let err = parse_solar(raw).unwrap_err();

        assert!(matches!(err, AppError::Parse(msg) if msg.contains("sunrise")));
    }
}
