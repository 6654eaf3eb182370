/// Partial city record. The geocoder fills name and coordinates, the timezone
/// API fills timezone and country.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityData {
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
    pub country: Option<String>,
}

impl CityData {
    /// Both coordinates, when known.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// Merge a geocoding record and a timezone record into a new value.
#[must_use]
pub fn combine(geo: &CityData, tz: &CityData) -> CityData {
    CityData {
        name: geo.name.clone(),
        latitude: geo.latitude,
        longitude: geo.longitude,
        timezone: tz.timezone.clone(),
        country: tz.country.clone(),
    }
}
