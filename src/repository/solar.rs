use chrono::{NaiveDate, NaiveTime};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult,
    EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
};

use crate::entity::solar_data;
use crate::services::normalize::CityNameNormalizer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSolarData {
    pub city: String,
    pub date: NaiveDate,
    pub sunrise: NaiveTime,
    pub sunset: NaiveTime,
    pub solar_noon: Option<NaiveTime>,
    pub day_length: Option<String>,
    pub country: Option<String>,
    pub timezone: Option<String>,
}

pub struct SolarRepository<'a, C: ConnectionTrait> {
    db: &'a C,
    normalizer: &'a CityNameNormalizer,
}

impl<'a, C: ConnectionTrait> SolarRepository<'a, C> {
    /// Creates a new instance of [`SolarRepository`]
    pub fn new(db: &'a C, normalizer: &'a CityNameNormalizer) -> Self {
        Self { db, normalizer }
    }

    /// Cached record for `(city, date)`, with the city normalized.
    pub async fn get_solar_data(
        &self,
        city: &str,
        date: NaiveDate,
    ) -> Result<Option<solar_data::Model>, DbErr> {
        let city = self.normalizer.normalize(city);

        solar_data::Entity::find()
            .filter(solar_data::Column::City.eq(city))
            .filter(solar_data::Column::Date.eq(date))
            .one(self.db)
            .await
    }

    pub async fn get_solar_data_by_id(&self, id: i32) -> Result<Option<solar_data::Model>, DbErr> {
        solar_data::Entity::find_by_id(id).one(self.db).await
    }

    pub async fn get_all_solar_data(&self) -> Result<Vec<solar_data::Model>, DbErr> {
        solar_data::Entity::find()
            .order_by_asc(solar_data::Column::Id)
            .all(self.db)
            .await
    }

    /// Insert a record; a lost race on `(city, date)` returns the winner's row.
    pub async fn add_solar_data(&self, record: NewSolarData) -> Result<solar_data::Model, DbErr> {
        let city = self.normalizer.normalize(&record.city);
        let date = record.date;

        let model = solar_data::ActiveModel {
            city: ActiveValue::Set(city.clone()),
            date: ActiveValue::Set(date),
            sunrise: ActiveValue::Set(record.sunrise),
            sunset: ActiveValue::Set(record.sunset),
            solar_noon: ActiveValue::Set(record.solar_noon),
            day_length: ActiveValue::Set(record.day_length),
            country: ActiveValue::Set(record.country),
            timezone: ActiveValue::Set(record.timezone),
            ..Default::default()
        };

        match model.insert(self.db).await {
            Ok(inserted) => Ok(inserted),
            Err(err) if super::is_unique_violation(&err) => {
                tracing::debug!(%city, %date, "Solar data already stored, returning existing row");
                self.get_solar_data(&city, date).await?.ok_or(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Overwrite every field of row `id`; `Ok(None)` when it does not exist.
    pub async fn update_solar_data(
        &self,
        id: i32,
        record: NewSolarData,
    ) -> Result<Option<solar_data::Model>, DbErr> {
        let Some(existing) = self.get_solar_data_by_id(id).await? else {
            return Ok(None);
        };

        let mut active = existing.into_active_model();
        active.city = ActiveValue::Set(self.normalizer.normalize(&record.city));
        active.date = ActiveValue::Set(record.date);
        active.sunrise = ActiveValue::Set(record.sunrise);
        active.sunset = ActiveValue::Set(record.sunset);
        active.solar_noon = ActiveValue::Set(record.solar_noon);
        active.day_length = ActiveValue::Set(record.day_length);
        active.country = ActiveValue::Set(record.country);
        active.timezone = ActiveValue::Set(record.timezone);

        active.update(self.db).await.map(Some)
    }

    pub async fn delete_solar_data(&self, id: i32) -> Result<DeleteResult, DbErr> {
        solar_data::Entity::delete_by_id(id).exec(self.db).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_db;

    fn stockholm(date: NaiveDate) -> NewSolarData {
        NewSolarData {
            city: "stockholm".to_string(),
            date,
            sunrise: NaiveTime::from_hms_opt(8, 35, 12).unwrap(),
            sunset: NaiveTime::from_hms_opt(15, 14, 40).unwrap(),
            solar_noon: NaiveTime::from_hms_opt(11, 54, 56),
            day_length: Some("6:39:28".to_string()),
            country: Some("Sweden".to_string()),
            timezone: Some("Europe/Stockholm".to_string()),
        }
    }

    #[tokio::test]
    async fn keyed_by_city_and_date() {
        let db = test_db().await;
        let normalizer = CityNameNormalizer::default();
        let repo = SolarRepository::new(&db, &normalizer);
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let next_day = day.succ_opt().unwrap();

        let stored = repo.add_solar_data(stockholm(day)).await.unwrap();
        assert_eq!(stored.city, "Stockholm");

        let found = repo.get_solar_data("STOCKHOLM", day).await.unwrap();
        assert_eq!(found, Some(stored));
        assert!(repo.get_solar_data("Stockholm", next_day).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_key_returns_existing_row() {
        let db = test_db().await;
        let normalizer = CityNameNormalizer::default();
        let repo = SolarRepository::new(&db, &normalizer);
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

        let first = repo.add_solar_data(stockholm(day)).await.unwrap();
        let second = repo.add_solar_data(stockholm(day)).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(repo.get_all_solar_data().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_and_delete() {
        let db = test_db().await;
        let normalizer = CityNameNormalizer::default();
        let repo = SolarRepository::new(&db, &normalizer);
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

        let stored = repo.add_solar_data(stockholm(day)).await.unwrap();
        let changed = NewSolarData {
            sunrise: NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
            ..stockholm(day)
        };

        let updated = repo.update_solar_data(stored.id, changed).await.unwrap().unwrap();
        assert_eq!(updated.sunrise, NaiveTime::from_hms_opt(8, 30, 0).unwrap());
        assert!(repo.update_solar_data(999, stockholm(day)).await.unwrap().is_none());

        assert_eq!(repo.delete_solar_data(stored.id).await.unwrap().rows_affected, 1);
        assert!(repo.get_solar_data_by_id(stored.id).await.unwrap().is_none());
    }
}
