use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult,
    EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
};

use crate::entity::cities;
use crate::services::normalize::CityNameNormalizer;

/// Fields for a city row that does not exist yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCity {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Option<String>,
    pub country: Option<String>,
}

pub struct CityRepository<'a, C: ConnectionTrait> {
    db: &'a C,
    normalizer: &'a CityNameNormalizer,
}

impl<'a, C: ConnectionTrait> CityRepository<'a, C> {
    /// Creates a new instance of [`CityRepository`]
    pub fn new(db: &'a C, normalizer: &'a CityNameNormalizer) -> Self {
        Self { db, normalizer }
    }

    /// Look up a city by name, normalized the same way it was stored.
    pub async fn get_city(&self, name: &str) -> Result<Option<cities::Model>, DbErr> {
        let name = self.normalizer.normalize(name);

        cities::Entity::find()
            .filter(cities::Column::Name.eq(name))
            .one(self.db)
            .await
    }

    pub async fn get_city_by_id(&self, id: i32) -> Result<Option<cities::Model>, DbErr> {
        cities::Entity::find_by_id(id).one(self.db).await
    }

    pub async fn get_all_cities(&self) -> Result<Vec<cities::Model>, DbErr> {
        cities::Entity::find()
            .order_by_asc(cities::Column::Id)
            .all(self.db)
            .await
    }

    /// Insert a city under its normalized name.
    ///
    /// When a concurrent insert for the same name wins the race, the existing
    /// row is returned instead of the unique-violation error.
    pub async fn add_city(&self, city: NewCity) -> Result<cities::Model, DbErr> {
        let name = self.normalizer.normalize(&city.name);

        let model = cities::ActiveModel {
            name: ActiveValue::Set(name.clone()),
            latitude: ActiveValue::Set(city.latitude),
            longitude: ActiveValue::Set(city.longitude),
            timezone: ActiveValue::Set(city.timezone),
            country: ActiveValue::Set(city.country),
            ..Default::default()
        };

        match model.insert(self.db).await {
            Ok(inserted) => Ok(inserted),
            Err(err) if super::is_unique_violation(&err) => {
                tracing::debug!(city = %name, "City already stored, returning existing row");
                self.get_city(&name).await?.ok_or(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Overwrite every field of row `id`.
    ///
    /// Returns `Ok(None)` when the row does not exist.
    pub async fn update_city(
        &self,
        id: i32,
        city: NewCity,
    ) -> Result<Option<cities::Model>, DbErr> {
        let Some(existing) = self.get_city_by_id(id).await? else {
            return Ok(None);
        };

        let mut active = existing.into_active_model();
        active.name = ActiveValue::Set(self.normalizer.normalize(&city.name));
        active.latitude = ActiveValue::Set(city.latitude);
        active.longitude = ActiveValue::Set(city.longitude);
        active.timezone = ActiveValue::Set(city.timezone);
        active.country = ActiveValue::Set(city.country);

        active.update(self.db).await.map(Some)
    }

    /// Deletes a city
    ///
    /// Check [`DeleteResult::rows_affected`] to learn whether the row existed.
    pub async fn delete_city(&self, id: i32) -> Result<DeleteResult, DbErr> {
        cities::Entity::delete_by_id(id).exec(self.db).await
    }
}
