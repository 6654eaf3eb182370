use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sunrise/sunset for one city on one calendar date.
///
/// `country` and `timezone` are copied from the city row when the record is created.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "solar_data")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub city: String,
    pub date: Date,
    pub sunrise: Time,
    pub sunset: Time,
    pub solar_noon: Option<Time>,
    pub day_length: Option<String>,
    pub country: Option<String>,
    pub timezone: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
