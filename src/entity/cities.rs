use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A resolved location, keyed by its normalized name.
///
/// `timezone` and `country` stay empty for rows that were only geocoded.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(column_type = "Double")]
    pub latitude: f64,
    #[sea_orm(column_type = "Double")]
    pub longitude: f64,
    pub timezone: Option<String>,
    pub country: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Coordinates and timezone/country are all known.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.timezone.is_some() && self.country.is_some()
    }
}
