//! Keyed access to the `cities`, `solar_data` and `users` tables.
//!
//! City names are normalized before they are used as lookup or insert keys.

pub mod city;
pub mod solar;
pub mod user;

pub use city::{CityRepository, NewCity};
pub use solar::{NewSolarData, SolarRepository};
pub use user::{NewUser, UserRepository, UserUpdate};

use sea_orm::{DbErr, SqlErr};

/// Insert lost a race against another request for the same key.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
