//! Third-party APIs: geocoding, timezone lookup and sunrise/sunset times.
//!
//! Each client returns the raw response body. [`classify`] turns sentinel
//! payloads into outcomes, and [`parse`] turns the rest into typed records.

pub mod classify;
pub mod client;
pub mod models;
pub mod parse;

pub use classify::Classification;
pub use client::{GeoApi, GeoClient, SolarApi, SolarClient, TimeZoneApi, TimeZoneClient};
