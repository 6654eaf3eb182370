//! SolarWatch - sunrise and sunset times for any city
//!
//! This library exposes the core modules for testing and reuse.

pub mod auth;
pub mod common;
pub mod config;
pub mod entity;
pub mod error;
pub mod repository;
pub mod routes;
pub mod services;
pub mod upstream;

#[cfg(test)]
mod test_utils;
