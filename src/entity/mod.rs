pub mod cities;
pub mod solar_data;
pub mod users;
