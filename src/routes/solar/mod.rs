mod handlers;
mod types;

pub use handlers::{delete_solar_data, get_all_solar_data, get_solar_data, update_solar_data};
pub use types::{SolarDataResponse, UpdateSolarDataRequest};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{
    __path_delete_solar_data, __path_get_all_solar_data, __path_get_solar_data,
    __path_update_solar_data,
};
