mod handlers;
mod types;

pub use handlers::{delete_location, get_all_locations, get_location, update_location};
pub use types::{CityResponse, UpdateLocationRequest};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{
    __path_delete_location, __path_get_all_locations, __path_get_location, __path_update_location,
};
