mod handlers;
mod types;

pub use handlers::{delete_user, get_all_users, get_by_user_data, get_user_by_id, update_user};
pub use types::{UpdateUserRequest, UserResponse};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{
    __path_delete_user, __path_get_all_users, __path_get_by_user_data, __path_get_user_by_id,
    __path_update_user,
};
