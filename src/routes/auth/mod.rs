mod handlers;
mod types;

pub(crate) use handlers::{MIN_PASSWORD_LENGTH, hash_blocking, validate_username};
pub use handlers::{login, logout, register, whoami};
pub use types::{AuthResponse, LoginRequest, RegisterRequest, WhoAmIResponse};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{__path_login, __path_logout, __path_register, __path_whoami};
