use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::users::Role;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    #[serde(alias = "username")]
    pub user_name: String,
    pub password: String,
    #[serde(default)]
    pub city: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Email address or username
    #[serde(alias = "email", alias = "username")]
    pub email_or_user_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub email: String,
    pub user_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WhoAmIResponse {
    pub email: String,
    pub user_name: String,
    pub city: Option<String>,
    pub role: Role,
}
