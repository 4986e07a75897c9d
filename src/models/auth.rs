use crate::entities::{UserRole, user_entity as users};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "13812345678")]
    pub phone: String,
    #[schema(example = "345678")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionUser {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub role: UserRole,
}

impl From<users::Model> for SessionUser {
    fn from(u: users::Model) -> Self {
        Self {
            id: u.id,
            name: u.name,
            phone: u.phone,
            role: u.role,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: SessionUser,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}
