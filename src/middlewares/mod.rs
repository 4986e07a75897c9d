pub mod auth;
pub mod cors;

pub use auth::{AuthMiddleware, AuthUser, RequireRole, get_auth_user};
pub use cors::create_cors;
