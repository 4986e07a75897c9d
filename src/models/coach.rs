use crate::entities::user_entity as users;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CoachResponse {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for CoachResponse {
    fn from(u: users::Model) -> Self {
        Self {
            id: u.id,
            name: u.name,
            phone: u.phone,
            created_at: u.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateCoachRequest {
    #[schema(example = "李教练")]
    pub name: String,
    #[schema(example = "13987654321")]
    pub phone: String,
}
