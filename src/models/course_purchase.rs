use crate::entities::course_purchase_entity as cp;
use crate::models::MemberResponse;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CoursePurchaseResponse {
    pub id: i64,
    pub user_id: i64,
    pub amount: i64,
    pub quantity: i32,
    pub purchase_date: NaiveDate,
    pub valid_days: i32,
    pub expiry_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<cp::Model> for CoursePurchaseResponse {
    fn from(m: cp::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            amount: m.amount,
            quantity: m.quantity,
            purchase_date: m.purchase_date,
            valid_days: m.valid_days,
            expiry_date: m.expiry_date,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateCoursePurchaseRequest {
    /// 金额（分）
    #[schema(example = 120000)]
    pub amount: i64,
    #[schema(example = 10)]
    pub quantity: i32,
    /// 缺省为今天
    pub purchase_date: Option<NaiveDate>,
    #[schema(example = 90)]
    pub valid_days: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RenewMembershipRequest {
    #[schema(example = 8)]
    pub classes: i32,
    /// 金额（分）
    #[schema(example = 96000)]
    pub amount: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PurchaseResultResponse {
    pub purchase: CoursePurchaseResponse,
    pub member: MemberResponse,
}
