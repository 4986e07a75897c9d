use crate::entities::{Gender, user_entity as users};
use crate::models::CoursePurchaseResponse;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MemberResponse {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub gender: Option<Gender>,
    pub birth_date: Option<NaiveDate>,
    pub remaining_classes: i32,
    pub expiry_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for MemberResponse {
    fn from(u: users::Model) -> Self {
        Self {
            id: u.id,
            name: u.name,
            phone: u.phone,
            gender: u.gender,
            birth_date: u.birth_date,
            remaining_classes: u.remaining_classes,
            expiry_date: u.expiry_date,
            created_at: u.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MemberQuery {
    /// 按姓名或手机号模糊搜索
    pub keyword: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// 建档时一并录入的购课信息
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InitialPurchase {
    /// 金额（分）
    #[schema(example = 360000)]
    pub amount: i64,
    #[schema(example = 30)]
    pub quantity: i32,
    /// 缺省为今天
    pub purchase_date: Option<NaiveDate>,
    /// 缺省取配置 membership.default_valid_days
    pub valid_days: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateMemberRequest {
    #[schema(example = "张三")]
    pub name: String,
    #[schema(example = "13812345678")]
    pub phone: String,
    #[schema(example = "1990-01-01")]
    pub birth_date: NaiveDate,
    pub gender: Option<Gender>,
    /// 缺省为手机号后6位
    pub password: Option<String>,
    pub initial_purchase: Option<InitialPurchase>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateMemberResponse {
    pub member: MemberResponse,
    pub purchase: Option<CoursePurchaseResponse>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateMemberRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
    /// 手动校正剩余课程数
    pub remaining_classes: Option<i32>,
}

impl UpdateMemberRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.birth_date.is_none()
            && self.gender.is_none()
            && self.remaining_classes.is_none()
    }
}
