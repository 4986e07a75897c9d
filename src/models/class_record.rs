use crate::entities::class_record_entity as cr;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateClassRecordRequest {
    pub member_id: i64,
    pub coach_id: i64,
    /// 缺省为今天
    pub class_date: Option<NaiveDate>,
    /// 教练费（分）
    #[schema(example = 15000)]
    pub coach_fee: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClassRecordResponse {
    pub id: i64,
    pub member_id: i64,
    pub member_name: Option<String>,
    pub coach_id: i64,
    pub coach_name: Option<String>,
    pub class_date: NaiveDate,
    pub coach_fee: i64,
    pub created_at: DateTime<Utc>,
}

impl ClassRecordResponse {
    pub fn from_model(
        m: cr::Model,
        member_name: Option<String>,
        coach_name: Option<String>,
    ) -> Self {
        Self {
            id: m.id,
            member_id: m.user_id,
            member_name,
            coach_id: m.coach_id,
            coach_name,
            class_date: m.class_date,
            coach_fee: m.coach_fee,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateClassRecordResponse {
    pub record: ClassRecordResponse,
    pub remaining_classes: i32,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ClassRecordQuery {
    pub member_id: Option<i64>,
    pub coach_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}
