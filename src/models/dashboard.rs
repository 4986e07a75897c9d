use crate::models::{ClassRecordResponse, CoursePurchaseResponse, MemberResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminOverview {
    pub member_count: i64,
    pub coach_count: i64,
    pub classes_this_month: i64,
    pub income_this_month: i64,
    pub expense_this_month: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MemberDashboard {
    pub profile: MemberResponse,
    /// 最近一次购课的到期日
    pub current_expiry: Option<NaiveDate>,
    pub class_records: Vec<ClassRecordResponse>,
    pub purchases: Vec<CoursePurchaseResponse>,
}
