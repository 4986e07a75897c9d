use crate::entities::{FinanceCategory, FinanceType, finance_record_entity as fr};
use crate::utils::RangePreset;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FinanceRecordResponse {
    pub id: i64,
    #[serde(rename = "type")]
    pub record_type: FinanceType,
    pub category: FinanceCategory,
    pub name: String,
    pub amount: i64,
    pub record_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<fr::Model> for FinanceRecordResponse {
    fn from(m: fr::Model) -> Self {
        Self {
            id: m.id,
            record_type: m.record_type,
            category: m.category,
            name: m.name,
            amount: m.amount,
            record_date: m.record_date,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateFinanceRecordRequest {
    #[serde(rename = "type")]
    pub record_type: FinanceType,
    pub category: FinanceCategory,
    #[schema(example = "场地租金")]
    pub name: String,
    /// 金额（分）
    #[schema(example = 500000)]
    pub amount: i64,
    pub record_date: NaiveDate,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct FinanceQuery {
    #[serde(default)]
    pub range: RangePreset,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub record_type: Option<FinanceType>,
    pub category: Option<FinanceCategory>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FinanceSummary {
    pub total_income: i64,
    pub total_expense: i64,
    pub net: i64,
    pub course_income: i64,
    pub coach_expense: i64,
    pub other_income: i64,
    pub other_expense: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FinanceListResponse {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub summary: FinanceSummary,
    pub records: Vec<FinanceRecordResponse>,
}
