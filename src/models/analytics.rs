use crate::utils::RangePreset;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct AnalyticsQuery {
    pub member_id: Option<i64>,
    #[serde(default)]
    pub range: RangePreset,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PeriodCount {
    /// `YYYY-MM-DD`（按月查看）或 `YYYY-MM`（按年查看）
    pub period: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AgeGroupCount {
    pub group: String,
    pub count: i64,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GenderDistribution {
    pub male: i64,
    pub female: i64,
    pub unknown: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnalyticsResponse {
    pub range: RangePreset,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_classes: i64,
    pub classes_by_period: Vec<PeriodCount>,
    pub age_groups: Vec<AgeGroupCount>,
    pub gender: GenderDistribution,
}
