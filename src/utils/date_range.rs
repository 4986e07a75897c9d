use crate::error::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 报表的时间维度
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RangePreset {
    #[default]
    Month,
    Year,
}

fn first_day_of_month(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}

fn last_day_of_month(today: NaiveDate) -> NaiveDate {
    let (y, m) = if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(today)
}

fn first_day_of_year(today: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today)
}

fn last_day_of_year(today: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap_or(today)
}

impl RangePreset {
    /// 截止到今天的区间（财务报表使用）
    pub fn to_date(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            RangePreset::Month => (first_day_of_month(today), today),
            RangePreset::Year => (first_day_of_year(today), today),
        }
    }

    /// 完整自然月/自然年（统计分析使用）
    pub fn full_period(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            RangePreset::Month => (first_day_of_month(today), last_day_of_month(today)),
            RangePreset::Year => (first_day_of_year(today), last_day_of_year(today)),
        }
    }
}

/// 显式给出的起止日期覆盖预设值；起始晚于结束时报错
pub fn resolve_range(
    preset: (NaiveDate, NaiveDate),
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> AppResult<(NaiveDate, NaiveDate)> {
    let start = start.unwrap_or(preset.0);
    let end = end.unwrap_or(preset.1);
    if start > end {
        return Err(AppError::ValidationError(
            "开始日期不能晚于结束日期".to_string(),
        ));
    }
    Ok((start, end))
}
