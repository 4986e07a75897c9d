use crate::database::DbPool;
use crate::entities::{Gender, class_record_entity as cr, user_entity as users};
use crate::error::AppResult;
use crate::models::*;
use crate::utils::{RangePreset, resolve_range};
use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use std::collections::{BTreeMap, HashMap};

pub const AGE_GROUPS: [&str; 5] = ["0-18", "19-30", "31-45", "46-60", "60+"];

/// 一次上课，附带会员的出生日期与性别
#[derive(Debug, Clone)]
pub struct Attendance {
    pub class_date: NaiveDate,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
}

fn period_label(date: NaiveDate, range: RangePreset) -> String {
    match range {
        RangePreset::Month => date.format("%Y-%m-%d").to_string(),
        RangePreset::Year => date.format("%Y-%m").to_string(),
    }
}

pub fn classes_by_period(rows: &[Attendance], range: RangePreset) -> Vec<PeriodCount> {
    let mut buckets: BTreeMap<String, i64> = BTreeMap::new();
    for row in rows {
        *buckets.entry(period_label(row.class_date, range)).or_default() += 1;
    }
    buckets
        .into_iter()
        .map(|(period, count)| PeriodCount { period, count })
        .collect()
}

/// 年龄按年份差计算（当前年份 - 出生年份）
pub fn age_group_of(birth_date: NaiveDate, today: NaiveDate) -> &'static str {
    let age = today.year() - birth_date.year();
    match age {
        i32::MIN..=18 => AGE_GROUPS[0],
        19..=30 => AGE_GROUPS[1],
        31..=45 => AGE_GROUPS[2],
        46..=60 => AGE_GROUPS[3],
        _ => AGE_GROUPS[4],
    }
}

pub fn age_groups(rows: &[Attendance], today: NaiveDate) -> Vec<AgeGroupCount> {
    let mut counts: HashMap<&'static str, i64> = HashMap::new();
    for birth_date in rows.iter().filter_map(|r| r.birth_date) {
        *counts.entry(age_group_of(birth_date, today)).or_default() += 1;
    }
    AGE_GROUPS
        .iter()
        .map(|g| AgeGroupCount {
            group: g.to_string(),
            count: counts.get(g).copied().unwrap_or(0),
        })
        .collect()
}

pub fn gender_distribution(rows: &[Attendance]) -> GenderDistribution {
    let mut dist = GenderDistribution::default();
    for row in rows {
        match row.gender {
            Some(Gender::Male) => dist.male += 1,
            Some(Gender::Female) => dist.female += 1,
            None => dist.unknown += 1,
        }
    }
    dist
}

#[derive(Clone)]
pub struct AnalyticsService {
    pool: DbPool,
}

impl AnalyticsService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn class_analytics(&self, query: &AnalyticsQuery) -> AppResult<AnalyticsResponse> {
        let today = Utc::now().date_naive();
        let (start_date, end_date) = resolve_range(
            query.range.full_period(today),
            query.start_date,
            query.end_date,
        )?;

        let mut select = cr::Entity::find()
            .filter(cr::Column::ClassDate.gte(start_date))
            .filter(cr::Column::ClassDate.lte(end_date));
        if let Some(member_id) = query.member_id {
            select = select.filter(cr::Column::UserId.eq(member_id));
        }
        let records = select.all(self.pool.as_ref()).await?;

        let mut member_ids: Vec<i64> = records.iter().map(|r| r.user_id).collect();
        member_ids.sort_unstable();
        member_ids.dedup();
        let members: HashMap<i64, users::Model> = if member_ids.is_empty() {
            HashMap::new()
        } else {
            users::Entity::find()
                .filter(users::Column::Id.is_in(member_ids))
                .all(self.pool.as_ref())
                .await?
                .into_iter()
                .map(|u| (u.id, u))
                .collect()
        };

        let rows: Vec<Attendance> = records
            .iter()
            .map(|r| {
                let member = members.get(&r.user_id);
                Attendance {
                    class_date: r.class_date,
                    birth_date: member.and_then(|m| m.birth_date),
                    gender: member.and_then(|m| m.gender),
                }
            })
            .collect();

        Ok(AnalyticsResponse {
            range: query.range,
            start_date,
            end_date,
            total_classes: rows.len() as i64,
            classes_by_period: classes_by_period(&rows, query.range),
            age_groups: age_groups(&rows, today),
            gender: gender_distribution(&rows),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn row(class_date: NaiveDate, birth: Option<NaiveDate>, gender: Option<Gender>) -> Attendance {
        Attendance {
            class_date,
            birth_date: birth,
            gender,
        }
    }

    #[test]
    fn test_classes_by_day_sorted() {
        let rows = vec![
            row(d(2025, 3, 5), None, None),
            row(d(2025, 3, 1), None, None),
            row(d(2025, 3, 5), None, None),
        ];
        let out = classes_by_period(&rows, RangePreset::Month);
        assert_eq!(
            out,
            vec![
                PeriodCount { period: "2025-03-01".into(), count: 1 },
                PeriodCount { period: "2025-03-05".into(), count: 2 },
            ]
        );
    }

    #[test]
    fn test_classes_by_month() {
        let rows = vec![
            row(d(2025, 1, 5), None, None),
            row(d(2025, 1, 30), None, None),
            row(d(2025, 2, 1), None, None),
        ];
        let out = classes_by_period(&rows, RangePreset::Year);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].period, "2025-01");
        assert_eq!(out[0].count, 2);
        assert_eq!(out[1].period, "2025-02");
    }

    #[test]
    fn test_age_group_boundaries() {
        let today = d(2025, 6, 1);
        assert_eq!(age_group_of(d(2007, 1, 1), today), "0-18");
        assert_eq!(age_group_of(d(2006, 1, 1), today), "19-30");
        assert_eq!(age_group_of(d(1995, 1, 1), today), "19-30");
        assert_eq!(age_group_of(d(1994, 1, 1), today), "31-45");
        assert_eq!(age_group_of(d(1980, 1, 1), today), "31-45");
        assert_eq!(age_group_of(d(1965, 12, 31), today), "46-60");
        assert_eq!(age_group_of(d(1964, 1, 1), today), "60+");
    }

    #[test]
    fn test_age_groups_keep_fixed_order_and_skip_unknown() {
        let today = d(2025, 6, 1);
        let rows = vec![
            row(d(2025, 3, 1), Some(d(1990, 5, 5)), None),
            row(d(2025, 3, 2), Some(d(1990, 5, 5)), None),
            row(d(2025, 3, 3), None, None),
            row(d(2025, 3, 4), Some(d(1950, 1, 1)), None),
        ];
        let out = age_groups(&rows, today);
        let labels: Vec<&str> = out.iter().map(|g| g.group.as_str()).collect();
        assert_eq!(labels, AGE_GROUPS.to_vec());
        assert_eq!(out[2].count, 2);
        assert_eq!(out[4].count, 1);
        assert_eq!(out.iter().map(|g| g.count).sum::<i64>(), 3);
    }

    #[test]
    fn test_gender_distribution() {
        let rows = vec![
            row(d(2025, 3, 1), None, Some(Gender::Male)),
            row(d(2025, 3, 1), None, Some(Gender::Female)),
            row(d(2025, 3, 1), None, Some(Gender::Female)),
            row(d(2025, 3, 1), None, None),
        ];
        assert_eq!(
            gender_distribution(&rows),
            GenderDistribution {
                male: 1,
                female: 2,
                unknown: 1
            }
        );
    }
}
