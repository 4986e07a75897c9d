use crate::database::DbPool;
use crate::entities::{FinanceCategory, FinanceType, finance_record_entity as fr};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::resolve_range;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
};

#[derive(Clone)]
pub struct FinanceService {
    pool: DbPool,
}

/// 按收支类型与分类汇总金额
pub fn summarize(records: &[fr::Model]) -> FinanceSummary {
    let mut s = FinanceSummary::default();
    for r in records {
        match (r.record_type, r.category) {
            (FinanceType::Income, category) => {
                s.total_income += r.amount;
                match category {
                    FinanceCategory::Course => s.course_income += r.amount,
                    FinanceCategory::Other => s.other_income += r.amount,
                    FinanceCategory::CoachFee => {}
                }
            }
            (FinanceType::Expense, category) => {
                s.total_expense += r.amount;
                match category {
                    FinanceCategory::CoachFee => s.coach_expense += r.amount,
                    FinanceCategory::Other => s.other_expense += r.amount,
                    FinanceCategory::Course => {}
                }
            }
        }
    }
    s.net = s.total_income - s.total_expense;
    s
}

impl FinanceService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn records_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        record_type: Option<FinanceType>,
        category: Option<FinanceCategory>,
    ) -> AppResult<Vec<fr::Model>> {
        let mut select = fr::Entity::find()
            .filter(fr::Column::DeletedAt.is_null())
            .filter(fr::Column::RecordDate.gte(start))
            .filter(fr::Column::RecordDate.lte(end));
        if let Some(t) = record_type {
            select = select.filter(fr::Column::RecordType.eq(t));
        }
        if let Some(c) = category {
            select = select.filter(fr::Column::Category.eq(c));
        }
        Ok(select
            .order_by_desc(fr::Column::RecordDate)
            .order_by_desc(fr::Column::Id)
            .all(self.pool.as_ref())
            .await?)
    }

    pub async fn list_records(&self, query: &FinanceQuery) -> AppResult<FinanceListResponse> {
        let today = Utc::now().date_naive();
        let (start_date, end_date) =
            resolve_range(query.range.to_date(today), query.start_date, query.end_date)?;

        let records = self
            .records_between(start_date, end_date, query.record_type, query.category)
            .await?;
        let summary = summarize(&records);

        Ok(FinanceListResponse {
            start_date,
            end_date,
            summary,
            records: records.into_iter().map(FinanceRecordResponse::from).collect(),
        })
    }

    /// 指定区间内的汇总（不分页、不过滤类型）
    pub async fn summary_between(&self, start: NaiveDate, end: NaiveDate) -> AppResult<FinanceSummary> {
        let records = self.records_between(start, end, None, None).await?;
        Ok(summarize(&records))
    }

    pub async fn create_record(
        &self,
        request: CreateFinanceRecordRequest,
    ) -> AppResult<FinanceRecordResponse> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::ValidationError("名称不能为空".to_string()));
        }
        if request.amount <= 0 {
            return Err(AppError::ValidationError("金额必须大于0".to_string()));
        }

        let record = fr::ActiveModel {
            record_type: Set(request.record_type),
            category: Set(request.category),
            name: Set(name.to_string()),
            amount: Set(request.amount),
            record_date: Set(request.record_date),
            ..Default::default()
        }
        .insert(self.pool.as_ref())
        .await?;

        log::info!(
            "Finance record {} added: {:?} {}",
            record.id,
            record.record_type,
            record.amount
        );
        Ok(FinanceRecordResponse::from(record))
    }

    /// 软删除：设置 deleted_at
    pub async fn delete_record(&self, record_id: i64) -> AppResult<()> {
        let record = fr::Entity::find_by_id(record_id)
            .filter(fr::Column::DeletedAt.is_null())
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::NotFound("Finance record not found".to_string()))?;
        let mut am = record.into_active_model();
        am.deleted_at = Set(Some(Utc::now()));
        am.update(self.pool.as_ref()).await?;
        log::info!("Finance record {record_id} deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn rec(record_type: FinanceType, category: FinanceCategory, amount: i64) -> fr::Model {
        fr::Model {
            id: 0,
            record_type,
            category,
            name: "x".to_string(),
            amount,
            record_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            created_at: None,
            deleted_at: None,
        }
    }

    #[test]
    fn test_summarize_by_type_and_category() {
        let records = vec![
            rec(FinanceType::Income, FinanceCategory::Course, 300000),
            rec(FinanceType::Income, FinanceCategory::Course, 120000),
            rec(FinanceType::Income, FinanceCategory::Other, 5000),
            rec(FinanceType::Expense, FinanceCategory::CoachFee, 45000),
            rec(FinanceType::Expense, FinanceCategory::Other, 200000),
        ];
        let s = summarize(&records);
        assert_eq!(s.total_income, 425000);
        assert_eq!(s.course_income, 420000);
        assert_eq!(s.other_income, 5000);
        assert_eq!(s.total_expense, 245000);
        assert_eq!(s.coach_expense, 45000);
        assert_eq!(s.other_expense, 200000);
        assert_eq!(s.net, 180000);
    }

    #[test]
    fn test_summarize_uncategorized_pairs_count_in_totals_only() {
        let records = vec![
            rec(FinanceType::Income, FinanceCategory::CoachFee, 100),
            rec(FinanceType::Expense, FinanceCategory::Course, 40),
        ];
        let s = summarize(&records);
        assert_eq!(s.total_income, 100);
        assert_eq!(s.total_expense, 40);
        assert_eq!(s.course_income + s.other_income, 0);
        assert_eq!(s.coach_expense + s.other_expense, 0);
        assert_eq!(s.net, 60);
    }

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize(&[]), FinanceSummary::default());
    }

    fn create_request(name: &str, amount: i64) -> CreateFinanceRecordRequest {
        CreateFinanceRecordRequest {
            record_type: FinanceType::Expense,
            category: FinanceCategory::Other,
            name: name.to_string(),
            amount,
            record_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_record_rejects_bad_input() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = FinanceService::new(Arc::new(db));

        let err = service.create_record(create_request("  ", 100)).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        let err = service.create_record(create_request("场地租金", 0)).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_create_record() {
        let mut stored = rec(FinanceType::Expense, FinanceCategory::Other, 500000);
        stored.id = 4;
        stored.name = "场地租金".to_string();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored]])
            .into_connection();
        let service = FinanceService::new(Arc::new(db));

        let out = service
            .create_record(create_request(" 场地租金 ", 500000))
            .await
            .unwrap();
        assert_eq!(out.id, 4);
        assert_eq!(out.amount, 500000);
    }

    #[tokio::test]
    async fn test_delete_record_soft_deletes() {
        let live = rec(FinanceType::Income, FinanceCategory::Course, 300000);
        let mut deleted = live.clone();
        deleted.deleted_at = Some(Utc::now());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![live]])
            .append_query_results([vec![deleted]])
            .into_connection();
        let service = FinanceService::new(Arc::new(db));
        assert!(service.delete_record(0).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_already_deleted_record_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<fr::Model>::new()])
            .into_connection();
        let service = FinanceService::new(Arc::new(db));

        let err = service.delete_record(4).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
