use crate::database::DbPool;
use crate::entities::{UserRole, class_record_entity as cr, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::user_lookup::find_active_user;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::collections::HashMap;

#[derive(Clone)]
pub struct ClassRecordService {
    pool: DbPool,
}

/// 批量查出记录中涉及的会员与教练姓名
pub(crate) async fn load_user_names<C: ConnectionTrait>(
    conn: &C,
    records: &[cr::Model],
) -> AppResult<HashMap<i64, String>> {
    let mut ids: Vec<i64> = records
        .iter()
        .flat_map(|r| [r.user_id, r.coach_id])
        .collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = users::Entity::find()
        .filter(users::Column::Id.is_in(ids))
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(|u| (u.id, u.name)).collect())
}

pub(crate) fn annotate(records: Vec<cr::Model>, names: &HashMap<i64, String>) -> Vec<ClassRecordResponse> {
    records
        .into_iter()
        .map(|r| {
            let member_name = names.get(&r.user_id).cloned();
            let coach_name = names.get(&r.coach_id).cloned();
            ClassRecordResponse::from_model(r, member_name, coach_name)
        })
        .collect()
}

impl ClassRecordService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// 记录一次上课并扣减会员一节课；插入与扣减同一事务，余额不足时整体回滚
    pub async fn record_class(
        &self,
        request: CreateClassRecordRequest,
    ) -> AppResult<CreateClassRecordResponse> {
        if request.coach_fee <= 0 {
            return Err(AppError::ValidationError("教练费用必须大于0".to_string()));
        }
        let class_date = request
            .class_date
            .unwrap_or_else(|| Utc::now().date_naive());

        let txn = self.pool.begin().await?;
        let member = find_active_user(&txn, request.member_id, UserRole::Member).await?;
        let coach = find_active_user(&txn, request.coach_id, UserRole::Coach).await?;

        let res = users::Entity::update_many()
            .col_expr(
                users::Column::RemainingClasses,
                Expr::col(users::Column::RemainingClasses).sub(1),
            )
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(member.id))
            .filter(users::Column::RemainingClasses.gt(0))
            .exec(&txn)
            .await?;
        if res.rows_affected == 0 {
            txn.rollback().await?;
            log::warn!(
                "Class rejected for member {}: no remaining classes",
                member.id
            );
            return Err(AppError::InsufficientClasses);
        }

        let record = cr::ActiveModel {
            user_id: Set(member.id),
            coach_id: Set(coach.id),
            class_date: Set(class_date),
            coach_fee: Set(request.coach_fee),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let remaining_classes = users::Entity::find_by_id(member.id)
            .one(&txn)
            .await?
            .map(|u| u.remaining_classes)
            .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;
        txn.commit().await?;

        log::info!(
            "Class {} recorded: member {} with coach {} on {class_date}, {remaining_classes} left",
            record.id,
            member.id,
            coach.id
        );
        Ok(CreateClassRecordResponse {
            record: ClassRecordResponse::from_model(record, Some(member.name), Some(coach.name)),
            remaining_classes,
        })
    }

    pub async fn list_records(
        &self,
        query: &ClassRecordQuery,
    ) -> AppResult<PaginatedResponse<ClassRecordResponse>> {
        if let (Some(start), Some(end)) = (query.start_date, query.end_date)
            && start > end
        {
            return Err(AppError::ValidationError(
                "开始日期不能晚于结束日期".to_string(),
            ));
        }
        let params = PaginationParams::new(query.page, query.page_size);

        let mut select = cr::Entity::find();
        if let Some(member_id) = query.member_id {
            select = select.filter(cr::Column::UserId.eq(member_id));
        }
        if let Some(coach_id) = query.coach_id {
            select = select.filter(cr::Column::CoachId.eq(coach_id));
        }
        if let Some(start) = query.start_date {
            select = select.filter(cr::Column::ClassDate.gte(start));
        }
        if let Some(end) = query.end_date {
            select = select.filter(cr::Column::ClassDate.lte(end));
        }

        let total = select.clone().count(self.pool.as_ref()).await? as i64;
        let records = select
            .order_by_desc(cr::Column::ClassDate)
            .order_by_desc(cr::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(self.pool.as_ref())
            .await?;

        let names = load_user_names(self.pool.as_ref(), &records).await?;
        Ok(PaginatedResponse::new(annotate(records, &names), &params, total))
    }
}
