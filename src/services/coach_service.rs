use crate::database::DbPool;
use crate::entities::{UserRole, user_entity as users};
use crate::error::AppResult;
use crate::models::*;
use crate::services::user_lookup::{
    ensure_phone_available, find_active_user, map_phone_conflict, validate_name,
};
use crate::utils::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

#[derive(Clone)]
pub struct CoachService {
    pool: DbPool,
}

impl CoachService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn list_coaches(&self) -> AppResult<Vec<CoachResponse>> {
        let rows = users::Entity::find()
            .filter(users::Column::Role.eq(UserRole::Coach))
            .filter(users::Column::DeletedAt.is_null())
            .order_by_desc(users::Column::CreatedAt)
            .all(self.pool.as_ref())
            .await?;
        Ok(rows.into_iter().map(CoachResponse::from).collect())
    }

    pub async fn create_coach(&self, request: CreateCoachRequest) -> AppResult<CoachResponse> {
        let name = validate_name(&request.name)?;
        let phone = normalize_cn_phone(&request.phone);
        validate_cn_phone(&phone)?;

        let txn = self.pool.begin().await?;
        ensure_phone_available(&txn, &phone, None).await?;
        // 教练没有登录密码
        let coach = users::ActiveModel {
            name: Set(name),
            phone: Set(phone),
            password_hash: Set(None),
            role: Set(UserRole::Coach),
            remaining_classes: Set(0),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(map_phone_conflict)?;
        txn.commit().await?;

        log::info!("Coach {} created", coach.id);
        Ok(CoachResponse::from(coach))
    }

    /// 软删除；历史上课记录仍保留教练引用
    pub async fn delete_coach(&self, coach_id: i64) -> AppResult<()> {
        let coach = find_active_user(self.pool.as_ref(), coach_id, UserRole::Coach).await?;
        let mut am = coach.into_active_model();
        am.deleted_at = Set(Some(Utc::now()));
        am.update(self.pool.as_ref()).await?;
        log::info!("Coach {coach_id} deleted");
        Ok(())
    }
}
