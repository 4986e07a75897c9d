use crate::config::MembershipConfig;
use crate::database::DbPool;
use crate::entities::{UserRole, course_purchase_entity as cp, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::credit_ledger::{self, CreditGrant};
use crate::services::user_lookup::{find_active_user, lock_active_user};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

#[derive(Clone)]
pub struct CourseService {
    pool: DbPool,
    membership: MembershipConfig,
}

impl CourseService {
    pub fn new(pool: DbPool, membership: MembershipConfig) -> Self {
        Self { pool, membership }
    }

    /// 会员的购课记录，按购买日期倒序
    pub async fn list_purchases(&self, member_id: i64) -> AppResult<Vec<CoursePurchaseResponse>> {
        find_active_user(self.pool.as_ref(), member_id, UserRole::Member).await?;
        let rows = cp::Entity::find()
            .filter(cp::Column::UserId.eq(member_id))
            .order_by_desc(cp::Column::PurchaseDate)
            .order_by_desc(cp::Column::Id)
            .all(self.pool.as_ref())
            .await?;
        Ok(rows.into_iter().map(CoursePurchaseResponse::from).collect())
    }

    /// 添加购课：写入购课记录、增加剩余课程、顺延有效期
    pub async fn add_purchase(
        &self,
        member_id: i64,
        request: CreateCoursePurchaseRequest,
    ) -> AppResult<PurchaseResultResponse> {
        let purchase_date = request
            .purchase_date
            .unwrap_or_else(|| Utc::now().date_naive());
        let grant = CreditGrant::purchase(
            request.amount,
            request.quantity,
            purchase_date,
            request.valid_days,
        )?;

        let result = self.grant(member_id, grant).await?;
        log::info!(
            "Course purchase {} for member {member_id}: +{} classes, expires {}",
            result.purchase.id,
            result.purchase.quantity,
            result.purchase.expiry_date
        );
        Ok(result)
    }

    /// 续费：从今天起按续费窗口计算有效期，并增加课程
    pub async fn renew(
        &self,
        member_id: i64,
        request: RenewMembershipRequest,
    ) -> AppResult<PurchaseResultResponse> {
        if request.classes <= 0 {
            return Err(AppError::ValidationError("续费课程数必须大于0".to_string()));
        }
        if request.amount < 0 {
            return Err(AppError::ValidationError("续费金额不能为负数".to_string()));
        }
        let today = Utc::now().date_naive();
        let valid_days = self.membership.renew_valid_days;
        let expiry_date = credit_ledger::renewal_expiry(today, valid_days)?;

        let result = self
            .grant(
                member_id,
                CreditGrant {
                    amount: request.amount,
                    quantity: request.classes,
                    purchase_date: today,
                    valid_days,
                    expiry_date,
                },
            )
            .await?;
        log::info!(
            "Member {member_id} renewed: +{} classes, expires {}",
            request.classes,
            result.member.expiry_date.unwrap_or(expiry_date)
        );
        Ok(result)
    }

    async fn grant(&self, member_id: i64, grant: CreditGrant) -> AppResult<PurchaseResultResponse> {
        let txn = self.pool.begin().await?;
        let member = lock_active_user(&txn, member_id, UserRole::Member).await?;

        let new_balance = credit_ledger::credit_after_purchase(member.remaining_classes, grant.quantity)?;
        let new_expiry = credit_ledger::merge_expiry(member.expiry_date, grant.expiry_date);

        let purchase = cp::ActiveModel {
            user_id: Set(member_id),
            amount: Set(grant.amount),
            quantity: Set(grant.quantity),
            purchase_date: Set(grant.purchase_date),
            valid_days: Set(grant.valid_days),
            expiry_date: Set(grant.expiry_date),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut am: users::ActiveModel = member.into_active_model();
        am.remaining_classes = Set(new_balance);
        am.expiry_date = Set(Some(new_expiry));
        am.updated_at = Set(Some(Utc::now()));
        let member = am.update(&txn).await?;

        txn.commit().await?;
        Ok(PurchaseResultResponse {
            purchase: CoursePurchaseResponse::from(purchase),
            member: MemberResponse::from(member),
        })
    }
}
