use crate::database::DbPool;
use crate::entities::{
    UserRole, class_record_entity as cr, course_purchase_entity as cp, user_entity as users,
};
use crate::error::AppResult;
use crate::models::*;
use crate::services::FinanceService;
use crate::services::class_record_service::{annotate, load_user_names};
use crate::services::user_lookup::find_active_user;
use crate::utils::RangePreset;
use chrono::Utc;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

#[derive(Clone)]
pub struct DashboardService {
    pool: DbPool,
    finance_service: FinanceService,
}

impl DashboardService {
    pub fn new(pool: DbPool, finance_service: FinanceService) -> Self {
        Self {
            pool,
            finance_service,
        }
    }

    async fn count_role(&self, role: UserRole) -> AppResult<i64> {
        let n = users::Entity::find()
            .filter(users::Column::Role.eq(role))
            .filter(users::Column::DeletedAt.is_null())
            .count(self.pool.as_ref())
            .await?;
        Ok(n as i64)
    }

    /// 管理后台首页的本月概况
    pub async fn admin_overview(&self) -> AppResult<AdminOverview> {
        let today = Utc::now().date_naive();
        let (month_start, month_end) = RangePreset::Month.to_date(today);

        let classes_this_month = cr::Entity::find()
            .filter(cr::Column::ClassDate.gte(month_start))
            .filter(cr::Column::ClassDate.lte(month_end))
            .count(self.pool.as_ref())
            .await? as i64;
        let summary = self
            .finance_service
            .summary_between(month_start, month_end)
            .await?;

        Ok(AdminOverview {
            member_count: self.count_role(UserRole::Member).await?,
            coach_count: self.count_role(UserRole::Coach).await?,
            classes_this_month,
            income_this_month: summary.total_income,
            expense_this_month: summary.total_expense,
        })
    }

    /// 会员端首页：个人信息、上课记录、购课记录
    pub async fn member_dashboard(&self, member_id: i64) -> AppResult<MemberDashboard> {
        let member = find_active_user(self.pool.as_ref(), member_id, UserRole::Member).await?;

        let records = cr::Entity::find()
            .filter(cr::Column::UserId.eq(member_id))
            .order_by_desc(cr::Column::ClassDate)
            .order_by_desc(cr::Column::Id)
            .all(self.pool.as_ref())
            .await?;
        let names = load_user_names(self.pool.as_ref(), &records).await?;

        let purchases = cp::Entity::find()
            .filter(cp::Column::UserId.eq(member_id))
            .order_by_desc(cp::Column::PurchaseDate)
            .order_by_desc(cp::Column::Id)
            .all(self.pool.as_ref())
            .await?;
        let current_expiry = purchases.first().map(|p| p.expiry_date);

        Ok(MemberDashboard {
            profile: MemberResponse::from(member),
            current_expiry,
            class_records: annotate(records, &names),
            purchases: purchases
                .into_iter()
                .map(CoursePurchaseResponse::from)
                .collect(),
        })
    }
}
