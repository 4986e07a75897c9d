use crate::config::MembershipConfig;
use crate::database::DbPool;
use crate::entities::{UserRole, course_purchase_entity as cp, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::credit_ledger::CreditGrant;
use crate::services::user_lookup::{
    ensure_phone_available, find_active_user, lock_active_user, map_phone_conflict, validate_name,
};
use crate::utils::*;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

/// 新会员的首次购课；未填有效期时使用配置的默认天数
fn initial_grant(
    purchase: &InitialPurchase,
    default_valid_days: i32,
    today: NaiveDate,
) -> AppResult<CreditGrant> {
    CreditGrant::purchase(
        purchase.amount,
        purchase.quantity,
        purchase.purchase_date.unwrap_or(today),
        purchase.valid_days.unwrap_or(default_valid_days),
    )
}

#[derive(Clone)]
pub struct MemberService {
    pool: DbPool,
    membership: MembershipConfig,
}

impl MemberService {
    pub fn new(pool: DbPool, membership: MembershipConfig) -> Self {
        Self { pool, membership }
    }

    /// 会员列表，支持按姓名/手机号搜索
    pub async fn list_members(
        &self,
        query: &MemberQuery,
    ) -> AppResult<PaginatedResponse<MemberResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);

        let mut select = users::Entity::find()
            .filter(users::Column::Role.eq(UserRole::Member))
            .filter(users::Column::DeletedAt.is_null());
        if let Some(keyword) = query.keyword.as_deref().map(str::trim)
            && !keyword.is_empty()
        {
            select = select.filter(
                Condition::any()
                    .add(users::Column::Name.contains(keyword))
                    .add(users::Column::Phone.contains(keyword)),
            );
        }

        let total = select.clone().count(self.pool.as_ref()).await? as i64;
        let models = select
            .order_by_asc(users::Column::Name)
            .order_by_asc(users::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(self.pool.as_ref())
            .await?;
        let items = models.into_iter().map(MemberResponse::from).collect();

        Ok(PaginatedResponse::new(items, &params, total))
    }

    pub async fn get_member(&self, member_id: i64) -> AppResult<MemberResponse> {
        let member = find_active_user(self.pool.as_ref(), member_id, UserRole::Member).await?;
        Ok(MemberResponse::from(member))
    }

    /// 新建会员；若带购课信息，会员与购课记录在同一事务内写入
    pub async fn create_member(&self, request: CreateMemberRequest) -> AppResult<CreateMemberResponse> {
        let name = validate_name(&request.name)?;
        let phone = normalize_cn_phone(&request.phone);
        validate_cn_phone(&phone)?;

        let password = match request.password {
            Some(p) => p,
            None => default_member_password(&phone),
        };
        validate_password(&password)?;
        let password_hash = hash_password(&password)?;

        // 先算好购课数据，校验失败时不开启事务
        let today = Utc::now().date_naive();
        let grant = request
            .initial_purchase
            .as_ref()
            .map(|p| initial_grant(p, self.membership.default_valid_days, today))
            .transpose()?;

        let txn = self.pool.begin().await?;
        ensure_phone_available(&txn, &phone, None).await?;

        let member = users::ActiveModel {
            name: Set(name),
            phone: Set(phone),
            password_hash: Set(Some(password_hash)),
            role: Set(UserRole::Member),
            gender: Set(request.gender),
            birth_date: Set(Some(request.birth_date)),
            remaining_classes: Set(grant.map(|g| g.quantity).unwrap_or(0)),
            expiry_date: Set(grant.map(|g| g.expiry_date)),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(map_phone_conflict)?;

        let purchase = match grant {
            Some(g) => Some(
                cp::ActiveModel {
                    user_id: Set(member.id),
                    amount: Set(g.amount),
                    quantity: Set(g.quantity),
                    purchase_date: Set(g.purchase_date),
                    valid_days: Set(g.valid_days),
                    expiry_date: Set(g.expiry_date),
                    ..Default::default()
                }
                .insert(&txn)
                .await?,
            ),
            None => None,
        };
        txn.commit().await?;

        log::info!(
            "Member {} created with {} classes",
            member.id,
            member.remaining_classes
        );
        Ok(CreateMemberResponse {
            member: MemberResponse::from(member),
            purchase: purchase.map(CoursePurchaseResponse::from),
        })
    }

    pub async fn update_member(
        &self,
        member_id: i64,
        request: UpdateMemberRequest,
    ) -> AppResult<MemberResponse> {
        if request.is_empty() {
            return Err(AppError::ValidationError("No fields to update".to_string()));
        }
        if let Some(rc) = request.remaining_classes
            && rc < 0
        {
            return Err(AppError::ValidationError("剩余课程数不能为负数".to_string()));
        }

        let txn = self.pool.begin().await?;
        let current = lock_active_user(&txn, member_id, UserRole::Member).await?;
        let previous_classes = current.remaining_classes;
        let mut am = current.into_active_model();

        if let Some(name) = &request.name {
            am.name = Set(validate_name(name)?);
        }
        if let Some(phone) = &request.phone {
            let phone = normalize_cn_phone(phone);
            validate_cn_phone(&phone)?;
            ensure_phone_available(&txn, &phone, Some(member_id)).await?;
            am.phone = Set(phone);
        }
        if let Some(birth_date) = request.birth_date {
            am.birth_date = Set(Some(birth_date));
        }
        if let Some(gender) = request.gender {
            am.gender = Set(Some(gender));
        }
        if let Some(rc) = request.remaining_classes {
            am.remaining_classes = Set(rc);
        }
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&txn).await.map_err(map_phone_conflict)?;
        txn.commit().await?;

        if updated.remaining_classes != previous_classes {
            log::info!(
                "Member {member_id} remaining classes manually adjusted: {previous_classes} -> {}",
                updated.remaining_classes
            );
        }
        Ok(MemberResponse::from(updated))
    }

    /// 软删除会员
    pub async fn delete_member(&self, member_id: i64) -> AppResult<()> {
        let member = find_active_user(self.pool.as_ref(), member_id, UserRole::Member).await?;
        let mut am = member.into_active_model();
        am.deleted_at = Set(Some(Utc::now()));
        am.update(self.pool.as_ref()).await?;
        log::info!("Member {member_id} deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn membership() -> MembershipConfig {
        MembershipConfig {
            default_valid_days: 365,
            renew_valid_days: 30,
        }
    }

    fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("num_items", Value::from(n))])
    }

    fn member(id: i64, remaining_classes: i32, expiry_date: Option<NaiveDate>) -> users::Model {
        users::Model {
            id,
            name: "张三".to_string(),
            phone: "13800138000".to_string(),
            password_hash: Some("hash".to_string()),
            role: UserRole::Member,
            gender: None,
            birth_date: Some(d(1990, 1, 1)),
            remaining_classes,
            expiry_date,
            created_at: None,
            updated_at: None,
            deleted_at: None,
        }
    }

    fn create_request(initial_purchase: Option<InitialPurchase>) -> CreateMemberRequest {
        CreateMemberRequest {
            name: "张三".to_string(),
            phone: "138-0013-8000".to_string(),
            birth_date: d(1990, 1, 1),
            gender: None,
            password: Some("secret1".to_string()),
            initial_purchase,
        }
    }

    #[test]
    fn test_initial_grant_uses_defaults() {
        let today = d(2025, 3, 1);
        let purchase = InitialPurchase {
            amount: 300000,
            quantity: 20,
            purchase_date: None,
            valid_days: None,
        };
        let grant = initial_grant(&purchase, 365, today).unwrap();
        assert_eq!(grant.purchase_date, today);
        assert_eq!(grant.valid_days, 365);
        assert_eq!(grant.expiry_date, today.checked_add_days(Days::new(365)).unwrap());
        assert_eq!(grant.quantity, 20);
    }

    #[test]
    fn test_initial_grant_keeps_explicit_values() {
        let purchase = InitialPurchase {
            amount: 100000,
            quantity: 5,
            purchase_date: Some(d(2025, 1, 10)),
            valid_days: Some(30),
        };
        let grant = initial_grant(&purchase, 365, d(2025, 3, 1)).unwrap();
        assert_eq!(grant.purchase_date, d(2025, 1, 10));
        assert_eq!(grant.expiry_date, d(2025, 2, 9));

        let bad = InitialPurchase {
            quantity: 0,
            ..purchase
        };
        assert!(initial_grant(&bad, 365, d(2025, 3, 1)).is_err());
    }

    #[tokio::test]
    async fn test_create_member_with_initial_purchase() {
        let purchase = cp::Model {
            id: 7,
            user_id: 1,
            amount: 300000,
            quantity: 20,
            purchase_date: d(2025, 3, 1),
            valid_days: 365,
            expiry_date: d(2026, 3, 1),
            created_at: None,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![count_row(0)]])
            .append_query_results([vec![member(1, 20, Some(d(2026, 3, 1)))]])
            .append_query_results([vec![purchase]])
            .into_connection();
        let service = MemberService::new(Arc::new(db), membership());

        let out = service
            .create_member(create_request(Some(InitialPurchase {
                amount: 300000,
                quantity: 20,
                purchase_date: Some(d(2025, 3, 1)),
                valid_days: None,
            })))
            .await
            .unwrap();
        assert_eq!(out.member.remaining_classes, 20);
        assert_eq!(out.member.expiry_date, Some(d(2026, 3, 1)));
        let purchase = out.purchase.unwrap();
        assert_eq!(purchase.quantity, 20);
        assert_eq!(purchase.expiry_date, d(2026, 3, 1));
    }

    #[tokio::test]
    async fn test_create_member_without_purchase() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![count_row(0)]])
            .append_query_results([vec![member(2, 0, None)]])
            .into_connection();
        let service = MemberService::new(Arc::new(db), membership());

        let out = service.create_member(create_request(None)).await.unwrap();
        assert_eq!(out.member.remaining_classes, 0);
        assert_eq!(out.member.expiry_date, None);
        assert!(out.purchase.is_none());
    }

    #[tokio::test]
    async fn test_create_member_with_taken_phone_is_conflict() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![count_row(1)]])
            .into_connection();
        let service = MemberService::new(Arc::new(db), membership());

        let err = service.create_member(create_request(None)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_member_rejects_invalid_phone() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = MemberService::new(Arc::new(db), membership());
        let mut request = create_request(None);
        request.phone = "13800138000x".to_string();

        let err = service.create_member(request).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_update_member_rejects_negative_classes() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = MemberService::new(Arc::new(db), membership());

        let err = service
            .update_member(
                1,
                UpdateMemberRequest {
                    remaining_classes: Some(-1),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let err = service
            .update_member(1, UpdateMemberRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_update_member_adjusts_classes() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![member(1, 3, None)]])
            .append_query_results([vec![member(1, 8, None)]])
            .into_connection();
        let service = MemberService::new(Arc::new(db), membership());

        let out = service
            .update_member(
                1,
                UpdateMemberRequest {
                    remaining_classes: Some(8),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(out.remaining_classes, 8);
    }

    #[tokio::test]
    async fn test_delete_member_soft_deletes() {
        let mut deleted = member(1, 3, None);
        deleted.deleted_at = Some(Utc::now());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![member(1, 3, None)]])
            .append_query_results([vec![deleted]])
            .into_connection();
        let service = MemberService::new(Arc::new(db), membership());
        assert!(service.delete_member(1).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_member_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<users::Model>::new()])
            .into_connection();
        let service = MemberService::new(Arc::new(db), membership());

        let err = service.delete_member(99).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
