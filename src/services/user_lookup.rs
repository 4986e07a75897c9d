use crate::entities::{UserRole, user_entity as users};
use crate::error::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect,
    SqlErr,
};

fn role_label(role: UserRole) -> &'static str {
    match role {
        UserRole::Admin => "Admin",
        UserRole::Member => "Member",
        UserRole::Coach => "Coach",
    }
}

/// 查找未删除且角色匹配的用户
pub async fn find_active_user<C: ConnectionTrait>(
    conn: &C,
    id: i64,
    role: UserRole,
) -> AppResult<users::Model> {
    users::Entity::find_by_id(id)
        .filter(users::Column::Role.eq(role))
        .filter(users::Column::DeletedAt.is_null())
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} not found", role_label(role))))
}

/// 同 [`find_active_user`]，但对该行加 `FOR UPDATE` 锁，需在事务内调用
pub async fn lock_active_user<C: ConnectionTrait>(
    conn: &C,
    id: i64,
    role: UserRole,
) -> AppResult<users::Model> {
    users::Entity::find_by_id(id)
        .filter(users::Column::Role.eq(role))
        .filter(users::Column::DeletedAt.is_null())
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} not found", role_label(role))))
}

/// 手机号在未删除用户中必须唯一；`exclude_id` 用于编辑自身时排除
pub async fn ensure_phone_available<C: ConnectionTrait>(
    conn: &C,
    phone: &str,
    exclude_id: Option<i64>,
) -> AppResult<()> {
    let mut query = users::Entity::find()
        .filter(users::Column::Phone.eq(phone))
        .filter(users::Column::DeletedAt.is_null());
    if let Some(id) = exclude_id {
        query = query.filter(users::Column::Id.ne(id));
    }
    if query.count(conn).await? > 0 {
        return Err(AppError::Conflict("该手机号已被注册".to_string()));
    }
    Ok(())
}

fn is_unique_violation(sql_err: Option<SqlErr>) -> bool {
    matches!(sql_err, Some(SqlErr::UniqueConstraintViolation(_)))
}

/// 写入 users 时的错误转换：并发写入撞上手机号唯一索引时返回 409 而不是 500
pub fn map_phone_conflict(err: DbErr) -> AppError {
    if is_unique_violation(err.sql_err()) {
        AppError::Conflict("该手机号已被注册".to_string())
    } else {
        AppError::DatabaseError(err)
    }
}

pub fn validate_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::ValidationError("姓名不能为空".to_string()));
    }
    if name.chars().count() > 64 {
        return Err(AppError::ValidationError("姓名不能超过64个字符".to_string()));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("  张三 ").unwrap(), "张三");
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_unique_violation_detection() {
        assert!(is_unique_violation(Some(SqlErr::UniqueConstraintViolation(
            "duplicate key value violates unique constraint \"uq_users_phone_active\"".to_string()
        ))));
        assert!(!is_unique_violation(Some(SqlErr::ForeignKeyConstraintViolation(
            "class_records_user_id_fkey".to_string()
        ))));
        assert!(!is_unique_violation(None));
    }

    #[test]
    fn test_other_db_errors_stay_database_errors() {
        let err = map_phone_conflict(DbErr::Custom("connection reset".to_string()));
        assert!(matches!(err, AppError::DatabaseError(_)));
    }
}
