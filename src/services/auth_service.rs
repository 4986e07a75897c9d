use crate::config::AdminConfig;
use crate::database::DbPool;
use crate::entities::{UserRole, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::user_lookup::map_phone_conflict;
use crate::utils::*;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

#[derive(Clone)]
pub struct AuthService {
    pool: DbPool,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(pool: DbPool, jwt_service: JwtService) -> Self {
        Self { pool, jwt_service }
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let phone = normalize_cn_phone(&request.phone);

        let user = users::Entity::find()
            .filter(users::Column::Phone.eq(phone))
            .filter(users::Column::DeletedAt.is_null())
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::AuthError("手机号或密码错误".to_string()))?;

        // 教练账号没有密码，不能登录
        let hash = user
            .password_hash
            .as_deref()
            .ok_or_else(|| AppError::AuthError("该账号不能登录".to_string()))?;
        if !verify_password(&request.password, hash)? {
            return Err(AppError::AuthError("手机号或密码错误".to_string()));
        }

        log::info!("User {} ({}) logged in", user.id, user.role);
        self.issue_tokens(user)
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        let claims = self.jwt_service.verify_refresh_token(refresh_token)?;
        let user_id = claims.user_id()?;

        let user = users::Entity::find_by_id(user_id)
            .filter(users::Column::DeletedAt.is_null())
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::AuthError("用户不存在".to_string()))?;

        self.issue_tokens(user)
    }

    fn issue_tokens(&self, user: users::Model) -> AppResult<AuthResponse> {
        let access_token = self.jwt_service.generate_access_token(user.id, user.role)?;
        let refresh_token = self.jwt_service.generate_refresh_token(user.id, user.role)?;

        Ok(AuthResponse {
            user: SessionUser::from(user),
            access_token,
            refresh_token,
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }

    /// 库中没有任何管理员时，按配置创建初始管理员；返回是否创建
    pub async fn ensure_admin(&self, admin: &AdminConfig) -> AppResult<bool> {
        let admins = users::Entity::find()
            .filter(users::Column::Role.eq(UserRole::Admin))
            .filter(users::Column::DeletedAt.is_null())
            .count(self.pool.as_ref())
            .await?;
        if admins > 0 {
            return Ok(false);
        }
        if !admin.is_configured() {
            log::warn!("No admin account exists and [admin] is not configured");
            return Ok(false);
        }

        let phone = normalize_cn_phone(&admin.phone);
        validate_cn_phone(&phone)?;
        validate_password(&admin.password)?;

        let name = if admin.name.trim().is_empty() {
            "管理员".to_string()
        } else {
            admin.name.trim().to_string()
        };

        let created = users::ActiveModel {
            name: Set(name),
            phone: Set(phone),
            password_hash: Set(Some(hash_password(&admin.password)?)),
            role: Set(UserRole::Admin),
            remaining_classes: Set(0),
            ..Default::default()
        }
        .insert(self.pool.as_ref())
        .await
        .map_err(map_phone_conflict)?;

        log::info!("Bootstrap admin account created: id={}", created.id);
        Ok(true)
    }
}
