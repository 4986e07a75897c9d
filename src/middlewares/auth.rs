use crate::entities::UserRole;
use crate::error::{AppError, AppResult};
use crate::utils::JwtService;
use actix_web::http::Method;
use actix_web::{
    Error, HttpMessage, HttpRequest,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

/// 已通过认证的调用者，由中间件写入请求扩展
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub role: UserRole,
}

// 公开路径配置
struct PublicPaths {
    exact_paths: Vec<&'static str>,
    prefix_paths: Vec<&'static str>,
}

impl PublicPaths {
    fn new() -> Self {
        Self {
            // 完全匹配的公开路径
            exact_paths: vec![
                "/swagger-ui",
                "/api-docs/openapi.json",
                "/api/v1/auth/login",
                "/api/v1/auth/refresh",
                "/api/v1/auth/logout",
            ],
            // 前缀匹配的公开路径
            prefix_paths: vec!["/swagger-ui/", "/api-docs/"],
        }
    }

    fn is_public_path(&self, path: &str) -> bool {
        if self.exact_paths.contains(&path) {
            return true;
        }

        self.prefix_paths
            .iter()
            .any(|&prefix| path.starts_with(prefix))
    }
}

pub struct AuthMiddleware {
    jwt_service: JwtService,
}

impl AuthMiddleware {
    pub fn new(jwt_service: JwtService) -> Self {
        Self { jwt_service }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            jwt_service: self.jwt_service.clone(),
            public_paths: PublicPaths::new(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    jwt_service: JwtService,
    public_paths: PublicPaths,
}

impl<S> AuthMiddlewareService<S> {
    fn authenticate(&self, req: &ServiceRequest) -> AppResult<AuthUser> {
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| AppError::AuthError("Missing access token".to_string()))?;

        let claims = self
            .jwt_service
            .verify_access_token(token)
            .map_err(|_| AppError::AuthError("Invalid access token".to_string()))?;
        Ok(AuthUser {
            id: claims.user_id()?,
            role: claims.role,
        })
    }
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // 放行所有 CORS 预检请求
        if req.method() == Method::OPTIONS || self.public_paths.is_public_path(req.path()) {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        match self.authenticate(&req) {
            Ok(user) => {
                req.extensions_mut().insert(user);
                let fut = self.service.call(req);
                Box::pin(fut)
            }
            Err(error) => Box::pin(async move { Err(error.into()) }),
        }
    }
}

/// 在处理函数中读取当前用户
pub fn get_auth_user(req: &HttpRequest) -> AppResult<AuthUser> {
    req.extensions()
        .get::<AuthUser>()
        .copied()
        .ok_or_else(|| AppError::AuthError("Missing access token".to_string()))
}

/// 路由匹配后按作用域校验角色，包在 `/admin`、`/member` 作用域上
pub struct RequireRole {
    role: UserRole,
}

impl RequireRole {
    pub fn new(role: UserRole) -> Self {
        Self { role }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleService {
            service,
            role: self.role,
        }))
    }
}

pub struct RequireRoleService<S> {
    service: S,
    role: UserRole,
}

impl<S, B> Service<ServiceRequest> for RequireRoleService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let user = req.extensions().get::<AuthUser>().copied();
        match user {
            Some(user) if user.role == self.role => Box::pin(self.service.call(req)),
            Some(user) => {
                log::warn!(
                    "User {} with role {} denied {} (requires {})",
                    user.id,
                    user.role,
                    req.path(),
                    self.role
                );
                Box::pin(async move { Err(AppError::Forbidden.into()) })
            }
            None => {
                let error = AppError::AuthError("Missing access token".to_string());
                Box::pin(async move { Err(error.into()) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use actix_web::{App, HttpResponse, web};

    fn jwt() -> JwtService {
        JwtService::new("middleware-secret", 3600, 86400)
    }

    fn bearer(user_id: i64, role: UserRole) -> (&'static str, String) {
        let token = jwt().generate_access_token(user_id, role).unwrap();
        ("Authorization", format!("Bearer {}", token))
    }

    async fn whoami(req: HttpRequest) -> HttpResponse {
        match get_auth_user(&req) {
            Ok(user) => HttpResponse::Ok().body(user.id.to_string()),
            Err(_) => HttpResponse::Ok().body("anonymous"),
        }
    }

    #[test]
    fn test_public_paths() {
        let paths = PublicPaths::new();
        assert!(paths.is_public_path("/api/v1/auth/login"));
        assert!(paths.is_public_path("/api/v1/auth/refresh"));
        assert!(paths.is_public_path("/swagger-ui/index.html"));
        assert!(paths.is_public_path("/api-docs/openapi.json"));
        assert!(!paths.is_public_path("/api/v1/admin/members"));
        assert!(!paths.is_public_path("/api/v1/auth/login/extra"));
    }

    // 与 main.rs 相同的作用域结构
    macro_rules! app {
        () => {
            actix_test::init_service(
                App::new().wrap(AuthMiddleware::new(jwt())).service(
                    web::scope("/api/v1")
                        .route("/auth/login", web::post().to(whoami))
                        .service(
                            web::scope("/admin")
                                .wrap(RequireRole::new(UserRole::Admin))
                                .route("/members", web::get().to(whoami)),
                        )
                        .service(
                            web::scope("/member")
                                .wrap(RequireRole::new(UserRole::Member))
                                .route("/dashboard", web::get().to(whoami)),
                        ),
                ),
            )
            .await
        };
    }

    fn status_of(err: &Error) -> StatusCode {
        err.as_response_error().status_code()
    }

    #[actix_web::test]
    async fn test_public_path_skips_auth() {
        let app = app!();
        let req = actix_test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = actix_test::read_body(resp).await;
        assert_eq!(body, "anonymous");
    }

    #[actix_web::test]
    async fn test_missing_token_is_rejected() {
        let app = app!();
        let req = actix_test::TestRequest::get()
            .uri("/api/v1/admin/members")
            .to_request();
        let err = actix_test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(status_of(&err), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_invalid_token_is_rejected() {
        let app = app!();
        let req = actix_test::TestRequest::get()
            .uri("/api/v1/admin/members")
            .insert_header(("Authorization", "Bearer not-a-token"))
            .to_request();
        let err = actix_test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(status_of(&err), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_refresh_token_cannot_access_api() {
        let app = app!();
        let token = jwt().generate_refresh_token(1, UserRole::Admin).unwrap();
        let req = actix_test::TestRequest::get()
            .uri("/api/v1/admin/members")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let err = actix_test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(status_of(&err), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_wrong_role_is_forbidden() {
        let app = app!();
        let req = actix_test::TestRequest::get()
            .uri("/api/v1/admin/members")
            .insert_header(bearer(5, UserRole::Member))
            .to_request();
        let err = actix_test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(status_of(&err), StatusCode::FORBIDDEN);

        let req = actix_test::TestRequest::get()
            .uri("/api/v1/member/dashboard")
            .insert_header(bearer(1, UserRole::Admin))
            .to_request();
        let err = actix_test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(status_of(&err), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_percent_encoded_admin_path_still_requires_admin() {
        let app = app!();
        let req = actix_test::TestRequest::get()
            .uri("/api/v1/%61dmin/members")
            .insert_header(bearer(5, UserRole::Member))
            .to_request();
        let err = actix_test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(status_of(&err), StatusCode::FORBIDDEN);

        let req = actix_test::TestRequest::get()
            .uri("/api/v1/%61dmin/members")
            .insert_header(bearer(1, UserRole::Admin))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_valid_token_reaches_handler() {
        let app = app!();
        let req = actix_test::TestRequest::get()
            .uri("/api/v1/member/dashboard")
            .insert_header(bearer(9, UserRole::Member))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = actix_test::read_body(resp).await;
        assert_eq!(body, "9");
    }
}
