use crate::middlewares::get_auth_user;
use crate::services::DashboardService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/admin/dashboard",
    tag = "dashboard",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "本月概况", body = AdminOverview),
        (status = 403, description = "需要管理员权限")
    )
)]
pub async fn admin_dashboard(
    dashboard_service: web::Data<DashboardService>,
) -> Result<HttpResponse> {
    match dashboard_service.admin_overview().await {
        Ok(overview) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": overview
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/member/dashboard",
    tag = "dashboard",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "会员首页数据", body = MemberDashboard),
        (status = 401, description = "未授权"),
        (status = 403, description = "需要会员身份")
    )
)]
pub async fn member_dashboard(
    dashboard_service: web::Data<DashboardService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user = match get_auth_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match dashboard_service.member_dashboard(user.id).await {
        Ok(dashboard) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": dashboard
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

// 挂在 /admin 下
pub fn admin_dashboard_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/dashboard", web::get().to(admin_dashboard));
}

// 挂在 /member 下
pub fn member_dashboard_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/dashboard", web::get().to(member_dashboard));
}
