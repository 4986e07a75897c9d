use crate::models::*;
use crate::services::CoachService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/admin/coaches",
    tag = "coaches",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "教练列表", body = [CoachResponse]),
        (status = 403, description = "需要管理员权限")
    )
)]
pub async fn list_coaches(coach_service: web::Data<CoachService>) -> Result<HttpResponse> {
    match coach_service.list_coaches().await {
        Ok(coaches) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": coaches
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/coaches",
    tag = "coaches",
    request_body = CreateCoachRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "添加教练成功", body = CoachResponse),
        (status = 400, description = "请求参数错误"),
        (status = 409, description = "手机号已被使用")
    )
)]
pub async fn create_coach(
    coach_service: web::Data<CoachService>,
    request: web::Json<CreateCoachRequest>,
) -> Result<HttpResponse> {
    match coach_service.create_coach(request.into_inner()).await {
        Ok(coach) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": coach
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/coaches/{id}",
    tag = "coaches",
    params(
        ("id" = i64, Path, description = "教练ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "删除教练成功"),
        (status = 404, description = "教练不存在")
    )
)]
pub async fn delete_coach(
    coach_service: web::Data<CoachService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match coach_service.delete_coach(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "教练已删除"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn coach_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/coaches")
            .route("", web::get().to(list_coaches))
            .route("", web::post().to(create_coach))
            .route("/{id}", web::delete().to(delete_coach)),
    );
}
