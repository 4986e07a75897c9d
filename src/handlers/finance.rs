use crate::models::*;
use crate::services::FinanceService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/admin/finance",
    tag = "finance",
    params(
        ("range" = Option<String>, Query, description = "month 或 year，默认 month"),
        ("start_date" = Option<String>, Query, description = "开始日期 (YYYY-MM-DD)"),
        ("end_date" = Option<String>, Query, description = "结束日期 (YYYY-MM-DD)"),
        ("type" = Option<String>, Query, description = "income 或 expense"),
        ("category" = Option<String>, Query, description = "course、coach_fee 或 other")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "财务记录与汇总", body = FinanceListResponse),
        (status = 400, description = "日期范围错误")
    )
)]
pub async fn list_finance_records(
    finance_service: web::Data<FinanceService>,
    query: web::Query<FinanceQuery>,
) -> Result<HttpResponse> {
    match finance_service.list_records(&query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/finance",
    tag = "finance",
    request_body = CreateFinanceRecordRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "添加财务记录成功", body = FinanceRecordResponse),
        (status = 400, description = "请求参数错误")
    )
)]
pub async fn create_finance_record(
    finance_service: web::Data<FinanceService>,
    request: web::Json<CreateFinanceRecordRequest>,
) -> Result<HttpResponse> {
    match finance_service.create_record(request.into_inner()).await {
        Ok(record) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": record
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/finance/{id}",
    tag = "finance",
    params(
        ("id" = i64, Path, description = "财务记录ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "删除财务记录成功"),
        (status = 404, description = "记录不存在")
    )
)]
pub async fn delete_finance_record(
    finance_service: web::Data<FinanceService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match finance_service.delete_record(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "记录已删除"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn finance_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/finance")
            .route("", web::get().to(list_finance_records))
            .route("", web::post().to(create_finance_record))
            .route("/{id}", web::delete().to(delete_finance_record)),
    );
}
