use crate::models::*;
use crate::services::ClassRecordService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/admin/class-records",
    tag = "class_records",
    params(
        ("member_id" = Option<i64>, Query, description = "会员ID"),
        ("coach_id" = Option<i64>, Query, description = "教练ID"),
        ("start_date" = Option<String>, Query, description = "开始日期 (YYYY-MM-DD)"),
        ("end_date" = Option<String>, Query, description = "结束日期 (YYYY-MM-DD)"),
        ("page" = Option<i64>, Query, description = "页码"),
        ("page_size" = Option<i64>, Query, description = "每页数量")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "上课记录列表"),
        (status = 400, description = "日期范围错误")
    )
)]
pub async fn list_class_records(
    class_record_service: web::Data<ClassRecordService>,
    query: web::Query<ClassRecordQuery>,
) -> Result<HttpResponse> {
    match class_record_service.list_records(&query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/class-records",
    tag = "class_records",
    request_body = CreateClassRecordRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "记录上课成功", body = CreateClassRecordResponse),
        (status = 400, description = "请求参数错误"),
        (status = 404, description = "会员或教练不存在"),
        (status = 409, description = "剩余课时不足")
    )
)]
pub async fn record_class(
    class_record_service: web::Data<ClassRecordService>,
    request: web::Json<CreateClassRecordRequest>,
) -> Result<HttpResponse> {
    match class_record_service.record_class(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn class_record_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/class-records")
            .route("", web::get().to(list_class_records))
            .route("", web::post().to(record_class)),
    );
}
