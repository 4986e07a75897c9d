use crate::models::*;
use crate::services::AnalyticsService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/admin/analytics",
    tag = "analytics",
    params(
        ("member_id" = Option<i64>, Query, description = "只统计某个会员"),
        ("range" = Option<String>, Query, description = "month 按天统计，year 按月统计"),
        ("start_date" = Option<String>, Query, description = "开始日期 (YYYY-MM-DD)"),
        ("end_date" = Option<String>, Query, description = "结束日期 (YYYY-MM-DD)")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "上课统计", body = AnalyticsResponse),
        (status = 400, description = "日期范围错误")
    )
)]
pub async fn class_analytics(
    analytics_service: web::Data<AnalyticsService>,
    query: web::Query<AnalyticsQuery>,
) -> Result<HttpResponse> {
    match analytics_service.class_analytics(&query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn analytics_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/analytics", web::get().to(class_analytics));
}
