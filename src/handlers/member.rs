use crate::models::*;
use crate::services::{CourseService, MemberService};
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/admin/members",
    tag = "members",
    params(
        ("keyword" = Option<String>, Query, description = "按姓名或手机号搜索"),
        ("page" = Option<i64>, Query, description = "页码"),
        ("page_size" = Option<i64>, Query, description = "每页数量")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "会员列表"),
        (status = 401, description = "未授权"),
        (status = 403, description = "需要管理员权限")
    )
)]
pub async fn list_members(
    member_service: web::Data<MemberService>,
    query: web::Query<MemberQuery>,
) -> Result<HttpResponse> {
    match member_service.list_members(&query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/members",
    tag = "members",
    request_body = CreateMemberRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "创建会员成功", body = CreateMemberResponse),
        (status = 400, description = "请求参数错误"),
        (status = 409, description = "手机号已被使用")
    )
)]
pub async fn create_member(
    member_service: web::Data<MemberService>,
    request: web::Json<CreateMemberRequest>,
) -> Result<HttpResponse> {
    match member_service.create_member(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/members/{id}",
    tag = "members",
    params(
        ("id" = i64, Path, description = "会员ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "会员详情", body = MemberResponse),
        (status = 404, description = "会员不存在")
    )
)]
pub async fn get_member(
    member_service: web::Data<MemberService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match member_service.get_member(path.into_inner()).await {
        Ok(member) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": member
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/members/{id}",
    tag = "members",
    params(
        ("id" = i64, Path, description = "会员ID")
    ),
    request_body = UpdateMemberRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "更新会员成功", body = MemberResponse),
        (status = 400, description = "请求参数错误"),
        (status = 404, description = "会员不存在"),
        (status = 409, description = "手机号已被使用")
    )
)]
pub async fn update_member(
    member_service: web::Data<MemberService>,
    path: web::Path<i64>,
    request: web::Json<UpdateMemberRequest>,
) -> Result<HttpResponse> {
    match member_service
        .update_member(path.into_inner(), request.into_inner())
        .await
    {
        Ok(member) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": member
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/members/{id}",
    tag = "members",
    params(
        ("id" = i64, Path, description = "会员ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "删除会员成功"),
        (status = 404, description = "会员不存在")
    )
)]
pub async fn delete_member(
    member_service: web::Data<MemberService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match member_service.delete_member(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "会员已删除"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/members/{id}/purchases",
    tag = "members",
    params(
        ("id" = i64, Path, description = "会员ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "购课记录", body = [CoursePurchaseResponse]),
        (status = 404, description = "会员不存在")
    )
)]
pub async fn list_purchases(
    course_service: web::Data<CourseService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match course_service.list_purchases(path.into_inner()).await {
        Ok(purchases) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": purchases
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/members/{id}/purchases",
    tag = "members",
    params(
        ("id" = i64, Path, description = "会员ID")
    ),
    request_body = CreateCoursePurchaseRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "购课成功", body = PurchaseResultResponse),
        (status = 400, description = "请求参数错误"),
        (status = 404, description = "会员不存在")
    )
)]
pub async fn add_purchase(
    course_service: web::Data<CourseService>,
    path: web::Path<i64>,
    request: web::Json<CreateCoursePurchaseRequest>,
) -> Result<HttpResponse> {
    match course_service
        .add_purchase(path.into_inner(), request.into_inner())
        .await
    {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": result
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/members/{id}/renew",
    tag = "members",
    params(
        ("id" = i64, Path, description = "会员ID")
    ),
    request_body = RenewMembershipRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "续费成功", body = PurchaseResultResponse),
        (status = 400, description = "请求参数错误"),
        (status = 404, description = "会员不存在")
    )
)]
pub async fn renew_membership(
    course_service: web::Data<CourseService>,
    path: web::Path<i64>,
    request: web::Json<RenewMembershipRequest>,
) -> Result<HttpResponse> {
    match course_service
        .renew(path.into_inner(), request.into_inner())
        .await
    {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": result
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn member_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/members")
            .route("", web::get().to(list_members))
            .route("", web::post().to(create_member))
            .route("/{id}", web::get().to(get_member))
            .route("/{id}", web::put().to(update_member))
            .route("/{id}", web::delete().to(delete_member))
            .route("/{id}/purchases", web::get().to(list_purchases))
            .route("/{id}/purchases", web::post().to(add_purchase))
            .route("/{id}/renew", web::post().to(renew_membership)),
    );
}
