use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{FinanceCategory, FinanceType, Gender, UserRole};
use crate::handlers;
use crate::models::*;
use crate::utils::RangePreset;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::logout,
        handlers::dashboard::admin_dashboard,
        handlers::dashboard::member_dashboard,
        handlers::member::list_members,
        handlers::member::create_member,
        handlers::member::get_member,
        handlers::member::update_member,
        handlers::member::delete_member,
        handlers::member::list_purchases,
        handlers::member::add_purchase,
        handlers::member::renew_membership,
        handlers::coach::list_coaches,
        handlers::coach::create_coach,
        handlers::coach::delete_coach,
        handlers::class_record::list_class_records,
        handlers::class_record::record_class,
        handlers::finance::list_finance_records,
        handlers::finance::create_finance_record,
        handlers::finance::delete_finance_record,
        handlers::analytics::class_analytics,
    ),
    components(
        schemas(
            UserRole,
            Gender,
            FinanceType,
            FinanceCategory,
            RangePreset,
            LoginRequest,
            RefreshTokenRequest,
            SessionUser,
            AuthResponse,
            MemberResponse,
            MemberQuery,
            InitialPurchase,
            CreateMemberRequest,
            CreateMemberResponse,
            UpdateMemberRequest,
            CoursePurchaseResponse,
            CreateCoursePurchaseRequest,
            RenewMembershipRequest,
            PurchaseResultResponse,
            CoachResponse,
            CreateCoachRequest,
            CreateClassRecordRequest,
            ClassRecordResponse,
            CreateClassRecordResponse,
            ClassRecordQuery,
            FinanceRecordResponse,
            CreateFinanceRecordRequest,
            FinanceQuery,
            FinanceSummary,
            FinanceListResponse,
            AnalyticsQuery,
            PeriodCount,
            AgeGroupCount,
            GenderDistribution,
            AnalyticsResponse,
            AdminOverview,
            MemberDashboard,
            ApiError,
            ApiErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Authentication API"),
        (name = "dashboard", description = "Admin overview and member dashboard"),
        (name = "members", description = "Member and course purchase management"),
        (name = "coaches", description = "Coach management"),
        (name = "class_records", description = "Class attendance records"),
        (name = "finance", description = "Income and expense records"),
        (name = "analytics", description = "Class statistics"),
    ),
    info(
        title = "Gym Backend API",
        version = "1.0.0",
        description = "Gym studio membership management REST API"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_routes() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/auth/login"));
        assert!(paths.contains_key("/admin/members/{id}/renew"));
        assert!(paths.contains_key("/admin/class-records"));
        assert!(paths.contains_key("/member/dashboard"));
    }
}
