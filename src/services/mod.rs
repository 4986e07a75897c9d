pub mod analytics_service;
pub mod auth_service;
pub mod class_record_service;
pub mod coach_service;
pub mod course_service;
pub mod credit_ledger;
pub mod dashboard_service;
pub mod finance_service;
pub mod member_service;
pub mod user_lookup;

pub use analytics_service::AnalyticsService;
pub use auth_service::AuthService;
pub use class_record_service::ClassRecordService;
pub use coach_service::CoachService;
pub use course_service::CourseService;
pub use dashboard_service::DashboardService;
pub use finance_service::FinanceService;
pub use member_service::MemberService;
