pub mod analytics;
pub mod auth;
pub mod class_record;
pub mod coach;
pub mod dashboard;
pub mod finance;
pub mod member;

pub use analytics::analytics_config;
pub use auth::auth_config;
pub use class_record::class_record_config;
pub use coach::coach_config;
pub use dashboard::{admin_dashboard_config, member_dashboard_config};
pub use finance::finance_config;
pub use member::member_config;
