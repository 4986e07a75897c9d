pub mod analytics;
pub mod auth;
pub mod class_record;
pub mod coach;
pub mod common;
pub mod course_purchase;
pub mod dashboard;
pub mod finance;
pub mod member;
pub mod pagination;

pub use analytics::*;
pub use auth::*;
pub use class_record::*;
pub use coach::*;
pub use common::*;
pub use course_purchase::*;
pub use dashboard::*;
pub use finance::*;
pub use member::*;
pub use pagination::*;
