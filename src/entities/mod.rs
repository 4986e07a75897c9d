pub mod class_records;
pub mod course_purchases;
pub mod finance_records;
pub mod users;

pub use class_records as class_record_entity;
pub use course_purchases as course_purchase_entity;
pub use finance_records as finance_record_entity;
pub use users as user_entity;

pub use finance_records::{FinanceCategory, FinanceType};
pub use users::{Gender, UserRole};
