pub mod date_range;
pub mod jwt;
pub mod password;
pub mod phone;

pub use date_range::*;
pub use jwt::*;
pub use password::*;
pub use phone::*;
