//! Course-credit bookkeeping rules.
//!
//! A member's balance (`remaining_classes`) only moves through these
//! functions: purchases and renewals add credits, each attended class
//! consumes one. Services apply the results inside a database transaction.

use crate::error::{AppError, AppResult};
use chrono::{Days, NaiveDate};

/// 校验购课参数：金额、课程数量、有效期都必须大于0
pub fn validate_purchase(amount: i64, quantity: i32, valid_days: i32) -> AppResult<()> {
    if amount <= 0 || quantity <= 0 || valid_days <= 0 {
        return Err(AppError::ValidationError(
            "金额、课程数量和有效期必须大于0".to_string(),
        ));
    }
    Ok(())
}

/// 到期日 = 购买日期 + 有效天数
pub fn compute_expiry(purchase_date: NaiveDate, valid_days: i32) -> AppResult<NaiveDate> {
    if valid_days <= 0 {
        return Err(AppError::ValidationError("有效期必须大于0".to_string()));
    }
    purchase_date
        .checked_add_days(Days::new(valid_days as u64))
        .ok_or_else(|| AppError::ValidationError("有效期超出范围".to_string()))
}

/// 续费后的到期日：从今天起算续费窗口
pub fn renewal_expiry(today: NaiveDate, renew_valid_days: i32) -> AppResult<NaiveDate> {
    compute_expiry(today, renew_valid_days)
}

pub fn credit_after_purchase(balance: i32, quantity: i32) -> AppResult<i32> {
    if quantity <= 0 {
        return Err(AppError::ValidationError("课程数量必须大于0".to_string()));
    }
    balance
        .checked_add(quantity)
        .ok_or_else(|| AppError::ValidationError("剩余课程数超出范围".to_string()))
}

pub fn credit_after_class(balance: i32) -> AppResult<i32> {
    if balance <= 0 {
        return Err(AppError::InsufficientClasses);
    }
    Ok(balance - 1)
}

/// 会员的有效期只会向后推，不会因为补录较早的购课而提前
pub fn merge_expiry(current: Option<NaiveDate>, new_expiry: NaiveDate) -> NaiveDate {
    match current {
        Some(cur) if cur > new_expiry => cur,
        _ => new_expiry,
    }
}

/// 一次加课：金额、课程数、购买日期、有效期、到期日
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreditGrant {
    pub amount: i64,
    pub quantity: i32,
    pub purchase_date: NaiveDate,
    pub valid_days: i32,
    pub expiry_date: NaiveDate,
}

impl CreditGrant {
    /// 普通购课，校验参数并算出到期日
    pub fn purchase(
        amount: i64,
        quantity: i32,
        purchase_date: NaiveDate,
        valid_days: i32,
    ) -> AppResult<Self> {
        validate_purchase(amount, quantity, valid_days)?;
        Ok(Self {
            amount,
            quantity,
            purchase_date,
            valid_days,
            expiry_date: compute_expiry(purchase_date, valid_days)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_compute_expiry() {
        assert_eq!(compute_expiry(d(2025, 1, 1), 30).unwrap(), d(2025, 1, 31));
        assert_eq!(compute_expiry(d(2024, 2, 28), 1).unwrap(), d(2024, 2, 29));
        assert_eq!(compute_expiry(d(2025, 3, 1), 365).unwrap(), d(2026, 3, 1));
        assert!(compute_expiry(d(2025, 1, 1), 0).is_err());
        assert!(compute_expiry(d(2025, 1, 1), -5).is_err());
    }

    #[test]
    fn test_validate_purchase() {
        assert!(validate_purchase(10000, 10, 90).is_ok());
        assert!(validate_purchase(0, 10, 90).is_err());
        assert!(validate_purchase(10000, 0, 90).is_err());
        assert!(validate_purchase(10000, 10, 0).is_err());
    }

    #[test]
    fn test_purchase_adds_quantity() {
        assert_eq!(credit_after_purchase(0, 10).unwrap(), 10);
        assert_eq!(credit_after_purchase(3, 8).unwrap(), 11);
        assert!(credit_after_purchase(3, 0).is_err());
        assert!(credit_after_purchase(i32::MAX, 1).is_err());
    }

    #[test]
    fn test_class_consumes_one_credit() {
        assert_eq!(credit_after_class(5).unwrap(), 4);
        assert_eq!(credit_after_class(1).unwrap(), 0);
        assert!(matches!(
            credit_after_class(0),
            Err(AppError::InsufficientClasses)
        ));
        assert!(matches!(
            credit_after_class(-1),
            Err(AppError::InsufficientClasses)
        ));
    }

    #[test]
    fn test_merge_expiry_never_moves_backwards() {
        assert_eq!(merge_expiry(None, d(2025, 5, 1)), d(2025, 5, 1));
        assert_eq!(
            merge_expiry(Some(d(2025, 4, 1)), d(2025, 5, 1)),
            d(2025, 5, 1)
        );
        assert_eq!(
            merge_expiry(Some(d(2025, 6, 1)), d(2025, 5, 1)),
            d(2025, 6, 1)
        );
    }

    #[test]
    fn test_renewal_expiry() {
        assert_eq!(renewal_expiry(d(2025, 1, 15), 30).unwrap(), d(2025, 2, 14));
    }

    #[test]
    fn test_credit_grant_purchase() {
        let grant = CreditGrant::purchase(300000, 10, d(2025, 3, 1), 90).unwrap();
        assert_eq!(grant.expiry_date, d(2025, 5, 30));
        assert_eq!(grant.quantity, 10);
        assert!(CreditGrant::purchase(0, 10, d(2025, 3, 1), 90).is_err());
        assert!(CreditGrant::purchase(100, 10, d(2025, 3, 1), 0).is_err());
    }
}
