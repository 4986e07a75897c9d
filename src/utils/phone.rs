use crate::error::{AppError, AppResult};
use regex::Regex;
use std::sync::OnceLock;

fn mobile_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^1[3-9]\d{9}$").expect("valid mobile regex"))
}

/// 验证中国大陆手机号格式（11位，1开头，第二位3-9）
pub fn validate_cn_phone(phone: &str) -> AppResult<()> {
    if !mobile_regex().is_match(phone) {
        return Err(AppError::ValidationError(
            "请输入有效的11位手机号码".to_string(),
        ));
    }

    Ok(())
}

/// 去除空格、横线、加号等分隔符，以及 86 前缀；其余字符原样保留交给校验
pub fn normalize_cn_phone(phone: &str) -> String {
    let cleaned: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '+'))
        .collect();

    if cleaned.len() == 13 && cleaned.starts_with("86") {
        cleaned[2..].to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_cn_phone() {
        assert!(validate_cn_phone("13812345678").is_ok());
        assert!(validate_cn_phone("19912345678").is_ok());
        assert!(validate_cn_phone("12812345678").is_err());
        assert!(validate_cn_phone("1381234567").is_err());
        assert!(validate_cn_phone("23812345678").is_err());
        assert!(validate_cn_phone("1381234567a").is_err());
    }

    #[test]
    fn test_normalize_cn_phone() {
        assert_eq!(normalize_cn_phone("138 1234 5678"), "13812345678");
        assert_eq!(normalize_cn_phone("+86 138-1234-5678"), "13812345678");
        assert_eq!(normalize_cn_phone("8613812345678"), "13812345678");
        assert_eq!(normalize_cn_phone("13812345678"), "13812345678");
    }

    #[test]
    fn test_trailing_garbage_is_not_stripped() {
        let phone = normalize_cn_phone("13812345678abc");
        assert_eq!(phone, "13812345678abc");
        assert!(validate_cn_phone(&phone).is_err());
        assert!(validate_cn_phone(&normalize_cn_phone("138.1234.5678")).is_err());
    }
}
