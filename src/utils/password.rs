use crate::error::{AppError, AppResult};
use bcrypt::{DEFAULT_COST, hash, verify};

/// 验证密码长度（会员默认密码为手机号后6位，因此最短6位）
pub fn validate_password(password: &str) -> AppResult<()> {
    let len = password.chars().count();
    if !(6..=128).contains(&len) {
        return Err(AppError::ValidationError(
            "密码长度必须在6-128字符之间".to_string(),
        ));
    }
    if password.chars().any(char::is_whitespace) {
        return Err(AppError::ValidationError("密码不能包含空白字符".to_string()));
    }
    Ok(())
}

/// 会员初始密码：手机号后6位
pub fn default_member_password(phone: &str) -> String {
    let digits: Vec<char> = phone.chars().collect();
    let start = digits.len().saturating_sub(6);
    digits[start..].iter().collect()
}

/// 对密码进行哈希
pub fn hash_password(password: &str) -> AppResult<String> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("密码哈希失败: {}", e)))
}

/// 验证密码
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    verify(password, hash).map_err(|e| AppError::InternalError(format!("密码验证失败: {}", e)))
}
