use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{BigOError, Result};

static LOGIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("Invalid login regex"));

const LOGIN_MIN_LEN: usize = 3;
const LOGIN_MAX_LEN: usize = 32;
const PASSWORD_MIN_LEN: usize = 6;
const PASSWORD_MAX_LEN: usize = 128;

const WEAK_PASSWORDS: [&str; 6] = [
    "password1",
    "qwerty123",
    "123456abc",
    "abc123",
    "admin123",
    "moderator1",
];

/// 校验登录名：3..=32 个字符，只能包含字母、数字、`_`、`.`、`-`
pub fn validate_login(login: &str) -> Result<()> {
    if login.len() < LOGIN_MIN_LEN || login.len() > LOGIN_MAX_LEN {
        return Err(BigOError::validation(format!(
            "Login length must be between {LOGIN_MIN_LEN} and {LOGIN_MAX_LEN} characters"
        )));
    }
    if !LOGIN_RE.is_match(login) {
        return Err(BigOError::validation(
            "Login must contain only letters, numbers, underscores, dots or hyphens",
        ));
    }
    Ok(())
}

/// 校验密码，返回所有未满足的规则
pub fn password_violations(password: &str) -> Vec<&'static str> {
    let mut errors = Vec::new();

    if password.chars().count() < PASSWORD_MIN_LEN {
        errors.push("Password must be at least 6 characters long");
    }
    if password.chars().count() > PASSWORD_MAX_LEN {
        errors.push("Password must be at most 128 characters long");
    }
    if !password.chars().any(|c| c.is_alphabetic()) {
        errors.push("Password must contain at least one letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }
    if WEAK_PASSWORDS
        .iter()
        .any(|&weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    errors
}

pub fn validate_password(password: &str) -> Result<()> {
    let errors = password_violations(password);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(BigOError::validation(errors.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_login() {
        assert!(validate_login("moderator").is_ok());
        assert!(validate_login("ivan.petrov-2").is_ok());
    }

    #[test]
    fn test_invalid_login() {
        assert!(validate_login("ab").is_err());
        assert!(validate_login("has space").is_err());
        assert!(validate_login("кириллица").is_err());
        assert!(validate_login(&"x".repeat(33)).is_err());
    }

    #[test]
    fn test_valid_password() {
        assert!(validate_password("s3cret").is_ok());
        assert!(validate_password("Longer-Pass-42").is_ok());
    }

    #[test]
    fn test_password_rules_are_reported_together() {
        let errors = password_violations("abc");
        assert!(errors.contains(&"Password must be at least 6 characters long"));
        assert!(errors.contains(&"Password must contain at least one digit"));
    }

    #[test]
    fn test_common_password() {
        assert!(
            password_violations("Admin123")
                .contains(&"Password is too common, please choose a stronger password")
        );
    }
}
