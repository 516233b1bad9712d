use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::EvaluationConfig;
use crate::models::students::entities::{MAX_GRADE_LEVEL, MIN_GRADE_LEVEL};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 姓名：去除空白后 1..=100 个字符
pub fn validate_person_name(name: &str) -> Result<(), &'static str> {
    let len = name.trim().chars().count();
    if len == 0 || len > 100 {
        return Err("Name must be between 1 and 100 characters");
    }
    Ok(())
}

/// 非空文本字段（标题、科目、描述等）
pub fn validate_required_text(field: &str, value: &str, max_chars: usize) -> Result<(), String> {
    let len = value.trim().chars().count();
    if len == 0 {
        return Err(format!("{field} must not be empty"));
    }
    if len > max_chars {
        return Err(format!("{field} must be at most {max_chars} characters"));
    }
    Ok(())
}

/// 阶段必须位于 1..=phase_count
pub fn validate_phase(phase: i32, rules: &EvaluationConfig) -> Result<(), String> {
    if phase < 1 || phase > rules.phase_count {
        return Err(format!(
            "Phase must be between 1 and {}, got {phase}",
            rules.phase_count
        ));
    }
    Ok(())
}

/// 分数必须位于 [min_score, max_score]
pub fn validate_score(score: f64, rules: &EvaluationConfig) -> Result<(), String> {
    if !score.is_finite() || score < rules.min_score || score > rules.max_score {
        return Err(format!(
            "Score must be between {} and {}, got {score}",
            rules.min_score, rules.max_score
        ));
    }
    Ok(())
}

pub fn validate_weight(weight: f64) -> Result<(), String> {
    if !weight.is_finite() || weight <= 0.0 {
        return Err(format!("Weight must be greater than 0, got {weight}"));
    }
    Ok(())
}

pub fn validate_grade_level(grade_level: i32) -> Result<(), String> {
    if !(MIN_GRADE_LEVEL..=MAX_GRADE_LEVEL).contains(&grade_level) {
        return Err(format!(
            "Grade level must be between {MIN_GRADE_LEVEL} and {MAX_GRADE_LEVEL}, got {grade_level}"
        ));
    }
    Ok(())
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 验证密码是否符合安全策略
///
/// 策略要求：
/// - 最小长度：8 字符
/// - 必须包含：大写字母 + 小写字母 + 数字
/// - 不能是常见弱密码
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    if password.len() < 8 {
        errors.push("Password must be at least 8 characters long");
    }

    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }

    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }

    let weak_passwords = [
        "password1",
        "qwerty123",
        "admin123",
        "abcd1234",
        "welcome1",
        "colegio123",
        "seio12345",
    ];
    if weak_passwords
        .iter()
        .any(|&weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// 简化的密码验证（返回 Result）
pub fn validate_password_simple(password: &str) -> Result<(), String> {
    let result = validate_password(password);
    if result.is_valid {
        Ok(())
    } else {
        Err(result.error_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(validate_email("ana.perez@colegio.edu.co").is_ok());
        assert!(validate_email("no-at-sign.example.com").is_err());
        assert!(validate_email("x@y").is_err());
    }

    #[test]
    fn test_phase_bounds() {
        let rules = EvaluationConfig::default();
        assert!(validate_phase(1, &rules).is_ok());
        assert!(validate_phase(4, &rules).is_ok());
        assert!(validate_phase(0, &rules).is_err());
        assert!(validate_phase(5, &rules).is_err());
    }

    #[test]
    fn test_score_bounds() {
        let rules = EvaluationConfig::default();
        assert!(validate_score(0.0, &rules).is_ok());
        assert!(validate_score(5.0, &rules).is_ok());
        assert!(validate_score(5.01, &rules).is_err());
        assert!(validate_score(-0.1, &rules).is_err());
        assert!(validate_score(f64::NAN, &rules).is_err());
    }

    #[test]
    fn test_weight_and_grade_level() {
        assert!(validate_weight(0.5).is_ok());
        assert!(validate_weight(0.0).is_err());
        assert!(validate_grade_level(11).is_ok());
        assert!(validate_grade_level(12).is_err());
    }

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("title", "  ", 10).is_err());
        assert!(validate_required_text("title", "Álgebra", 10).is_ok());
        assert!(validate_required_text("title", "abcdefghijk", 10).is_err());
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password("SecurePass123").is_valid);

        let short = validate_password("Ab1");
        assert!(
            short
                .errors
                .contains(&"Password must be at least 8 characters long")
        );

        let no_upper = validate_password("abcd12345");
        assert!(
            no_upper
                .errors
                .contains(&"Password must contain at least one uppercase letter")
        );

        let common = validate_password("Password1");
        assert!(
            common
                .errors
                .contains(&"Password is too common, please choose a stronger password")
        );
    }
}
