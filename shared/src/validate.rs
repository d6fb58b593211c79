//! 表单校验
//!
//! 在提交前于客户端拦截明显无效的输入，后端仍是最终裁决者。
//! 每个校验函数返回字段名到错误消息的列表，空列表表示通过。

use crate::protocol::{CategoryDraft, PostDraft};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub type Validation = Vec<FieldError>;

/// 查找某个字段的第一条错误
pub fn error_for<'a>(errors: &'a [FieldError], field: &str) -> Option<&'a str> {
    errors
        .iter()
        .find(|e| e.field == field)
        .map(|e| e.message.as_str())
}

pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

fn check_len(
    errors: &mut Validation,
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
    label: &str,
) {
    let len = value.trim().chars().count();
    if len < min {
        if min == 1 {
            errors.push(FieldError::new(field, format!("{} is required", label)));
        } else {
            errors.push(FieldError::new(
                field,
                format!("{} must have at least {} characters", label, min),
            ));
        }
    } else if len > max {
        errors.push(FieldError::new(
            field,
            format!("{} must have at most {} characters", label, max),
        ));
    }
}

fn check_email(errors: &mut Validation, email: &str) {
    if !is_valid_email(email) {
        errors.push(FieldError::new("email", "Invalid email"));
    } else if email.trim().len() > 255 {
        errors.push(FieldError::new("email", "Email must have at most 255 characters"));
    }
}

fn check_password(errors: &mut Validation, password: &str) {
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(FieldError::new(
            "password",
            format!("Password must have at least {} characters", MIN_PASSWORD_LEN),
        ));
    }
}

pub fn login(email: &str, password: &str) -> Validation {
    let mut errors = Vec::new();
    if !is_valid_email(email) {
        errors.push(FieldError::new("email", "Invalid email"));
    }
    check_password(&mut errors, password);
    errors
}

pub fn register(name: &str, email: &str, password: &str, confirm: &str) -> Validation {
    let mut errors = Vec::new();
    check_len(&mut errors, "name", name, 2, 100, "Name");
    check_email(&mut errors, email);
    check_password(&mut errors, password);
    if password != confirm {
        errors.push(FieldError::new("confirm_password", "Passwords do not match"));
    }
    errors
}

pub fn category(draft: &CategoryDraft) -> Validation {
    let mut errors = Vec::new();
    check_len(&mut errors, "name", &draft.name, 1, 100, "Name");
    check_len(&mut errors, "slug", &draft.slug, 1, 100, "Slug");
    if let Some(description) = &draft.description {
        if description.chars().count() > 500 {
            errors.push(FieldError::new(
                "description",
                "Description must have at most 500 characters",
            ));
        }
    }
    errors
}

pub fn post(draft: &PostDraft) -> Validation {
    let mut errors = Vec::new();
    check_len(&mut errors, "title", &draft.title, 1, 200, "Title");
    if draft.content.trim().is_empty() {
        errors.push(FieldError::new("content", "Content is required"));
    }
    errors
}

/// 用户表单：创建时密码必填，编辑时留空表示不修改
pub fn user(name: &str, email: &str, password: &str, creating: bool) -> Validation {
    let mut errors = Vec::new();
    check_len(&mut errors, "name", name, 2, 100, "Name");
    check_email(&mut errors, email);
    if creating || !password.is_empty() {
        check_password(&mut errors, password);
    }
    errors
}

/// 由标题或名称生成 URL slug
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;
    for c in input.chars() {
        let c = fold_accent(c);
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' | 'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'u',
        'ç' | 'Ç' => 'c',
        'ñ' | 'Ñ' => 'n',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(is_valid_email("a@b.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@@b.com"));
    }

    #[test]
    fn test_login_rules() {
        assert!(login("a@b.com", "secret1").is_empty());
        let errors = login("nope", "123");
        assert_eq!(error_for(&errors, "email"), Some("Invalid email"));
        assert!(error_for(&errors, "password").is_some());
    }

    #[test]
    fn test_register_requires_matching_confirmation() {
        assert!(register("Ana", "a@b.com", "secret1", "secret1").is_empty());

        let errors = register("A", "a@b.com", "secret1", "secret2");
        assert!(error_for(&errors, "name").is_some());
        assert_eq!(error_for(&errors, "confirm_password"), Some("Passwords do not match"));
    }

    #[test]
    fn test_category_limits() {
        let mut draft = CategoryDraft {
            name: "Rust".into(),
            slug: "rust".into(),
            description: None,
        };
        assert!(category(&draft).is_empty());

        draft.slug = "  ".into();
        draft.description = Some("x".repeat(501));
        let errors = category(&draft);
        assert_eq!(error_for(&errors, "slug"), Some("Slug is required"));
        assert!(error_for(&errors, "description").is_some());
    }

    #[test]
    fn test_post_requires_title_and_content() {
        let errors = post(&PostDraft::default());
        assert_eq!(error_for(&errors, "title"), Some("Title is required"));
        assert_eq!(error_for(&errors, "content"), Some("Content is required"));
    }

    #[test]
    fn test_user_password_optional_on_edit() {
        assert!(user("Ana", "a@b.com", "", false).is_empty());
        assert!(error_for(&user("Ana", "a@b.com", "", true), "password").is_some());
        assert!(error_for(&user("Ana", "a@b.com", "123", false), "password").is_some());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Programação em Rust  "), "programacao-em-rust");
        assert_eq!(slugify("a--b__c"), "a-b-c");
        assert_eq!(slugify("!!!"), "");
    }
}
