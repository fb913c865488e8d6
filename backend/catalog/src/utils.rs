use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;

static USERNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]{3,32}$").expect("valid username pattern"));

static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid pattern"));

/// Trims and collapses inner whitespace.
pub fn sanitize(input: &str) -> String {
    SPACES.replace_all(input.trim(), " ").into_owned()
}

pub fn required(field: &'static str, input: &str) -> Result<String, ValidationError> {
    let value = sanitize(input);

    if value.is_empty() {
        return Err(ValidationError::Blank(field));
    }

    Ok(value)
}

pub fn username(input: &str) -> Result<String, ValidationError> {
    let value = input.trim();

    if !USERNAME.is_match(value) {
        return Err(ValidationError::InvalidUsername);
    }

    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        assert_eq!(sanitize("hello world"), "hello world");
        assert_eq!(sanitize("Scene+"), "Scene+");
    }

    #[test]
    fn test_leading_trailing_spaces() {
        assert_eq!(sanitize("   hello   "), "hello");
        assert_eq!(sanitize("  multiple   spaces  "), "multiple spaces");
        assert_eq!(sanitize("tabs\tand\nnewlines"), "tabs and newlines");
    }

    #[test]
    fn test_required() {
        assert_eq!(required("title", " Gas  Discount "), Ok("Gas Discount".to_string()));
        assert_eq!(required("title", "     "), Err(ValidationError::Blank("title")));
        assert_eq!(required("region", ""), Err(ValidationError::Blank("region")));
    }

    #[test]
    fn test_username() {
        assert_eq!(username(" demo "), Ok("demo".to_string()));
        assert_eq!(username("jane.doe-99"), Ok("jane.doe-99".to_string()));
        assert_eq!(username("ab"), Err(ValidationError::InvalidUsername));
        assert_eq!(username("has space"), Err(ValidationError::InvalidUsername));
        assert_eq!(username(&"x".repeat(33)), Err(ValidationError::InvalidUsername));
    }
}
