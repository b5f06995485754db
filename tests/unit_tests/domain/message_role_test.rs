use std::str::FromStr;

use cleverbot::domain::MessageRole;

#[test]
fn given_role_when_displayed_then_uses_lowercase_name() {
    assert_eq!(MessageRole::User.to_string(), "user");
    assert_eq!(MessageRole::Assistant.to_string(), "assistant");
}

#[test]
fn given_mixed_case_string_when_parsing_then_returns_role() {
    assert_eq!(MessageRole::from_str("Assistant"), Ok(MessageRole::Assistant));
}

#[test]
fn given_system_role_when_parsing_then_returns_error() {
    assert!(MessageRole::from_str("system").is_err());
}
