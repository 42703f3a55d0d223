//! Output helpers for human and agent modes.

use serde::Serialize;

/// Human (TTY) vs Agent (non-interactive) output selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Agent,
}

/// Structured problem found in one input row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowIssue {
    pub row: usize,
    pub field: String,
    pub message: String,
}

/// Agent-mode error payload.
#[derive(Debug, Clone, Serialize)]
pub struct AgentError {
    pub error: String,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<RowIssue>>,
}

impl AgentError {
    pub fn new(error: impl Into<String>, code: i32) -> Self {
        Self {
            error: error.into(),
            code,
            message: None,
            details: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_details(mut self, details: Vec<RowIssue>) -> Self {
        self.details = Some(details);
        self
    }
}

/// Shorten long addresses for tables, keeping the head and tail.
pub fn truncate_address(addr: &str) -> String {
    let s = addr.trim();
    let len = s.chars().count();
    if len <= 14 {
        return s.to_string();
    }

    let start: String = s.chars().take(6).collect();
    let end: String = s.chars().skip(len - 4).collect();
    format!("{start}...{end}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_short_address_is_unchanged() {
        assert_eq!(truncate_address("S1abc"), "S1abc");
    }

    #[test]
    fn truncate_long_ascii_address() {
        assert_eq!(truncate_address("S1abcdefghijklmnop"), "S1abcd...mnop");
    }

    #[test]
    fn truncate_long_unicode_address_without_panic() {
        let han = "\u{4F60}";
        assert_eq!(
            truncate_address(&format!(
                "S1{han}{han}{han}{han}{han}{han}{han}{han}{han}{han}{han}{han}{han}{han}"
            )),
            format!("S1{han}{han}{han}{han}...{han}{han}{han}{han}")
        );
    }

    #[test]
    fn agent_error_omits_empty_details() {
        let json = serde_json::to_string(&AgentError::new("parse_failed", 1)).unwrap();
        assert_eq!(json, r#"{"error":"parse_failed","code":1}"#);

        let with = AgentError::new("validation_failed", 1).with_details(vec![RowIssue {
            row: 2,
            field: "amount".to_string(),
            message: "amount is empty".to_string(),
        }]);
        let value = serde_json::to_value(&with).unwrap();
        assert_eq!(value["details"][0]["row"], 2);
        assert!(value.get("message").is_none());

        let value =
            serde_json::to_value(AgentError::new("parse_failed", 1).with_message("bad")).unwrap();
        assert_eq!(value["message"], "bad");
    }
}
