use serde::Serialize;

use crate::core::GameDocument;

/// Machine-readable code attached to rejections the caller must act on
pub const VERSION_CONFLICT_CODE: &str = "VERSION_CONFLICT";

/// Error payload for rejected actions
///
/// `code` is attached where the semantics require caller action (conflicts);
/// other rejections are distinguishable by message text. `currentState`
/// rides along when the caller can reconcile from it without another fetch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_state: Option<GameDocument>,
}

impl ErrorBody {
    /// A rejection carrying only its message
    pub fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: None,
            current_state: None,
        }
    }

    /// A rejection carrying the current document for reconciliation
    pub fn with_state(error: impl Into<String>, current: GameDocument) -> Self {
        Self {
            error: error.into(),
            code: None,
            current_state: Some(current),
        }
    }

    /// A version conflict: coded, with the current document attached
    pub fn conflict(error: impl Into<String>, current: GameDocument) -> Self {
        Self {
            error: error.into(),
            code: Some(VERSION_CONFLICT_CODE),
            current_state: Some(current),
        }
    }
}

/// Acknowledgement for a completed reset
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ResetAck {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_body_omits_optional_fields() {
        let body = ErrorBody::message("Board is locked! No changes allowed.");

        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["error"], "Board is locked! No changes allowed.");
        assert!(value.get("code").is_none());
        assert!(value.get("currentState").is_none());
    }

    #[test]
    fn test_conflict_body_carries_code_and_state() {
        let body = ErrorBody::conflict("State changed, please retry", GameDocument::new("g"));

        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["code"], "VERSION_CONFLICT");
        assert_eq!(value["currentState"]["gameId"], "g");
        assert_eq!(value["currentState"]["version"], json!(1));
    }

    #[test]
    fn test_taken_body_carries_state_without_code() {
        let body = ErrorBody::with_state("Square already taken by Jim!", GameDocument::new("g"));

        let value = serde_json::to_value(&body).unwrap();

        assert!(value.get("code").is_none());
        assert!(value.get("currentState").is_some());
    }

    #[test]
    fn test_reset_ack_shape() {
        let value = serde_json::to_value(ResetAck { success: true }).unwrap();

        assert_eq!(value, json!({ "success": true }));
    }
}
