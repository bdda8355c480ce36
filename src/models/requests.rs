use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Longest id accepted from callers
pub const MAX_USER_ID_LEN: usize = 64;

/// Whether `id` is safe to embed in backend filter expressions
///
/// Ids are 1 to 64 ASCII letters, digits, `-` or `_`; UUIDs qualify. Filter
/// syntax characters such as `(),."` never pass.
pub fn is_valid_user_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_USER_ID_LEN
        && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

fn validate_user_id(id: &str) -> Result<(), ValidationError> {
    if is_valid_user_id(id) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_user_id"))
    }
}

/// Request to build a swipe deck
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DeckRequest {
    #[validate(custom(function = "validate_user_id"))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    /// Minimum compatibility score; falls back to `deck.min_score`
    #[validate(range(max = 100))]
    #[serde(default, alias = "min_score", rename = "minScore")]
    pub min_score: Option<u8>,
    #[validate(range(min = 1, max = 100))]
    #[serde(default)]
    pub limit: Option<u16>,
}

/// Request to score a single candidate against a viewer
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompatibilityRequest {
    #[validate(custom(function = "validate_user_id"))]
    #[serde(alias = "viewer_id", rename = "viewerId")]
    pub viewer_id: String,
    #[validate(custom(function = "validate_user_id"))]
    #[serde(alias = "candidate_id", rename = "candidateId")]
    pub candidate_id: String,
}

/// Request to record a swipe
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SwipeRequest {
    #[validate(custom(function = "validate_user_id"))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(custom(function = "validate_user_id"))]
    #[serde(alias = "target_user_id", rename = "targetUserId")]
    pub target_user_id: String,
    pub action: String,
}

/// Request to block another user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BlockRequest {
    #[validate(custom(function = "validate_user_id"))]
    #[serde(alias = "blocker_id", rename = "blockerId")]
    pub blocker_id: String,
    #[validate(custom(function = "validate_user_id"))]
    #[serde(alias = "blocked_user_id", rename = "blockedUserId")]
    pub blocked_user_id: String,
}

/// Request to report another user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReportRequest {
    #[validate(custom(function = "validate_user_id"))]
    #[serde(alias = "reporter_id", rename = "reporterId")]
    pub reporter_id: String,
    #[validate(custom(function = "validate_user_id"))]
    #[serde(alias = "reported_user_id", rename = "reportedUserId")]
    pub reported_user_id: String,
    #[validate(length(min = 1))]
    pub reason: String,
    #[validate(length(max = 1000))]
    #[serde(default)]
    pub description: Option<String>,
}

/// Request to send a message inside a mutual match
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(custom(function = "validate_user_id"))]
    #[serde(alias = "sender_id", rename = "senderId")]
    pub sender_id: String,
    #[validate(custom(function = "validate_user_id"))]
    #[serde(alias = "receiver_id", rename = "receiverId")]
    pub receiver_id: String,
    #[validate(length(min = 1, max = 2000))]
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deck_request_defaults() {
        let req: DeckRequest = serde_json::from_str(r#"{"userId": "u1"}"#).unwrap();
        assert_eq!(req.min_score, None);
        assert_eq!(req.limit, None);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_deck_request_rejects_out_of_range_threshold() {
        let req: DeckRequest =
            serde_json::from_str(r#"{"userId": "u1", "minScore": 101}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_swipe_request_requires_ids() {
        let req: SwipeRequest =
            serde_json::from_str(r#"{"userId": "", "targetUserId": "u2", "action": "like"}"#)
                .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_user_ids_reject_filter_syntax() {
        assert!(is_valid_user_id("2f1c6a9e-8f0b-4a53-9d0c-3b2e7f1a4c55"));
        assert!(is_valid_user_id("user_42"));

        let too_long = "x".repeat(MAX_USER_ID_LEN + 1);
        for bad in ["", "a),user_id.neq.(x", "a,b", "a.b", "\"a\"", "a b", too_long.as_str()] {
            assert!(!is_valid_user_id(bad), "{:?} accepted", bad);
        }
    }

    #[test]
    fn test_block_request_rejects_injected_id() {
        let req: BlockRequest = serde_json::from_str(
            r#"{"blockerId": "a),user_id.neq.(x", "blockedUserId": "b"}"#,
        )
        .unwrap();
        assert!(req.validate().is_err());
    }
}
