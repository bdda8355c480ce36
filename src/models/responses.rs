use serde::{Deserialize, Serialize};
use crate::models::domain::{Message, Profile, Report};

/// One card of the swipe deck
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckCard {
    pub profile: Profile,
    pub score: u8,
    pub reasons: Vec<String>,
    pub avatar: String,
    pub summary: String,
}

/// Response for the deck endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckResponse {
    pub cards: Vec<DeckCard>,
    #[serde(rename = "minScore")]
    pub min_score: u8,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Response for the summary endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub summary: String,
    pub traits: Vec<String>,
}

/// Response for the avatar endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub avatar: String,
}

/// Response for a recorded swipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwipeResponse {
    pub success: bool,
    #[serde(rename = "mutualMatch")]
    pub mutual_match: bool,
}

/// Response for a stored block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockResponse {
    pub success: bool,
}

/// A mutual match with its avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedProfile {
    pub profile: Profile,
    pub avatar: String,
}

/// Response for the mutual matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchesResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub matches: Vec<MatchedProfile>,
}

/// Response for a sent message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: Message,
}

/// Conversation between two users, oldest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesResponse {
    pub messages: Vec<Message>,
}

/// Response for a recorded report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResponse {
    pub success: bool,
    pub report: Report,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status_code,
        }
    }
}
