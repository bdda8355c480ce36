// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Profile, MatchScore, ScoringWeights, SwipeAction, SwipeRecord, BlockRecord, ReportReason, Report, Message};
pub use requests::{is_valid_user_id, DeckRequest, CompatibilityRequest, SwipeRequest, BlockRequest, ReportRequest, SendMessageRequest};
pub use responses::{DeckCard, DeckResponse, SummaryResponse, AvatarResponse, SwipeResponse, BlockResponse, ReportResponse, MatchedProfile, MatchesResponse, MessageResponse, MessagesResponse, HealthResponse, ErrorResponse};
