use serde::{Deserialize, Deserializer, Serialize};

/// Public-facing profile as stored by the managed backend
///
/// Column names follow the backend table, so no renames are needed. Text and
/// list columns are nullable in the backend; `null` reads as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bio: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub major: String,
    pub graduation_year: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub interests: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub university: String,
    #[serde(default)]
    pub profile_photo_url: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Compatibility of a candidate as seen by a viewer
///
/// Computed per request and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    pub profile: Profile,
    pub score: u8,
    pub reasons: Vec<String>,
}

/// Scoring weights, one per compatibility factor
///
/// Each factor produces a value in 0..=1 which is multiplied by its weight.
/// The defaults add up to 100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub interests: f64,
    pub major: f64,
    pub graduation_year: f64,
    pub bio: f64,
    pub university: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            interests: 40.0,
            major: 20.0,
            graduation_year: 15.0,
            bio: 15.0,
            university: 10.0,
        }
    }
}

impl ScoringWeights {
    pub fn total(&self) -> f64 {
        self.interests + self.major + self.graduation_year + self.bio + self.university
    }
}

/// Swipe direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeAction {
    Like,
    Pass,
}

impl SwipeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwipeAction::Like => "like",
            SwipeAction::Pass => "pass",
        }
    }
}

impl std::str::FromStr for SwipeAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "like" => Ok(SwipeAction::Like),
            "pass" => Ok(SwipeAction::Pass),
            other => Err(format!("unknown swipe action: {}", other)),
        }
    }
}

/// Row of the swipes table (named `matches` in the backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwipeRecord {
    pub user_id: String,
    pub target_user_id: String,
    pub action: SwipeAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Row of the blocked users table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub blocker_id: String,
    pub blocked_id: String,
}

/// Why a user was reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportReason {
    InappropriateContent,
    Harassment,
    FakeProfile,
    Spam,
    Underage,
    InappropriateBehavior,
    Other,
}

impl ReportReason {
    pub const ALL: [ReportReason; 7] = [
        ReportReason::InappropriateContent,
        ReportReason::Harassment,
        ReportReason::FakeProfile,
        ReportReason::Spam,
        ReportReason::Underage,
        ReportReason::InappropriateBehavior,
        ReportReason::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportReason::InappropriateContent => "inappropriate_content",
            ReportReason::Harassment => "harassment",
            ReportReason::FakeProfile => "fake_profile",
            ReportReason::Spam => "spam",
            ReportReason::Underage => "underage",
            ReportReason::InappropriateBehavior => "inappropriate_behavior",
            ReportReason::Other => "other",
        }
    }
}

impl std::str::FromStr for ReportReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportReason::ALL
            .iter()
            .copied()
            .find(|reason| reason.as_str() == s)
            .ok_or_else(|| format!("unknown report reason: {}", s))
    }
}

/// Moderation report, as written to and returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub reporter_id: String,
    pub reported_user_id: String,
    pub reason: ReportReason,
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Chat message between two mutually matched users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}
