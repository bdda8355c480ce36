//! Campus Match - compatibility scoring and swipe deck service
//!
//! This library provides the matching core used by the Campus Match app:
//! a multi-factor compatibility scorer, deck ranking and filtering,
//! personality summaries and deterministic avatars. The service layer
//! forwards storage to the managed backend.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{Matcher, calculate_compatibility, filter_matches, generate_avatar, generate_summary};
pub use models::{Profile, MatchScore, ScoringWeights, DeckRequest, DeckResponse};
