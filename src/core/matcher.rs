use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::{MatchScore, Profile, ScoringWeights};
use crate::core::scoring::calculate_compatibility_with;

/// Result of building a swipe deck
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckResult {
    pub matches: Vec<MatchScore>,
    pub total_candidates: usize,
}

/// Deck orchestrator - ranks and filters candidate pools
///
/// # Pipeline Stages
/// 1. Exclude the viewer and already-handled profiles
/// 2. Score every remaining candidate
/// 3. Rank by score (stable: ties keep pool order)
/// 4. Drop candidates below the threshold
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score a single candidate
    pub fn score(&self, viewer: &Profile, candidate: &Profile) -> MatchScore {
        calculate_compatibility_with(viewer, candidate, &self.weights)
    }

    /// Score every candidate in `pool` and sort by descending score
    ///
    /// The viewer is skipped even if present in the pool.
    pub fn get_smart_matches(&self, viewer: &Profile, pool: Vec<Profile>) -> Vec<MatchScore> {
        let mut matches: Vec<MatchScore> = pool
            .iter()
            .filter(|profile| profile.id != viewer.id)
            .map(|profile| self.score(viewer, profile))
            .collect();

        // sort_by is stable, so equal scores keep their pool order
        matches.sort_by(|a, b| b.score.cmp(&a.score));

        matches
    }

    /// Build the swipe deck for `viewer`
    ///
    /// # Arguments
    /// * `viewer` - The profile the deck is built for
    /// * `candidates` - Candidate pool from the data store
    /// * `exclude_ids` - Profiles already swiped on or blocked
    /// * `min_score` - Minimum compatibility score to keep
    pub fn build_deck(
        &self,
        viewer: &Profile,
        candidates: Vec<Profile>,
        exclude_ids: &HashSet<String>,
        min_score: u8,
    ) -> DeckResult {
        let total_candidates = candidates.len();

        let pool: Vec<Profile> = candidates
            .into_iter()
            .filter(|profile| !exclude_ids.contains(&profile.id))
            .collect();

        let ranked = self.get_smart_matches(viewer, pool);
        let matches = filter_matches(ranked, min_score);

        tracing::debug!(
            "Deck for {}: {} of {} candidates at or above {}",
            viewer.id,
            matches.len(),
            total_candidates,
            min_score
        );

        DeckResult {
            matches,
            total_candidates,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Keep entries scoring at least `min_score`, preserving order
pub fn filter_matches(matches: Vec<MatchScore>, min_score: u8) -> Vec<MatchScore> {
    matches
        .into_iter()
        .filter(|m| m.score >= min_score)
        .collect()
}
