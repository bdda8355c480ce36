use crate::models::{MatchScore, Profile, ScoringWeights};
use crate::core::{keywords::bio_similarity, majors};

/// At most this many reasons are attached to a score
pub const MAX_REASONS: usize = 3;

/// At most this many interest names are quoted in the interest reason
const MAX_NAMED_INTERESTS: usize = 3;

/// Bio similarity above which the traits reason is shown
const BIO_REASON_THRESHOLD: f64 = 0.6;

/// Major compatibility above which the shared-category reason is shown
const MAJOR_REASON_THRESHOLD: f64 = 0.5;

/// Compatibility of `candidate` as seen by `viewer`, with the default weights
///
/// Scoring formula (default weights):
/// score = round(
///     interest_overlap * 40 +     # shared / max(len) of the interest lists
///     major_compat     * 20 +     # 1.0 same category, 0.7 related, 0.3 else
///     year_proximity   * 15 +     # 1 / 0.8 / 0.5 / 0.2 by graduation gap
///     bio_similarity   * 15 +     # Jaccard over bio keywords
///     same_university  * 10
/// )
pub fn calculate_compatibility(viewer: &Profile, candidate: &Profile) -> MatchScore {
    calculate_compatibility_with(viewer, candidate, &ScoringWeights::default())
}

/// Compatibility of `candidate` as seen by `viewer`
///
/// Reasons are appended in factor order (interests, major, year, bio,
/// university) and the first three kept; they are not ranked by impact.
pub fn calculate_compatibility_with(
    viewer: &Profile,
    candidate: &Profile,
    weights: &ScoringWeights,
) -> MatchScore {
    let mut reasons = Vec::new();

    // Interests
    let common_interests = common_interests(&viewer.interests, &candidate.interests);
    let interest_score = interest_overlap(
        common_interests.len(),
        viewer.interests.len(),
        candidate.interests.len(),
    );

    if !common_interests.is_empty() {
        let count = common_interests.len();
        let named: Vec<&str> = common_interests
            .iter()
            .take(MAX_NAMED_INTERESTS)
            .map(|s| s.as_str())
            .collect();
        reasons.push(format!(
            "Share {} common interest{}: {}",
            count,
            if count > 1 { "s" } else { "" },
            named.join(", ")
        ));
    }

    // Major
    let viewer_category = majors::major_category(&viewer.major);
    let major_score =
        majors::category_compatibility(viewer_category, majors::major_category(&candidate.major));

    if major_score > MAJOR_REASON_THRESHOLD {
        reasons.push(format!("Both studying {}", viewer_category));
    }

    // Graduation year
    let year_diff = viewer.graduation_year.abs_diff(candidate.graduation_year);
    let year_score = year_proximity(year_diff);

    if year_diff <= 1 {
        reasons.push("Same graduation year".to_string());
    } else if year_diff <= 2 {
        reasons.push("Similar graduation timeline".to_string());
    }

    // Bio
    let bio_score = bio_similarity(&viewer.bio, &candidate.bio);

    if bio_score > BIO_REASON_THRESHOLD {
        reasons.push("Similar personality traits".to_string());
    }

    // University
    let same_university = viewer.university == candidate.university;

    if same_university {
        reasons.push("Same university".to_string());
    }

    let total = interest_score * weights.interests
        + major_score * weights.major
        + year_score * weights.graduation_year
        + bio_score * weights.bio
        + if same_university { weights.university } else { 0.0 };

    reasons.truncate(MAX_REASONS);

    MatchScore {
        profile: candidate.clone(),
        // Default weights cap the sum at 100; the cast saturates otherwise
        score: total.round() as u8,
        reasons,
    }
}

/// Distinct interests present in both lists, in `viewer` order
///
/// Comparison is exact (case-sensitive), as the interests come from a
/// fixed picker.
pub fn common_interests(viewer: &[String], candidate: &[String]) -> Vec<String> {
    let mut common: Vec<String> = Vec::new();
    for interest in viewer {
        if candidate.contains(interest) && !common.contains(interest) {
            common.push(interest.clone());
        }
    }
    common
}

/// Interest overlap ratio (0-1)
///
/// Zero when either list is empty, so an empty pair never divides by zero.
#[inline]
pub fn interest_overlap(common: usize, viewer_len: usize, candidate_len: usize) -> f64 {
    let longest = viewer_len.max(candidate_len);
    if common == 0 || longest == 0 {
        return 0.0;
    }
    common as f64 / longest as f64
}

/// Graduation-year proximity multiplier (0-1)
#[inline]
pub fn year_proximity(year_diff: u32) -> f64 {
    match year_diff {
        0 => 1.0,
        1..=2 => 0.8,
        3..=4 => 0.5,
        _ => 0.2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_profile(id: &str, major: &str, year: i32, interests: &[&str]) -> Profile {
        Profile {
            id: id.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            bio: String::new(),
            major: major.to_string(),
            graduation_year: year,
            interests: interests.iter().map(|s| s.to_string()).collect(),
            university: "State University".to_string(),
            profile_photo_url: None,
        }
    }

    #[test]
    fn test_shared_art_majors_scenario() {
        let viewer = create_test_profile("v", "Art", 2026, &["Music", "Art"]);
        let candidate = create_test_profile("c", "Art", 2026, &["Music", "Gaming"]);

        let result = calculate_compatibility(&viewer, &candidate);

        // 20 interests + 20 major + 15 year + 0 bio + 10 university
        assert_eq!(result.score, 65);
        assert_eq!(
            result.reasons,
            vec![
                "Share 1 common interest: Music".to_string(),
                "Both studying Arts".to_string(),
                "Same graduation year".to_string(),
            ]
        );
        assert_eq!(result.profile.id, "c");
    }

    #[test]
    fn test_unrelated_profiles_scenario() {
        let viewer = create_test_profile("v", "Computer Science", 2024, &["Gaming"]);
        let mut candidate = create_test_profile("c", "Business", 2029, &["Cooking"]);
        candidate.university = "Other College".to_string();

        let result = calculate_compatibility(&viewer, &candidate);

        // 0 + 0.3*20 + 0.2*15 + 0 + 0
        assert_eq!(result.score, 9);
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn test_empty_interest_lists_score_zero_interest_term() {
        let viewer = create_test_profile("v", "Physics", 2026, &[]);
        let candidate = create_test_profile("c", "Physics", 2026, &[]);

        let result = calculate_compatibility(&viewer, &candidate);

        // 0 + 20 + 15 + 0 + 10
        assert_eq!(result.score, 45);
    }

    #[test]
    fn test_perfect_match_scores_100() {
        let mut viewer = create_test_profile("v", "Physics", 2026, &["Hiking", "Music"]);
        viewer.bio = "Outgoing and into hiking".to_string();
        let mut candidate = create_test_profile("c", "Chemistry", 2026, &["Music", "Hiking"]);
        candidate.bio = "hiking, very outgoing".to_string();

        let result = calculate_compatibility(&viewer, &candidate);

        assert_eq!(result.score, 100);
        // Five reasons fire, only the first three are kept
        assert_eq!(result.reasons.len(), MAX_REASONS);
        assert!(result.reasons[0].starts_with("Share 2 common interests"));
    }

    #[test]
    fn test_reason_lists_at_most_three_interests() {
        let interests = ["A", "B", "C", "D"];
        let viewer = create_test_profile("v", "Physics", 2026, &interests);
        let candidate = create_test_profile("c", "Physics", 2026, &interests);

        let result = calculate_compatibility(&viewer, &candidate);

        assert_eq!(result.reasons[0], "Share 4 common interests: A, B, C");
    }

    #[test]
    fn test_year_reasons_are_exclusive() {
        let viewer = create_test_profile("v", "Undeclared", 2026, &[]);

        let one_year = create_test_profile("c1", "Undeclared", 2027, &[]);
        let two_years = create_test_profile("c2", "Undeclared", 2028, &[]);
        let three_years = create_test_profile("c3", "Undeclared", 2029, &[]);

        let r1 = calculate_compatibility(&viewer, &one_year).reasons;
        let r2 = calculate_compatibility(&viewer, &two_years).reasons;
        let r3 = calculate_compatibility(&viewer, &three_years).reasons;

        assert!(r1.contains(&"Same graduation year".to_string()));
        assert!(r2.contains(&"Similar graduation timeline".to_string()));
        assert!(!r3.iter().any(|r| r.contains("graduation")));
    }

    #[test]
    fn test_related_majors_use_viewer_category_in_reason() {
        let viewer = create_test_profile("v", "Physics", 2020, &[]);
        let candidate = create_test_profile("c", "Psychology", 2030, &[]);

        let result = calculate_compatibility(&viewer, &candidate);

        assert_eq!(result.reasons[0], "Both studying STEM");
    }

    #[test]
    fn test_duplicate_interests_do_not_exceed_weight() {
        let viewer = create_test_profile("v", "Physics", 2026, &["Music", "Music"]);
        let candidate = create_test_profile("c", "Physics", 2026, &["Music"]);

        let forward = calculate_compatibility(&viewer, &candidate);
        let backward = calculate_compatibility(&candidate, &viewer);

        assert_eq!(forward.score, backward.score);
        assert!(forward.score <= 100);
    }

    #[test]
    fn test_extreme_graduation_years_do_not_overflow() {
        let viewer = create_test_profile("v", "Physics", i32::MIN, &[]);
        let candidate = create_test_profile("c", "Physics", 2026, &[]);

        // 0 + 20 + 0.2*15 + 0 + 10
        assert_eq!(calculate_compatibility(&viewer, &candidate).score, 33);

        let far_future = create_test_profile("f", "Physics", i32::MAX, &[]);
        let result = calculate_compatibility(&viewer, &far_future);
        assert_eq!(result.score, 33);
        assert!(result.reasons.iter().all(|r| !r.contains("graduation")));
    }

    #[test]
    fn test_year_proximity_steps() {
        assert_eq!(year_proximity(0), 1.0);
        assert_eq!(year_proximity(2), 0.8);
        assert_eq!(year_proximity(4), 0.5);
        assert_eq!(year_proximity(5), 0.2);
    }

    #[test]
    fn test_custom_weights() {
        let viewer = create_test_profile("v", "Art", 2026, &["Music"]);
        let candidate = create_test_profile("c", "Art", 2026, &["Music"]);
        let weights = ScoringWeights {
            interests: 50.0,
            major: 10.0,
            graduation_year: 10.0,
            bio: 20.0,
            university: 10.0,
        };

        let result = calculate_compatibility_with(&viewer, &candidate, &weights);

        assert_eq!(result.score, 80);
    }
}
