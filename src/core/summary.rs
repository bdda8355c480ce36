//! Personality summary sentences derived from a single profile.
//!
//! Trait extraction is deterministic. Only the choice of sentence template
//! is random, and the caller supplies the random source so tests can pin it.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::majors::{self, MajorCategory};
use crate::models::Profile;

const MAX_PERSONALITY_TRAITS: usize = 3;
const MAX_LIFESTYLE_TRAITS: usize = 2;
const MAX_SOCIAL_TRAITS: usize = 1;

/// Sentence used when no trait is detected
pub const FALLBACK_SUMMARY: &str =
    "A thoughtful individual with diverse interests and a passion for learning.";

/// Sentence templates; `{traits}` is replaced with the joined trait list
pub const SUMMARY_TEMPLATES: [&str; 5] = [
    "A {traits} person who brings positive energy to any situation.",
    "Someone who is {traits} and always up for new experiences.",
    "A {traits} individual with a great sense of humor and adventure.",
    "An {traits} person who values meaningful connections and personal growth.",
    "Someone who is {traits} and loves to explore new ideas and places.",
];

/// Majors counted as academic on top of the Liberal Arts list
const EXTRA_ACADEMIC_MAJORS: &[&str] = &["psychology"];

/// Interest-based rule: the trait applies if any listed interest is present
struct InterestRule {
    interests: &'static [&'static str],
    label: &'static str,
}

const LIFESTYLE_RULES: &[InterestRule] = &[
    InterestRule {
        interests: &["fitness", "sports", "gym", "running", "yoga"],
        label: "health-conscious",
    },
    InterestRule {
        interests: &["cooking", "food", "baking"],
        label: "culinary enthusiast",
    },
    InterestRule {
        interests: &["movies", "music", "gaming", "reading"],
        label: "entertainment lover",
    },
    InterestRule {
        interests: &["hiking", "nature", "outdoors", "camping"],
        label: "nature enthusiast",
    },
];

const SOCIAL_RULES: &[InterestRule] = &[
    InterestRule {
        interests: &["dancing", "parties", "social events"],
        label: "social butterfly",
    },
    InterestRule {
        interests: &["reading", "writing", "meditation", "art"],
        label: "introspective",
    },
    InterestRule {
        interests: &["leadership", "mentoring", "volunteering"],
        label: "natural leader",
    },
];

/// Bio-based rule: the trait applies if the bio contains any listed word
struct BioRule {
    words: &'static [&'static str],
    label: &'static str,
}

const BIO_RULES: &[BioRule] = &[
    BioRule { words: &["outgoing", "social"], label: "outgoing" },
    BioRule { words: &["calm", "peaceful"], label: "calm" },
    BioRule { words: &["funny", "humor"], label: "humorous" },
    BioRule { words: &["organized", "structured"], label: "organized" },
];

/// Traits detected for one profile, already capped per group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalityTraits {
    pub personality: Vec<String>,
    pub lifestyle: Vec<String>,
    pub social: Vec<String>,
}

impl PersonalityTraits {
    /// All traits in personality, lifestyle, social order
    pub fn all(&self) -> Vec<String> {
        self.personality
            .iter()
            .chain(self.lifestyle.iter())
            .chain(self.social.iter())
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.personality.is_empty() && self.lifestyle.is_empty() && self.social.is_empty()
    }
}

/// Generate a summary sentence for `profile`
pub fn generate_summary<R: Rng + ?Sized>(profile: &Profile, rng: &mut R) -> String {
    let traits = extract_traits(profile);
    if traits.is_empty() {
        return FALLBACK_SUMMARY.to_string();
    }
    render_summary(&traits, rng.gen_range(0..SUMMARY_TEMPLATES.len()))
}

/// Render `traits` with the template at `template` (wrapping)
pub fn render_summary(traits: &PersonalityTraits, template: usize) -> String {
    let all = traits.all();
    if all.is_empty() {
        return FALLBACK_SUMMARY.to_string();
    }
    SUMMARY_TEMPLATES[template % SUMMARY_TEMPLATES.len()].replace("{traits}", &all.join(", "))
}

/// Detect personality, lifestyle and social traits of `profile`
pub fn extract_traits(profile: &Profile) -> PersonalityTraits {
    let interests: Vec<String> = profile.interests.iter().map(|i| i.to_lowercase()).collect();
    let bio = profile.bio.to_lowercase();

    PersonalityTraits {
        personality: personality_traits(&profile.major, &interests, &bio),
        lifestyle: apply_rules(LIFESTYLE_RULES, &interests, MAX_LIFESTYLE_TRAITS),
        social: apply_rules(SOCIAL_RULES, &interests, MAX_SOCIAL_TRAITS),
    }
}

fn personality_traits(major: &str, interests: &[String], bio: &str) -> Vec<String> {
    let has_any = |names: &[&str]| interests.iter().any(|i| names.contains(&i.as_str()));
    let mut traits: Vec<&str> = Vec::new();

    if is_academic_major(major) {
        traits.push("academically driven");
    }
    if has_any(&["reading", "writing", "research"]) {
        traits.push("intellectually curious");
    }
    if has_any(&["art", "music", "photography", "writing", "design"]) {
        traits.push("creative");
    }
    if has_any(&["volunteering", "community service", "leadership"]) {
        traits.push("community-minded");
    }
    if has_any(&["sports", "fitness", "team sports"]) {
        traits.push("team-oriented");
    }
    if has_any(&["travel", "hiking", "adventure", "exploring"]) {
        traits.push("adventurous");
    }
    if majors::major_category(major) == MajorCategory::Stem
        || has_any(&["technology", "gaming", "programming"])
    {
        traits.push("analytical");
    }

    for rule in BIO_RULES {
        if rule.words.iter().any(|w| bio.contains(w)) {
            traits.push(rule.label);
        }
    }

    traits
        .into_iter()
        .take(MAX_PERSONALITY_TRAITS)
        .map(str::to_string)
        .collect()
}

fn apply_rules(rules: &[InterestRule], interests: &[String], limit: usize) -> Vec<String> {
    rules
        .iter()
        .filter(|rule| interests.iter().any(|i| rule.interests.contains(&i.as_str())))
        .take(limit)
        .map(|rule| rule.label.to_string())
        .collect()
}

fn is_academic_major(major: &str) -> bool {
    let lowered = major.to_lowercase();
    majors::mentions_category(major, MajorCategory::LiberalArts)
        || EXTRA_ACADEMIC_MAJORS.iter().any(|m| lowered.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn create_profile(major: &str, bio: &str, interests: &[&str]) -> Profile {
        Profile {
            id: "p1".to_string(),
            first_name: "Sam".to_string(),
            last_name: "Lee".to_string(),
            bio: bio.to_string(),
            major: major.to_string(),
            graduation_year: 2026,
            interests: interests.iter().map(|s| s.to_string()).collect(),
            university: "State University".to_string(),
            profile_photo_url: None,
        }
    }

    #[test]
    fn test_extract_traits_caps_each_group() {
        let profile = create_profile(
            "History",
            "outgoing and calm",
            &["Reading", "Music", "Hiking", "Cooking", "Fitness", "Dancing"],
        );

        let traits = extract_traits(&profile);

        assert_eq!(
            traits.personality,
            vec!["academically driven", "intellectually curious", "creative"]
        );
        assert_eq!(traits.lifestyle, vec!["health-conscious", "culinary enthusiast"]);
        assert_eq!(traits.social, vec!["social butterfly"]);
    }

    #[test]
    fn test_extract_traits_from_bio_and_stem_major() {
        let profile = create_profile("Computer Science", "pretty funny and structured", &[]);

        let traits = extract_traits(&profile);

        assert_eq!(traits.personality, vec!["analytical", "humorous", "organized"]);
        assert!(traits.lifestyle.is_empty());
        assert!(traits.social.is_empty());
    }

    #[test]
    fn test_psychology_counts_as_academic() {
        let traits = extract_traits(&create_profile("Psychology", "", &[]));
        assert_eq!(traits.personality, vec!["academically driven"]);
    }

    #[test]
    fn test_interest_rules_require_exact_entries() {
        // "Hiking trips" is not the "hiking" entry
        let traits = extract_traits(&create_profile("Undeclared", "", &["Hiking trips"]));
        assert!(traits.is_empty());
    }

    #[test]
    fn test_fallback_summary_without_traits() {
        let profile = create_profile("Undeclared", "", &[]);
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(generate_summary(&profile, &mut rng), FALLBACK_SUMMARY);
    }

    #[test]
    fn test_render_summary_templates() {
        let traits = PersonalityTraits {
            personality: vec!["creative".to_string()],
            lifestyle: vec!["nature enthusiast".to_string()],
            social: vec![],
        };

        assert_eq!(
            render_summary(&traits, 0),
            "A creative, nature enthusiast person who brings positive energy to any situation."
        );
        assert_eq!(
            render_summary(&traits, 6),
            "Someone who is creative, nature enthusiast and always up for new experiences."
        );
    }

    #[test]
    fn test_generate_summary_is_reproducible_with_seed() {
        let profile = create_profile("Art", "", &["Music", "Travel"]);

        let first = generate_summary(&profile, &mut StdRng::seed_from_u64(42));
        let second = generate_summary(&profile, &mut StdRng::seed_from_u64(42));

        assert_eq!(first, second);

        let traits = extract_traits(&profile);
        let candidates: Vec<String> = (0..SUMMARY_TEMPLATES.len())
            .map(|i| render_summary(&traits, i))
            .collect();
        assert!(candidates.contains(&first));
    }
}
