/// Personality adjectives recognised in bios
pub const PERSONALITY_KEYWORDS: &[&str] = &[
    "outgoing", "introvert", "extrovert", "creative", "analytical", "adventurous",
    "calm", "energetic", "funny", "serious", "organized", "spontaneous",
    "athletic", "artistic", "academic", "social", "independent", "team player",
];

/// Hobby nouns recognised in bios
pub const HOBBY_KEYWORDS: &[&str] = &[
    "music", "sports", "gaming", "reading", "travel", "cooking", "photography",
    "fitness", "dancing", "writing", "volunteering", "hiking", "fashion",
];

/// Full vocabulary: personality keywords followed by hobby keywords
pub fn vocabulary() -> impl Iterator<Item = &'static str> {
    PERSONALITY_KEYWORDS.iter().chain(HOBBY_KEYWORDS.iter()).copied()
}

/// Extract the known keywords that occur in `text`
///
/// Matching is plain substring containment, not word matching: "socially"
/// yields "social". `text` is expected to be lowercased by the caller.
/// The result is distinct and in vocabulary order.
pub fn extract_keywords(text: &str) -> Vec<&'static str> {
    vocabulary().filter(|keyword| text.contains(keyword)).collect()
}

/// Jaccard similarity of the keyword sets of two bios (0-1)
///
/// Bios are lowercased here. Returns 0 when neither bio has a keyword.
pub fn bio_similarity(bio1: &str, bio2: &str) -> f64 {
    let keywords1 = extract_keywords(&bio1.to_lowercase());
    let keywords2 = extract_keywords(&bio2.to_lowercase());

    let common = keywords1.iter().filter(|k| keywords2.contains(k)).count();
    let union = keywords1.len() + keywords2.len() - common;

    if union > 0 {
        common as f64 / union as f64
    } else {
        0.0
    }
}
