use serde::{Deserialize, Serialize};
use std::fmt;

/// Field-of-study category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MajorCategory {
    #[serde(rename = "STEM")]
    Stem,
    Business,
    #[serde(rename = "Liberal Arts")]
    LiberalArts,
    Arts,
    Health,
    Other,
}

impl MajorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MajorCategory::Stem => "STEM",
            MajorCategory::Business => "Business",
            MajorCategory::LiberalArts => "Liberal Arts",
            MajorCategory::Arts => "Arts",
            MajorCategory::Health => "Health",
            MajorCategory::Other => "Other",
        }
    }
}

impl fmt::Display for MajorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical majors per category, in classification order
///
/// Biology and Pre-Med are listed under both STEM and Health; since STEM is
/// scanned first they always classify as STEM.
pub const MAJOR_CATEGORIES: &[(MajorCategory, &[&str])] = &[
    (
        MajorCategory::Stem,
        &["computer science", "engineering", "mathematics", "physics", "chemistry", "biology", "pre-med"],
    ),
    (
        MajorCategory::Business,
        &["business", "marketing", "finance", "economics"],
    ),
    (
        MajorCategory::LiberalArts,
        &["english", "history", "philosophy", "political science", "sociology"],
    ),
    (MajorCategory::Arts, &["art", "music", "communications"]),
    (MajorCategory::Health, &["pre-med", "psychology", "biology"]),
];

/// Unordered category pairs that count as related
const RELATED_CATEGORIES: &[(MajorCategory, MajorCategory)] = &[
    (MajorCategory::Stem, MajorCategory::Health),
    (MajorCategory::Business, MajorCategory::LiberalArts),
    (MajorCategory::Arts, MajorCategory::LiberalArts),
];

/// Whether `major` contains any canonical major of `category`
pub fn mentions_category(major: &str, category: MajorCategory) -> bool {
    let major = major.to_lowercase();
    MAJOR_CATEGORIES
        .iter()
        .filter(|(c, _)| *c == category)
        .any(|(_, names)| names.iter().any(|name| major.contains(name)))
}

/// Classify a free-text major
///
/// Case-insensitive substring match against the canonical majors; the first
/// category in declaration order wins. Unknown majors are `Other`.
pub fn major_category(major: &str) -> MajorCategory {
    let major = major.to_lowercase();
    MAJOR_CATEGORIES
        .iter()
        .find(|(_, names)| names.iter().any(|name| major.contains(name)))
        .map(|(category, _)| *category)
        .unwrap_or(MajorCategory::Other)
}

/// Whether two categories form one of the related pairs (order-insensitive)
pub fn are_related(a: MajorCategory, b: MajorCategory) -> bool {
    RELATED_CATEGORIES
        .iter()
        .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
}

/// Compatibility of two majors: 1.0 same category, 0.7 related, else 0.3
pub fn major_compatibility(major1: &str, major2: &str) -> f64 {
    category_compatibility(major_category(major1), major_category(major2))
}

#[inline]
pub fn category_compatibility(a: MajorCategory, b: MajorCategory) -> f64 {
    if a == b {
        1.0
    } else if are_related(a, b) {
        0.7
    } else {
        0.3
    }
}
