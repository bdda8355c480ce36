// Core algorithm exports
pub mod avatar;
pub mod keywords;
pub mod majors;
pub mod matcher;
pub mod scoring;
pub mod summary;

pub use avatar::{generate_avatar, generate_random_avatar, random_avatar, avatar_by_index, all_avatars};
pub use keywords::{extract_keywords, bio_similarity};
pub use majors::{MajorCategory, major_category, major_compatibility};
pub use matcher::{Matcher, DeckResult, filter_matches};
pub use scoring::{calculate_compatibility, calculate_compatibility_with};
pub use summary::{PersonalityTraits, generate_summary, extract_traits};
