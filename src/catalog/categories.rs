//! Genre-name → catalog CategoryId mapping.
//!
//! A static lookup table over the catalog's top-level categories — no
//! network call. Unknown names resolve to "no constraint", never an error.

/// Top-level genres offered by the genre question, with their catalog ids.
pub const GENRE_CATEGORIES: &[(&str, u32)] = &[
    ("한국소설(2000년대 이후)", 50993),
    ("에세이", 55889),
    ("시", 50246),
    ("추리/스릴러", 50928),
    ("과학", 987),
    ("인문학", 656),
    ("역사", 74),
    ("경제경영", 170),
    ("자기계발", 336),
    ("IT/컴퓨터", 798),
    ("어린이", 1108),
    ("청소년", 1137),
    ("예술/대중문화", 517),
];

/// Genre names in display order, for the genre question's option list.
pub fn genre_options() -> Vec<&'static str> {
    GENRE_CATEGORIES.iter().map(|(name, _)| *name).collect()
}

/// Resolve a genre name to its CategoryId.
pub fn category_id_for(genre: &str) -> Option<u32> {
    GENRE_CATEGORIES
        .iter()
        .find(|(name, _)| *name == genre)
        .map(|(_, id)| *id)
}
