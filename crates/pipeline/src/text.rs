//! Text normalization shared by the filters.
//!
//! Everything here is a pure function over `&str`. Lengths are counted in
//! `char`s, not bytes, so an accented letter counts once.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Accented letter -> base Latin letter.
///
/// Covers the vowels with acute, grave, diaeresis, circumflex and tilde,
/// `ý`/`ÿ`, and the ordinal indicators `ª`/`º`. Letters that change meaning
/// when folded (`ñ`, `ç`) are deliberately absent.
const DIACRITICS: &[(char, char)] = &[
    ('á', 'a'), ('à', 'a'), ('ä', 'a'), ('â', 'a'), ('ã', 'a'), ('ª', 'a'),
    ('Á', 'A'), ('À', 'A'), ('Ä', 'A'), ('Â', 'A'), ('Ã', 'A'),
    ('é', 'e'), ('è', 'e'), ('ë', 'e'), ('ê', 'e'),
    ('É', 'E'), ('È', 'E'), ('Ë', 'E'), ('Ê', 'E'),
    ('í', 'i'), ('ì', 'i'), ('ï', 'i'), ('î', 'i'),
    ('Í', 'I'), ('Ì', 'I'), ('Ï', 'I'), ('Î', 'I'),
    ('ó', 'o'), ('ò', 'o'), ('ö', 'o'), ('ô', 'o'), ('õ', 'o'), ('º', 'o'),
    ('Ó', 'O'), ('Ò', 'O'), ('Ö', 'O'), ('Ô', 'O'), ('Õ', 'O'),
    ('ú', 'u'), ('ù', 'u'), ('ü', 'u'), ('û', 'u'),
    ('Ú', 'U'), ('Ù', 'U'), ('Ü', 'U'), ('Û', 'U'),
    ('ý', 'y'), ('ÿ', 'y'),
    ('Ý', 'Y'),
];

static FOLD_TABLE: LazyLock<HashMap<char, char>> =
    LazyLock::new(|| DIACRITICS.iter().copied().collect());

/// `ig:` plus whatever handle follows it, up to the next whitespace
static INSTAGRAM_HANDLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ig:\s*\S*").expect("static regex"));

/// `@handle`, up to the next whitespace
static AT_HANDLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@\S*").expect("static regex"));

/// Emoji blocks that get stripped before measuring a bio
const EMOJI_RANGES: &[(u32, u32)] = &[
    (0x1F300, 0x1F64F), // misc symbols & pictographs, emoticons
    (0x1F680, 0x1F6FF), // transport & map
    (0x2600, 0x26FF),   // misc symbols
    (0x2700, 0x27BF),   // dingbats
];

/// Replace every accented letter in the table by its base letter.
pub fn fold_diacritics(text: &str) -> String {
    text.chars()
        .map(|c| FOLD_TABLE.get(&c).copied().unwrap_or(c))
        .collect()
}

/// Lower-case, then fold diacritics. This is the form bios are matched in.
pub fn normalize(text: &str) -> String {
    fold_diacritics(&text.to_lowercase())
}

pub fn is_emoji(c: char) -> bool {
    let code = c as u32;
    EMOJI_RANGES
        .iter()
        .any(|&(start, end)| (start..=end).contains(&code))
}

pub fn remove_emoji(text: &str) -> String {
    text.chars().filter(|&c| !is_emoji(c)).collect()
}

/// Lower-case the text and remove the first `ig:` handle and the first
/// `@` handle, then trim.
pub fn strip_handles(text: &str) -> String {
    let lowered = text.to_lowercase();
    let without_ig = INSTAGRAM_HANDLE.replacen(&lowered, 1, "");
    let without_at = AT_HANDLE.replacen(&without_ig, 1, "");
    without_at.trim().to_string()
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Bio squeezed onto one line for progress output: emoji removed, line
/// breaks turned into spaces, cut to `max_chars`.
pub fn preview(text: &str, max_chars: usize) -> String {
    remove_emoji(text)
        .chars()
        .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
        .take(max_chars)
        .collect()
}
