//! File name normalization.
//!
//! A name is split at its last `.`; the base is transliterated from Cyrillic
//! (Russian and Ukrainian letters) to Latin, then every character that is not
//! an ASCII letter or digit becomes `_`. The extension is appended unchanged.
//!
//! ```
//! use foldersort::normalize::normalize;
//!
//! assert_eq!(normalize("Фото.JPG"), "Foto.JPG");
//! assert_eq!(normalize("my file (1).txt"), "my_file__1_.txt");
//! ```

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Lowercase Cyrillic letters and their Latin spelling.
///
/// Uppercase letters map to the uppercased spelling. The hard and soft signs
/// have no sound value and map to nothing.
const CYRILLIC_TO_LATIN: [(char, &str); 37] = [
    ('а', "a"),
    ('б', "b"),
    ('в', "v"),
    ('г', "g"),
    ('д', "d"),
    ('е', "e"),
    ('ё', "e"),
    ('ж', "j"),
    ('з', "z"),
    ('и', "i"),
    ('й', "j"),
    ('к', "k"),
    ('л', "l"),
    ('м', "m"),
    ('н', "n"),
    ('о', "o"),
    ('п', "p"),
    ('р', "r"),
    ('с', "s"),
    ('т', "t"),
    ('у', "u"),
    ('ф', "f"),
    ('х', "h"),
    ('ц', "ts"),
    ('ч', "ch"),
    ('ш', "sh"),
    ('щ', "sch"),
    ('ъ', ""),
    ('ы', "y"),
    ('ь', ""),
    ('э', "e"),
    ('ю', "yu"),
    ('я', "ya"),
    ('є', "je"),
    ('і', "i"),
    ('ї', "ji"),
    ('ґ', "g"),
];

static TRANSLITERATION: LazyLock<HashMap<char, String>> = LazyLock::new(|| {
    let mut table = HashMap::with_capacity(CYRILLIC_TO_LATIN.len() * 2);
    for (cyrillic, latin) in CYRILLIC_TO_LATIN {
        table.insert(cyrillic, latin.to_string());
        for upper in cyrillic.to_uppercase() {
            table.insert(upper, latin.to_uppercase());
        }
    }
    table
});

static RE_NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]").expect("Invalid regex"));

/// Splits a file name at its last `.`.
///
/// The extension keeps its dot and is empty when the name has none. A name
/// that starts with its only dot is all extension.
///
/// ```
/// use foldersort::normalize::split_extension;
///
/// assert_eq!(split_extension("photo.final.png"), ("photo.final", ".png"));
/// assert_eq!(split_extension("README"), ("README", ""));
/// assert_eq!(split_extension(".gitignore"), ("", ".gitignore"));
/// ```
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(index) => name.split_at(index),
        None => (name, ""),
    }
}

/// Replaces every Cyrillic letter in `text` with its Latin spelling.
///
/// Characters outside the table pass through untouched.
pub fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match TRANSLITERATION.get(&ch) {
            Some(latin) => out.push_str(latin),
            None => out.push(ch),
        }
    }
    out
}

/// Normalizes a file name into a Latin-safe form, keeping its extension.
///
/// Distinct inputs may normalize to the same output; callers moving files
/// onto normalized names must expect collisions.
pub fn normalize(name: &str) -> String {
    let (base, ext) = split_extension(name);
    let latin = transliterate(base);
    let mut normalized = RE_NON_ALNUM.replace_all(&latin, "_").into_owned();
    normalized.push_str(ext);
    normalized
}
