//! Canonical city names.
//!
//! Every cache lookup and every insert goes through [`CityNameNormalizer::normalize`]
//! so that `"london"`, `" London "` and `"LONDON"` all land on the same row.

use regex::Regex;

/// Built-in substitutions, applied in order before case folding.
pub const DEFAULT_REPLACEMENTS: &[(&str, &str)] = &[
    ("[áàâäãåā]", "a"),
    ("[ÁÀÂÄÃÅĀ]", "A"),
    ("[éèêëēě]", "e"),
    ("[ÉÈÊËĒĚ]", "E"),
    ("[íìîïī]", "i"),
    ("[ÍÌÎÏĪ]", "I"),
    ("[óòôöõøőō]", "o"),
    ("[ÓÒÔÖÕØŐŌ]", "O"),
    ("[úùûüűū]", "u"),
    ("[ÚÙÛÜŰŪ]", "U"),
    ("[ýÿ]", "y"),
    ("[ÝŸ]", "Y"),
    ("[ñń]", "n"),
    ("[ÑŃ]", "N"),
    ("[çćč]", "c"),
    ("[ÇĆČ]", "C"),
    ("[śšş]", "s"),
    ("[ŚŠŞ]", "S"),
    ("[źżž]", "z"),
    ("[ŹŻŽ]", "Z"),
    ("ł", "l"),
    ("Ł", "L"),
    ("ß", "ss"),
    (r"\s+", " "),
];

/// Upper bound on passes for tables that never settle.
const MAX_PASSES: usize = 8;

#[derive(Debug, Clone)]
pub struct CityNameNormalizer {
    replacements: Vec<(Regex, String)>,
}

impl CityNameNormalizer {
    /// Build a normalizer from ordered `(pattern, replacement)` pairs.
    ///
    /// # Errors
    ///
    /// Returns the regex error for the first pattern that fails to compile.
    pub fn new<P, R>(rules: &[(P, R)]) -> Result<Self, regex::Error>
    where
        P: AsRef<str>,
        R: AsRef<str>,
    {
        let replacements = rules
            .iter()
            .map(|(pattern, replacement)| {
                Regex::new(pattern.as_ref()).map(|re| (re, replacement.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { replacements })
    }

    /// Apply the substitutions, trim, then title-case each word.
    ///
    /// Case folding can emit characters the table rewrites (`ﬁ` upper-cases
    /// to `FI`, `ẞ` lower-cases to `ß`), so passes repeat until the output
    /// stops changing.
    #[must_use]
    pub fn normalize(&self, raw: &str) -> String {
        let mut current = self.normalize_once(raw);
        for _ in 1..MAX_PASSES {
            let next = self.normalize_once(&current);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    fn normalize_once(&self, raw: &str) -> String {
        let substituted = self
            .replacements
            .iter()
            .fold(raw.to_string(), |current, (pattern, replacement)| {
                pattern
                    .replace_all(&current, replacement.as_str())
                    .into_owned()
            });

        substituted
            .split_whitespace()
            .map(title_case)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for CityNameNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_REPLACEMENTS).expect("built-in replacement patterns are valid")
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Upper-case only the first character, leaving the rest as typed.
///
/// The geocoding API is sensitive to the leading letter, independent of how
/// the name is stored.
#[must_use]
pub fn capitalize_first(city: &str) -> String {
    let mut chars = city.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
