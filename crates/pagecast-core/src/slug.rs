//! Titles and URL slugs.
//!
//! Slugs are derived deterministically from titles: Cyrillic letters are
//! transliterated through a fixed table, ASCII letters and digits are kept,
//! and everything else collapses into single `-` separators.

use std::collections::{HashMap, HashSet};

use unicode_normalization::UnicodeNormalization;

/// Title used when the query has no words.
pub const PLACEHOLDER_TITLE: &str = "Подробнее";

/// Slug used when nothing survives transliteration.
pub const PLACEHOLDER_SLUG: &str = "page";

/// Capitalize the first character of every whitespace-separated word.
///
/// Words are re-joined with single spaces.
pub fn title_case(text: &str) -> String {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();

    if words.is_empty() {
        PLACEHOLDER_TITLE.to_string()
    } else {
        words.join(" ")
    }
}

/// Convert a title into a candidate slug matching `^[a-z0-9]+(-[a-z0-9]+)*$`.
pub fn slugify(title: &str) -> String {
    let normalized: String = title.trim().nfkc().collect::<String>().to_lowercase();

    let mut slug = String::with_capacity(normalized.len());
    let mut pending_dash = false;

    for ch in normalized.chars() {
        let mapped = if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            Some(Translit::Char(ch))
        } else {
            transliterate(ch).map(Translit::Str)
        };

        match mapped {
            // Hard and soft signs vanish without splitting the word.
            Some(Translit::Str("")) => {}
            Some(piece) => {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                match piece {
                    Translit::Char(c) => slug.push(c),
                    Translit::Str(s) => slug.push_str(s),
                }
            }
            None => pending_dash = true,
        }
    }

    if slug.is_empty() {
        PLACEHOLDER_SLUG.to_string()
    } else {
        slug
    }
}

enum Translit {
    Char(char),
    Str(&'static str),
}

fn transliterate(ch: char) -> Option<&'static str> {
    let latin = match ch {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "kh",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' => "",
        'ы' => "y",
        'ь' => "",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(latin)
}

/// Tracks slug usage for one build invocation.
///
/// Holds the per-candidate counters for the current run, every slug minted
/// so far, and the slugs already present in the post log.
#[derive(Debug, Clone, Default)]
pub struct SlugRegistry {
    counts: HashMap<String, u32>,
    minted: HashSet<String>,
    recorded: HashSet<String>,
}

impl SlugRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry that knows the slugs recorded by earlier runs.
    #[must_use]
    pub fn seeded<I, S>(recorded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            recorded: recorded
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.trim().is_empty())
                .collect(),
            ..Self::default()
        }
    }

    /// Return a slug no earlier call in this run has returned.
    ///
    /// The first use of a candidate returns it unchanged; later uses append
    /// `-2`, `-3`, ... skipping suffixed forms that were already handed out.
    pub fn ensure_unique(&mut self, candidate: &str) -> String {
        let count = self.counts.entry(candidate.to_string()).or_insert(0);
        loop {
            *count += 1;
            let slug = if *count == 1 {
                candidate.to_string()
            } else {
                format!("{candidate}-{count}")
            };
            if self.minted.insert(slug.clone()) {
                return slug;
            }
        }
    }

    /// Whether the slug was already written to the post log by an earlier run.
    #[must_use]
    pub fn is_recorded(&self, slug: &str) -> bool {
        self.recorded.contains(slug)
    }

    /// Number of slugs known from the post log.
    #[must_use]
    pub fn recorded_len(&self) -> usize {
        self.recorded.len()
    }
}
