use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

// Whitespace runs, bare line breaks, and literal "\r" / "\n" left by escaped markup.
static NAME_NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}|[\r\n]|\\r|\\n").unwrap());

/// Strip layout noise from a station or city name before it is used as a
/// lookup key or displayed.
pub fn clean_name(raw: &str) -> String {
    NAME_NOISE.replace_all(raw, "").trim().to_string()
}

/// Latin-script rendering of a Chinese name.
pub trait Transliterator: Send + Sync {
    fn transliterate(&self, text: &str) -> String;
}

/// Character-wise pinyin, one capitalized syllable per character.
#[derive(Debug, Default, Clone, Copy)]
pub struct PinyinTransliterator;

impl Transliterator for PinyinTransliterator {
    fn transliterate(&self, text: &str) -> String {
        deunicode::deunicode(text)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Names the character-wise rule gets wrong.
pub fn builtin_overrides() -> HashMap<String, String> {
    // 重 reads "chong" here, not "zhong".
    HashMap::from([("重庆".to_string(), "Chongqing".to_string())])
}

/// Display names for stations and cities: overrides first, then transliteration.
pub struct NameResolver {
    overrides: HashMap<String, String>,
    transliterator: Box<dyn Transliterator>,
}

impl NameResolver {
    pub fn new(transliterator: Box<dyn Transliterator>) -> Self {
        Self {
            overrides: builtin_overrides(),
            transliterator,
        }
    }

    /// Add or replace override entries. Keys are matched after `clean_name`.
    pub fn with_overrides<I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.overrides
            .extend(overrides.into_iter().map(|(k, v)| (clean_name(&k), v)));
        self
    }

    pub fn display(&self, name: &str) -> String {
        match self.overrides.get(name) {
            Some(name) => name.clone(),
            None => self.transliterator.transliterate(name),
        }
    }

    /// `city` is prefixed when given; both halves go through `display`.
    pub fn location(&self, city: Option<&str>, station: &str) -> String {
        match city {
            Some(city) if !city.is_empty() => {
                format!("{} {}", self.display(city), self.display(station))
            }
            _ => self.display(station),
        }
    }
}

impl Default for NameResolver {
    fn default() -> Self {
        Self::new(Box::new(PinyinTransliterator))
    }
}
