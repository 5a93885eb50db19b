//! Ranking entry model and insertion-ordered count mapping.
//!
//! # Responsibility
//! - Define the `(name, count)` record persisted as one table row.
//! - Keep name→count pairs in insertion order with an explicit zero default.
//! - Normalize incoming names to title case.
//!
//! # Invariants
//! - Counts are unsigned; an absent name reads as `0` and is not inserted.
//! - Iteration order is insertion order. Updating an existing name keeps its
//!   first slot.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// Cased characters only: digits, punctuation and uncased scripts split words.
static CASED_RUN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{Uppercase}\p{Lowercase}\p{Lt}]+").expect("valid cased run regex")
});

/// One ranked name and how many times it was counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Unique key within a ranking.
    pub name: String,
    /// Number of increments recorded for `name`.
    pub count: u64,
}

impl Entry {
    pub fn new(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// Converts a name to title case.
///
/// Every run of cased characters gets a titlecase first character and a
/// lowercase remainder, so `"aLICE"` and `"alice"` both become `"Alice"` and
/// `"mary-jane o'neil"` becomes `"Mary-Jane O'Neil"`.
///
/// Only the Latin digraphs (`ǅ`, `ǈ`, `ǋ`, `ǲ`) get a dedicated titlecase
/// form. Any other first character is uppercased, so characters whose
/// titlecase mapping differs from uppercase (e.g. `ß`, `ﬁ`) take the
/// uppercase form (`SS`, `FI`).
pub fn normalize_name(name: &str) -> String {
    CASED_RUN_RE
        .replace_all(name, |caps: &Captures<'_>| {
            let mut chars = caps[0].chars();
            match chars.next() {
                Some(first) => {
                    let mut word = titlecase(first);
                    word.push_str(&chars.as_str().to_lowercase());
                    word
                }
                None => String::new(),
            }
        })
        .into_owned()
}

fn titlecase(c: char) -> String {
    match c {
        '\u{01C4}'..='\u{01C6}' => '\u{01C5}'.to_string(),
        '\u{01C7}'..='\u{01C9}' => '\u{01C8}'.to_string(),
        '\u{01CA}'..='\u{01CC}' => '\u{01CB}'.to_string(),
        '\u{01F1}'..='\u{01F3}' => '\u{01F2}'.to_string(),
        other => other.to_uppercase().collect(),
    }
}

/// Insertion-ordered mapping from name to count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankingMap {
    counts: IndexMap<String, u64>,
}

impl RankingMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the count for `name`, or `0` when the name was never recorded.
    pub fn get_or_zero(&self, name: &str) -> u64 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.counts.contains_key(name)
    }

    /// Sets an absolute count.
    ///
    /// A new name is appended; an existing name keeps its position.
    pub fn set(&mut self, name: impl Into<String>, count: u64) {
        self.counts.insert(name.into(), count);
    }

    /// Adds one to `name` and returns the new count.
    ///
    /// The key is used verbatim; callers normalize first.
    pub fn increment(&mut self, name: impl Into<String>) -> u64 {
        let slot = self.counts.entry(name.into()).or_insert(0);
        *slot = slot.saturating_add(1);
        *slot
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates `(name, count)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.counts
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
    }

    /// Returns the highest-count name not listed in `exclude`.
    ///
    /// Among equal counts the name that comes first in iteration order wins.
    /// Exclusion compares names verbatim.
    pub fn most_popular(&self, exclude: &[&str]) -> Option<&str> {
        let mut best: Option<(&str, u64)> = None;
        for (name, count) in self.iter() {
            if exclude.contains(&name) {
                continue;
            }
            match best {
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some((name, count)),
            }
        }
        best.map(|(name, _)| name)
    }

    /// Returns every entry ordered by count descending.
    ///
    /// The sort is stable, so ties keep iteration order.
    pub fn ranked(&self) -> Vec<Entry> {
        let mut entries: Vec<Entry> = self
            .iter()
            .map(|(name, count)| Entry::new(name, count))
            .collect();
        entries.sort_by(|left, right| right.count.cmp(&left.count));
        entries
    }
}

impl<N: Into<String>> FromIterator<(N, u64)> for RankingMap {
    fn from_iter<I: IntoIterator<Item = (N, u64)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, count) in iter {
            map.set(name, count);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_name, RankingMap};

    #[test]
    fn normalize_name_title_cases_each_word() {
        assert_eq!(normalize_name("aLICE"), "Alice");
        assert_eq!(normalize_name("alice"), "Alice");
        assert_eq!(normalize_name("mary-jane o'neil"), "Mary-Jane O'Neil");
        assert_eq!(normalize_name("1st place"), "1St Place");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn normalize_name_uses_titlecase_digraphs_and_other_cased_letters() {
        assert_eq!(normalize_name("\u{01C6}emal"), "\u{01C5}emal");
        assert_eq!(normalize_name("\u{01C4}EMAL"), "\u{01C5}emal");
        assert_eq!(normalize_name("\u{2170}v"), "\u{2160}v");
    }

    #[test]
    fn get_or_zero_does_not_insert() {
        let map = RankingMap::new();
        assert_eq!(map.get_or_zero("Ghost"), 0);
        assert!(!map.contains("Ghost"));
        assert!(map.is_empty());
    }

    #[test]
    fn set_existing_name_keeps_position() {
        let mut map: RankingMap = [("Bob", 1), ("Ann", 2)].into_iter().collect();
        map.set("Bob", 9);

        let names: Vec<&str> = map.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Bob", "Ann"]);
        assert_eq!(map.get_or_zero("Bob"), 9);
    }

    #[test]
    fn most_popular_breaks_ties_by_iteration_order() {
        let map: RankingMap = [("Zed", 4), ("Amy", 4), ("Max", 1)].into_iter().collect();
        assert_eq!(map.most_popular(&[]), Some("Zed"));
        assert_eq!(map.most_popular(&["Zed"]), Some("Amy"));
        assert_eq!(map.most_popular(&["Zed", "Amy", "Max"]), None);
    }

    #[test]
    fn ranked_is_stable_descending() {
        let map: RankingMap = [("C", 1), ("A", 3), ("B", 3)].into_iter().collect();
        let names: Vec<String> = map.ranked().into_iter().map(|entry| entry.name).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }
}
