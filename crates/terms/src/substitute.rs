use aho_corasick::{AhoCorasick, MatchKind};
use serde::{Deserialize, Serialize};

use crate::dictionary::{TermDictionary, TermEntry};
use crate::error::TermError;

/// How a dictionary is applied to a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubstitutionMode {
    /// One whole-text replacement pass per entry, longest phrase first.
    /// A target may be re-matched by a later, shorter phrase.
    #[default]
    Sequential,
    /// One scan, leftmost-longest phrase at each position. Replaced text is
    /// never looked at again.
    SinglePass,
}

impl std::fmt::Display for SubstitutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sequential => write!(f, "sequential"),
            Self::SinglePass => write!(f, "single_pass"),
        }
    }
}

/// Replace every dictionary phrase in `text`, longest phrase first.
pub fn substitute(text: &str, dictionary: &TermDictionary) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut result = text.to_string();
    for entry in dictionary.by_length_desc() {
        if result.contains(entry.source.as_str()) {
            result = result.replace(entry.source.as_str(), &entry.target);
        }
    }
    result
}

/// A dictionary prepared for repeated application.
#[derive(Debug, Clone)]
pub struct Substituter {
    mode: SubstitutionMode,
    ordered: Vec<TermEntry>,
    automaton: Option<AhoCorasick>,
}

impl Substituter {
    pub fn new(dictionary: &TermDictionary, mode: SubstitutionMode) -> Result<Self, TermError> {
        let ordered: Vec<TermEntry> = dictionary.by_length_desc().into_iter().cloned().collect();

        let automaton = match mode {
            SubstitutionMode::Sequential => None,
            SubstitutionMode::SinglePass => Some(
                AhoCorasick::builder()
                    .match_kind(MatchKind::LeftmostLongest)
                    .build(ordered.iter().map(|e| e.source.as_str()))
                    .map_err(|e| TermError::Automaton(e.to_string()))?,
            ),
        };

        Ok(Self { mode, ordered, automaton })
    }

    pub fn mode(&self) -> SubstitutionMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn apply(&self, text: &str) -> String {
        self.apply_counted(text).0
    }

    /// Apply the dictionary and report how many replacements were made.
    pub fn apply_counted(&self, text: &str) -> (String, usize) {
        if text.is_empty() || self.ordered.is_empty() {
            return (text.to_string(), 0);
        }

        match &self.automaton {
            None => {
                let mut result = text.to_string();
                let mut count = 0;
                for entry in &self.ordered {
                    let hits = result.matches(entry.source.as_str()).count();
                    if hits > 0 {
                        result = result.replace(entry.source.as_str(), &entry.target);
                        count += hits;
                    }
                }
                (result, count)
            }
            Some(ac) => {
                let mut result = String::with_capacity(text.len());
                let mut count = 0;
                let mut last = 0;
                for m in ac.find_iter(text) {
                    result.push_str(&text[last..m.start()]);
                    result.push_str(&self.ordered[m.pattern().as_usize()].target);
                    last = m.end();
                    count += 1;
                }
                result.push_str(&text[last..]);
                (result, count)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(pairs: &[(&str, &str)]) -> TermDictionary {
        TermDictionary::from_pairs(pairs.iter().copied()).unwrap()
    }

    #[test]
    fn longest_phrase_wins() {
        let d = dict(&[("Stone", "石"), ("Seared Stone", "焼成石")]);
        assert_eq!(substitute("Seared Stone Block", &d), "焼成石 Block");
    }

    #[test]
    fn empty_text_stays_empty() {
        let d = dict(&[("Stone", "石")]);
        assert_eq!(substitute("", &d), "");
        let s = Substituter::new(&d, SubstitutionMode::SinglePass).unwrap();
        assert_eq!(s.apply_counted(""), (String::new(), 0));
    }

    #[test]
    fn every_occurrence_is_replaced() {
        let d = dict(&[("Slime", "スライム")]);
        assert_eq!(substitute("Slime and Slime", &d), "スライム and スライム");
    }

    #[test]
    fn replacement_is_case_sensitive() {
        let d = dict(&[("Altar", "祭壇")]);
        assert_eq!(substitute("altar Altar", &d), "altar 祭壇");
    }

    #[test]
    fn macros_around_phrases_are_kept() {
        let d = dict(&[("Blood Altar", "血の祭壇"), ("Altar", "祭壇")]);
        assert_eq!(
            substitute("Place the $(item)Blood Altar$() on an Altar", &d),
            "Place the $(item)血の祭壇$() on an 祭壇"
        );
    }

    #[test]
    fn sequential_can_rematch_a_target() {
        // Identity mapping followed by a shorter phrase inside it.
        let d = dict(&[("Blood Magic", "Blood Magic"), ("Blood", "血")]);
        assert_eq!(substitute("Blood Magic uses Blood", &d), "血 Magic uses 血");

        let seq = Substituter::new(&d, SubstitutionMode::Sequential).unwrap();
        assert_eq!(seq.apply("Blood Magic uses Blood"), "血 Magic uses 血");
    }

    #[test]
    fn single_pass_never_rematches() {
        let d = dict(&[("Blood Magic", "Blood Magic"), ("Blood", "血")]);
        let s = Substituter::new(&d, SubstitutionMode::SinglePass).unwrap();
        assert_eq!(s.apply("Blood Magic uses Blood"), "Blood Magic uses 血");
    }

    #[test]
    fn single_pass_prefers_longest_at_position() {
        let d = dict(&[("Fence", "フェンス"), ("Fence Gate", "フェンスゲート")]);
        let s = Substituter::new(&d, SubstitutionMode::SinglePass).unwrap();
        assert_eq!(s.apply("Fence Gate next to a Fence"), "フェンスゲート next to a フェンス");
    }

    #[test]
    fn counted_reports_replacements() {
        let d = dict(&[("Casting Table", "鋳造台"), ("Table", "テーブル")]);
        let seq = Substituter::new(&d, SubstitutionMode::Sequential).unwrap();
        let (out, n) = seq.apply_counted("Casting Table, Table");
        assert_eq!(out, "鋳造台, テーブル");
        assert_eq!(n, 2);

        let sp = Substituter::new(&d, SubstitutionMode::SinglePass).unwrap();
        assert_eq!(sp.apply_counted("Casting Table, Table"), (out, 2));
    }

    #[test]
    fn substituter_matches_free_function() {
        let d = dict(&[("Seared", "焼成"), ("Bricks", "レンガ"), ("Seared Bricks", "焼成レンガ")]);
        let s = Substituter::new(&d, SubstitutionMode::Sequential).unwrap();
        for text in ["Seared Bricks Slab", "Cracked Seared Bricks", "Bricks", "Nothing here"] {
            assert_eq!(s.apply(text), substitute(text, &d));
        }
    }

    #[test]
    fn empty_dictionary_is_identity() {
        let d = TermDictionary::new();
        let s = Substituter::new(&d, SubstitutionMode::SinglePass).unwrap();
        assert!(s.is_empty());
        assert_eq!(s.apply("Seared Stone"), "Seared Stone");
        assert_eq!(substitute("Seared Stone", &d), "Seared Stone");
    }
}
