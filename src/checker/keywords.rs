// src/checker/keywords.rs
// =============================================================================
// Keyword density: how often a phrase appears per hundred words of body text.
//
// Patterns are compiled once per run and shared by every document worker.
// Matching is whole-word and case-insensitive, so "brazil visa" matches
// "Brazil Visa," but not "brazil visas".
// =============================================================================

use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    patterns: Vec<(String, Regex)>,
}

impl KeywordMatcher {
    pub fn new(keywords: &[String]) -> Result<Self, regex::Error> {
        let patterns = keywords
            .iter()
            .map(|keyword| {
                let pattern = format!(r"\b{}\b", regex::escape(keyword.trim()));
                let regex = RegexBuilder::new(&pattern).case_insensitive(true).build()?;
                Ok((keyword.clone(), regex))
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { patterns })
    }

    // Density per keyword, as a percentage rounded to two places
    //
    // A page with no words gets 0.0 for every keyword.
    pub fn densities(&self, text: &str, word_count: usize) -> BTreeMap<String, f64> {
        self.patterns
            .iter()
            .map(|(keyword, regex)| {
                let density = if word_count == 0 {
                    0.0
                } else {
                    let hits = regex.find_iter(text).count();
                    round2(hits as f64 / word_count as f64 * 100.0)
                };
                (keyword.clone(), density)
            })
            .collect()
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
