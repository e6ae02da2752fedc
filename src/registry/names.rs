//! Two-part species name generation
//!
//! Syllables come from registry data so tests can fabricate their own.

use serde::{Deserialize, Serialize};

use crate::core::rng::RandomStream;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameGenerator {
    pub prefixes: Vec<String>,
    #[serde(default)]
    pub cofixes: Vec<String>,
    pub suffixes: Vec<String>,
}

impl NameGenerator {
    /// Generate a (genus, epithet) pair
    pub fn generate<R: RandomStream + ?Sized>(&self, rng: &mut R) -> (String, String) {
        let genus = capitalize(&self.word(rng, true));
        let epithet = self.word(rng, false).to_lowercase();
        (genus, epithet)
    }

    fn word<R: RandomStream + ?Sized>(&self, rng: &mut R, allow_cofix: bool) -> String {
        let mut word = pick(&self.prefixes, rng).to_string();
        if allow_cofix && !self.cofixes.is_empty() && rng.coin_flip() {
            word.push_str(pick(&self.cofixes, rng));
        }
        word.push_str(pick(&self.suffixes, rng));
        word
    }
}

fn pick<'a, R: RandomStream + ?Sized>(items: &'a [String], rng: &mut R) -> &'a str {
    items
        .get(rng.next_index(items.len()))
        .map(String::as_str)
        .unwrap_or("")
}

fn capitalize(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
