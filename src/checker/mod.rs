pub mod dictionary;
pub mod suggestions;
pub mod tokenizer;

use crate::error::DictionaryError;
use crate::{CheckResult, Config, Misspelling};
use dictionary::Dictionary;
use rayon::prelude::*;
use regex::Regex;
use std::collections::HashSet;
use std::ops::Range;
use suggestions::{capitalize, is_capitalized, is_mixed_case, is_uppercase, SuggestionEngine};
use tracing::{info, warn};

#[derive(Debug)]
pub struct SpellChecker {
    engine: SuggestionEngine<Dictionary>,
    learned_words: HashSet<String>,
    ignored_words: HashSet<String>,
    ignore_patterns: Vec<Regex>,
    max_suggestions: usize,
    refine: bool,
}

impl SpellChecker {
    pub fn new(config: &Config) -> Result<Self, DictionaryError> {
        let dictionary = Dictionary::load(&config.language, &config.dictionary_dir)?;
        info!(
            language = config.language.as_str(),
            words = dictionary.len(),
            "spell checker ready"
        );
        Ok(Self::with_dictionary(dictionary, config))
    }

    pub fn with_dictionary(dictionary: Dictionary, config: &Config) -> Self {
        // Compile ignore patterns
        let mut ignore_patterns = Vec::new();
        for pattern in &config.ignore_patterns {
            match Regex::new(pattern) {
                Ok(re) => ignore_patterns.push(re),
                Err(e) => warn!(pattern = pattern.as_str(), "invalid ignore pattern: {}", e),
            }
        }

        Self {
            engine: SuggestionEngine::new(dictionary),
            learned_words: HashSet::new(),
            ignored_words: HashSet::new(),
            ignore_patterns,
            max_suggestions: config.max_suggestions,
            refine: config.refine_suggestions,
        }
    }

    pub fn dictionary(&self) -> &Dictionary {
        self.engine.lexicon()
    }

    /// Accept `word` from now on, like a dictionary word: its upper-case
    /// and capitalized forms are accepted too. Nothing is written to disk.
    pub fn learn(&mut self, word: &str) {
        self.learned_words.insert(word.to_string());
    }

    /// Accept exactly `word` from now on, for this checker only.
    pub fn ignore(&mut self, word: &str) {
        self.ignored_words.insert(word.to_string());
    }

    fn is_accepted(&self, word: &str) -> bool {
        if self.ignored_words.contains(word) || self.learned_words.contains(word) {
            return true;
        }
        (is_uppercase(word) || is_capitalized(word))
            && self.learned_words.contains(&word.to_lowercase())
    }

    pub fn is_correct(&self, word: &str) -> bool {
        self.suggest(word).is_empty()
    }

    /// Suggestions for `word`: empty when it is correct, `[word]` when
    /// nothing better was found.
    pub fn suggest(&self, word: &str) -> Vec<String> {
        if self.is_accepted(word) {
            return Vec::new();
        }
        let core = self.engine.suggest(word);
        if !self.refine || core.len() != 1 || core[0] != word {
            return core;
        }
        self.refine(word).unwrap_or(core)
    }

    pub fn suggest_many(&self, words: &[&str]) -> Vec<Vec<String>> {
        words.par_iter().map(|word| self.suggest(word)).collect()
    }

    pub fn check_text(&self, text: &str) -> CheckResult {
        let masked: Vec<Range<usize>> = self
            .ignore_patterns
            .iter()
            .flat_map(|pattern| pattern.find_iter(text).map(|m| m.range()))
            .collect();

        let tokens: Vec<_> = tokenizer::tokenize(text)
            .into_iter()
            .filter(|token| !masked.iter().any(|range| range.contains(&token.offset)))
            .filter(|token| !self.should_ignore(&token.text))
            .collect();

        let errors: Vec<Misspelling> = tokens
            .into_par_iter()
            .filter_map(|token| {
                let mut suggestions = self.suggest(&token.text);
                if suggestions.is_empty() {
                    return None;
                }
                if suggestions.len() == 1 && suggestions[0] == token.text {
                    suggestions.clear();
                }
                suggestions.truncate(self.max_suggestions);
                Some(Misspelling {
                    word: token.text,
                    line: token.line,
                    column: token.column,
                    suggestions,
                })
            })
            .collect();

        CheckResult {
            error_count: errors.len(),
            errors,
        }
    }

    /// Case-aware second opinion for words the engine could not correct.
    fn refine(&self, word: &str) -> Option<Vec<String>> {
        let lower = word.to_lowercase();
        let lower_correct = || self.engine.suggest(&lower).is_empty();

        if (is_uppercase(word) || is_capitalized(word)) && lower_correct() {
            return Some(Vec::new());
        }
        if is_mixed_case(word) && lower_correct() {
            return Some(vec![capitalize(word), lower]);
        }

        let chars: Vec<char> = word.chars().collect();
        let mut found: Vec<String> = Vec::new();
        let mut add = |candidate: String| {
            if !found.contains(&candidate) {
                found.push(candidate);
            }
        };

        for i in 0..chars.len() {
            let deleted: String = chars
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, c)| c)
                .collect();
            if deleted.is_empty() {
                continue;
            }

            let upper = is_uppercase(&deleted);
            let capitalized = is_capitalized(&deleted);
            if (upper || capitalized) && self.engine.suggest(&deleted.to_lowercase()).is_empty() {
                if upper {
                    add(deleted.to_uppercase());
                }
                if capitalized {
                    add(capitalize(&deleted));
                }
            }
            if self.engine.suggest(&deleted).is_empty() {
                add(deleted);
            }
        }

        (!found.is_empty()).then_some(found)
    }

    fn should_ignore(&self, word: &str) -> bool {
        // Skip single characters
        if word.chars().count() <= 1 {
            return true;
        }

        // Skip all numbers
        if word.chars().all(|c| c.is_numeric()) {
            return true;
        }

        self.ignore_patterns.iter().any(|pattern| pattern.is_match(word))
    }
}
