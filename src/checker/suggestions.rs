//! Candidate generation for words the dictionary does not know.
//!
//! Every pass builds candidate strings and checks them against the
//! lexicon. A hit whose expansion contains the word being corrected proves the
//! word was a licensed inflection after all, and the search stops with an
//! empty answer. Any other hit becomes a suggestion.

use crate::checker::dictionary::Lexicon;
use aho_corasick::AhoCorasick;
use std::collections::HashSet;
use std::ops::ControlFlow;
use tracing::warn;

/// First letter upper case, the rest lower case.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

pub fn is_uppercase(word: &str) -> bool {
    word == word.to_uppercase()
}

pub fn is_lowercase(word: &str) -> bool {
    word == word.to_lowercase()
}

pub fn is_capitalized(word: &str) -> bool {
    word == capitalize(word)
}

pub fn is_mixed_case(word: &str) -> bool {
    !is_lowercase(word) && !is_uppercase(word) && !is_capitalized(word)
}

/// Correction search over a [`Lexicon`].
#[derive(Debug)]
pub struct SuggestionEngine<L> {
    lexicon: L,
    replacements: Option<AhoCorasick>,
}

impl<L: Lexicon> SuggestionEngine<L> {
    pub fn new(lexicon: L) -> Self {
        let table = lexicon.replacement_table();
        let replacements = if table.is_empty() {
            None
        } else {
            match AhoCorasick::new(table.iter().map(|rep| rep.pattern.as_str())) {
                Ok(matcher) => Some(matcher),
                Err(e) => {
                    warn!("replacement table unusable, skipping it: {}", e);
                    None
                }
            }
        };

        Self {
            lexicon,
            replacements,
        }
    }

    pub fn lexicon(&self) -> &L {
        &self.lexicon
    }

    /// Whether `word`, or its lower-case form when it is upper case or
    /// capitalized, is a dictionary word.
    pub fn is_known(&self, word: &str) -> bool {
        if self.lexicon.contains(word) {
            return true;
        }
        (is_uppercase(word) || is_capitalized(word)) && self.lexicon.contains(&word.to_lowercase())
    }

    /// Suggest corrections for `word`.
    ///
    /// Returns an empty list when the word is correct, and `[word]` when
    /// nothing could be found.
    pub fn suggest(&self, word: &str) -> Vec<String> {
        if self.is_known(word) {
            return Vec::new();
        }

        let mut search = Search {
            lexicon: &self.lexicon,
            replacements: self.replacements.as_ref(),
            word,
            chars: word.chars().collect(),
            tried: HashSet::new(),
            found: Vec::new(),
        };

        if search.run().is_break() {
            return Vec::new();
        }
        if search.found.is_empty() {
            return vec![word.to_string()];
        }
        search.found
    }
}

struct Search<'a, L> {
    lexicon: &'a L,
    replacements: Option<&'a AhoCorasick>,
    word: &'a str,
    chars: Vec<char>,
    tried: HashSet<String>,
    found: Vec<String>,
}

impl<'a, L: Lexicon> Search<'a, L> {
    fn run(&mut self) -> ControlFlow<()> {
        self.deletions()?;
        self.replacements()?;
        self.substitutions()?;
        self.insertions()?;
        self.transpositions()?;
        self.splits();
        if self.found.is_empty() {
            self.truncations()?;
        }
        ControlFlow::Continue(())
    }

    /// Whether the entry for `candidate` licenses the word being corrected.
    fn licenses_word(&self, candidate: &str) -> Option<bool> {
        self.lexicon
            .lookup(candidate)
            .map(|entry| self.lexicon.expand(entry).contains(self.word))
    }

    fn offer(&mut self, candidate: String) -> ControlFlow<()> {
        if self.tried.contains(&candidate) {
            return ControlFlow::Continue(());
        }
        match self.licenses_word(&candidate) {
            Some(true) => return ControlFlow::Break(()),
            Some(false) => self.found.push(candidate.clone()),
            None => {}
        }
        self.tried.insert(candidate);
        ControlFlow::Continue(())
    }

    /// Record a multi-word candidate without re-expansion.
    fn offer_phrase(&mut self, phrase: String) {
        if self.tried.insert(phrase.clone()) {
            self.found.push(phrase);
        }
    }

    fn deletions(&mut self) -> ControlFlow<()> {
        for i in 0..self.chars.len() {
            let candidate: String = self
                .chars
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, c)| c)
                .collect();
            self.offer(candidate)?;
        }
        ControlFlow::Continue(())
    }

    fn replacements(&mut self) -> ControlFlow<()> {
        let Some(matcher) = self.replacements else {
            return ControlFlow::Continue(());
        };
        let table = self.lexicon.replacement_table();
        let word = self.word;

        let mut hits: Vec<(usize, usize, usize)> = matcher
            .find_overlapping_iter(word)
            .map(|m| (m.pattern().as_usize(), m.start(), m.end()))
            .collect();
        hits.sort_unstable();

        for (pattern, start, end) in hits {
            let rep = &table[pattern];
            if (rep.at_start && start != 0) || (rep.at_end && end != word.len()) {
                continue;
            }
            let candidate = format!("{}{}{}", &word[..start], rep.replacement, &word[end..]);

            if candidate.contains(' ') {
                let all_known = candidate
                    .split(' ')
                    .all(|part| !part.is_empty() && self.lexicon.contains(part));
                if all_known {
                    self.offer_phrase(candidate);
                }
            } else {
                self.offer(candidate)?;
            }
        }
        ControlFlow::Continue(())
    }

    fn substitutions(&mut self) -> ControlFlow<()> {
        let lexicon = self.lexicon;
        for &try_char in lexicon.try_characters() {
            for i in 0..self.chars.len() {
                if self.chars[i] == try_char {
                    continue;
                }
                let mut candidate = self.chars.clone();
                candidate[i] = try_char;
                self.offer(candidate.into_iter().collect())?;
            }
        }
        ControlFlow::Continue(())
    }

    fn insertions(&mut self) -> ControlFlow<()> {
        let lexicon = self.lexicon;
        for &try_char in lexicon.try_characters() {
            for i in 0..=self.chars.len() {
                let mut candidate = self.chars.clone();
                candidate.insert(i, try_char);
                self.offer(candidate.into_iter().collect())?;
            }
        }
        ControlFlow::Continue(())
    }

    fn transpositions(&mut self) -> ControlFlow<()> {
        for i in 0..self.chars.len().saturating_sub(1) {
            if self.chars[i] == self.chars[i + 1] {
                continue;
            }
            let mut candidate = self.chars.clone();
            candidate.swap(i, i + 1);
            self.offer(candidate.into_iter().collect())?;
        }
        ControlFlow::Continue(())
    }

    /// Two run-together words, as typed and with each half capitalized.
    fn splits(&mut self) {
        if self.chars.len() <= 3 {
            return;
        }

        let halves: Vec<(String, String)> = (1..self.chars.len())
            .map(|i| {
                (
                    self.chars[..i].iter().collect(),
                    self.chars[i..].iter().collect(),
                )
            })
            .collect();

        for (left, right) in &halves {
            if self.lexicon.contains(left) && self.lexicon.contains(right) {
                self.offer_phrase(format!("{} {}", left, right));
            }
        }

        for (left, right) in &halves {
            let (left, right) = (capitalize(left), capitalize(right));
            if self.lexicon.contains(&left) && self.lexicon.contains(&right) {
                self.offer_phrase(format!("{} {}", left, right));
            }
        }
    }

    /// Long affixes the grammar spells out: look for a root at either end.
    fn truncations(&mut self) -> ControlFlow<()> {
        let len = self.chars.len();
        let prefixes = (1..len).rev().map(|i| self.chars[..i].iter().collect::<String>());
        let suffixes = (1..len).map(|i| self.chars[i..].iter().collect::<String>());

        for candidate in prefixes.chain(suffixes) {
            if self.licenses_word(&candidate) == Some(true) {
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }
}
