//! Positional character-class conditions attached to affix rules.
//!
//! A condition such as `[^aeiou]y` is compiled into one slot per
//! position. Prefix rules test slots from the start of the word, suffix
//! rules from the end.

use crate::error::ConditionError;

/// Which end of the word a condition is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Any,
    OneOf(Vec<char>),
    NoneOf(Vec<char>),
}

impl Slot {
    fn set(members: Vec<char>, negated: bool) -> Self {
        let mut members = members;
        members.sort_unstable();
        members.dedup();
        if negated {
            Slot::NoneOf(members)
        } else {
            Slot::OneOf(members)
        }
    }

    fn accepts(&self, ch: char) -> bool {
        match self {
            Slot::Any => true,
            Slot::OneOf(set) => set.binary_search(&ch).is_ok(),
            Slot::NoneOf(set) => set.binary_search(&ch).is_err(),
        }
    }
}

/// A compiled condition pattern.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Condition {
    slots: Vec<Slot>,
}

impl Condition {
    /// The condition written as `.`: no constraint at all.
    pub fn any() -> Self {
        Self::default()
    }

    /// Compile a Hunspell condition pattern.
    ///
    /// A bracket group missing its closing `]` swallows the rest of the
    /// pattern; dictionaries in the wild contain such conditions. A group
    /// with no members is rejected since nothing could ever satisfy it.
    pub fn compile(pattern: &str) -> Result<Self, ConditionError> {
        if pattern == "." {
            return Ok(Self::any());
        }

        let mut slots = Vec::new();
        let mut chars = pattern.chars();

        while let Some(ch) = chars.next() {
            match ch {
                '.' => slots.push(Slot::Any),
                '[' => {
                    let mut negated = false;
                    let mut members = Vec::new();
                    let mut first = true;
                    for inner in chars.by_ref() {
                        match inner {
                            ']' => break,
                            '^' if first => negated = true,
                            other => members.push(other),
                        }
                        first = false;
                    }
                    if members.is_empty() {
                        return Err(ConditionError {
                            pattern: pattern.to_string(),
                            reason: "empty character class",
                        });
                    }
                    slots.push(Slot::set(members, negated));
                }
                literal => slots.push(Slot::OneOf(vec![literal])),
            }
        }

        Ok(Self { slots })
    }

    /// Number of character positions this condition constrains.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn is_unconstrained(&self) -> bool {
        self.slots.is_empty()
    }

    /// Test `word` against the condition from the given end.
    ///
    /// A word shorter than the condition always matches: it cannot
    /// violate positions it does not reach.
    pub fn matches(&self, word: &str, anchor: Anchor) -> bool {
        if self.slots.is_empty() || word.chars().count() < self.slots.len() {
            return true;
        }

        match anchor {
            Anchor::Start => self
                .slots
                .iter()
                .zip(word.chars())
                .all(|(slot, ch)| slot.accepts(ch)),
            Anchor::End => self
                .slots
                .iter()
                .rev()
                .zip(word.chars().rev())
                .all(|(slot, ch)| slot.accepts(ch)),
        }
    }
}
