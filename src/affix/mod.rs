pub mod condition;
pub mod expand;
pub mod parser;

use crate::error::GrammarError;
use condition::{Anchor, Condition};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

pub use expand::Expansion;

/// Default for `COMPOUNDMIN` when the grammar omits it or gives a value
/// outside `1..=50`.
pub const DEFAULT_COMPOUND_MIN: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AffixKind {
    Prefix,
    Suffix,
}

impl AffixKind {
    pub fn anchor(self) -> Anchor {
        match self {
            AffixKind::Prefix => Anchor::Start,
            AffixKind::Suffix => Anchor::End,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            AffixKind::Prefix => "PFX",
            AffixKind::Suffix => "SFX",
        }
    }
}

/// How flag strings on dictionary words are split into flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagEncoding {
    #[default]
    Ascii,
    Utf8,
    Long,
    Num,
}

impl FromStr for FlagEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASCII" => Ok(FlagEncoding::Ascii),
            "UTF-8" => Ok(FlagEncoding::Utf8),
            "long" => Ok(FlagEncoding::Long),
            "num" => Ok(FlagEncoding::Num),
            other => Err(format!("unsupported flag type: {}", other)),
        }
    }
}

impl fmt::Display for FlagEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagEncoding::Ascii => write!(f, "ASCII"),
            FlagEncoding::Utf8 => write!(f, "UTF-8"),
            FlagEncoding::Long => write!(f, "long"),
            FlagEncoding::Num => write!(f, "num"),
        }
    }
}

impl FlagEncoding {
    /// Split the flag part of a `word/flags` dictionary line.
    pub fn decode(self, flags: &str) -> Vec<String> {
        match self {
            FlagEncoding::Ascii | FlagEncoding::Utf8 => {
                flags.chars().map(|c| c.to_string()).collect()
            }
            FlagEncoding::Long => {
                let chars: Vec<char> = flags.chars().collect();
                chars
                    .chunks_exact(2)
                    .map(|pair| pair.iter().collect())
                    .collect()
            }
            FlagEncoding::Num => flags
                .split(',')
                .map(str::trim)
                .filter(|flag| !flag.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

/// One PFX or SFX rule line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffixRule {
    pub kind: AffixKind,
    pub strip: String,
    pub append: String,
    pub condition: Condition,
    pub cross_product: bool,
}

impl AffixRule {
    /// Apply the rule to `word`, or `None` if the condition rejects it or
    /// the word does not carry the strip string at the rule's end.
    pub fn apply(&self, word: &str) -> Option<String> {
        if !self.condition.matches(word, self.kind.anchor()) {
            return None;
        }

        let form = match self.kind {
            AffixKind::Prefix => {
                let stem = word.strip_prefix(self.strip.as_str())?;
                format!("{}{}", self.append, stem)
            }
            AffixKind::Suffix => {
                let stem = word.strip_suffix(self.strip.as_str())?;
                format!("{}{}", stem, self.append)
            }
        };

        if form.is_empty() {
            None
        } else {
            Some(form)
        }
    }
}

/// All rules declared under one PFX/SFX header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffixGroup {
    pub kind: AffixKind,
    pub flag: String,
    pub cross_product: bool,
    pub declared: usize,
    pub rules: Vec<AffixRule>,
}

/// One `REP` entry. `_` in the grammar has already been turned into a space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub pattern: String,
    pub replacement: String,
    pub at_start: bool,
    pub at_end: bool,
}

/// Parsed affix grammar: rule groups plus global settings.
#[derive(Debug, Clone)]
pub struct AffixTable {
    pub(crate) prefixes: HashMap<String, AffixGroup>,
    pub(crate) suffixes: HashMap<String, AffixGroup>,
    pub(crate) try_characters: Vec<char>,
    pub(crate) replacements: Vec<Replacement>,
    pub(crate) flag_encoding: FlagEncoding,
    pub(crate) compound_flag: Option<String>,
    pub(crate) compound_min: u8,
    pub(crate) declared_encoding: Option<String>,
}

impl Default for AffixTable {
    fn default() -> Self {
        Self {
            prefixes: HashMap::new(),
            suffixes: HashMap::new(),
            try_characters: Vec::new(),
            replacements: Vec::new(),
            flag_encoding: FlagEncoding::default(),
            compound_flag: None,
            compound_min: DEFAULT_COMPOUND_MIN,
            declared_encoding: None,
        }
    }
}

impl AffixTable {
    /// Parse grammar text. `source` names the file in error messages.
    pub fn parse(text: &str, source: &str) -> Result<Self, GrammarError> {
        parser::AffixParser::new(source).parse(text.lines())
    }

    pub fn prefix_group(&self, flag: &str) -> Option<&AffixGroup> {
        self.prefixes.get(flag)
    }

    pub fn suffix_group(&self, flag: &str) -> Option<&AffixGroup> {
        self.suffixes.get(flag)
    }

    /// Whether either table has a group for `flag`.
    pub fn knows_flag(&self, flag: &str) -> bool {
        self.prefixes.contains_key(flag) || self.suffixes.contains_key(flag)
    }

    pub fn group_count(&self) -> usize {
        self.prefixes.len() + self.suffixes.len()
    }

    pub fn try_characters(&self) -> &[char] {
        &self.try_characters
    }

    pub fn replacements(&self) -> &[Replacement] {
        &self.replacements
    }

    pub fn flag_encoding(&self) -> FlagEncoding {
        self.flag_encoding
    }

    pub fn compound_flag(&self) -> Option<&str> {
        self.compound_flag.as_deref()
    }

    pub fn compound_min(&self) -> u8 {
        self.compound_min
    }

    /// The charset named by `SET`, if any. Decoding is the caller's job.
    pub fn declared_encoding(&self) -> Option<&str> {
        self.declared_encoding.as_deref()
    }

    /// Expand a root word with its flags into the forms it licenses.
    pub fn expand(&self, word: &str, flags: &[String]) -> HashSet<String> {
        expand::expand(self, word, flags).forms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suffix(strip: &str, append: &str, cond: &str) -> AffixRule {
        AffixRule {
            kind: AffixKind::Suffix,
            strip: strip.to_string(),
            append: append.to_string(),
            condition: Condition::compile(cond).unwrap(),
            cross_product: true,
        }
    }

    #[test]
    fn test_flag_decoding() {
        assert_eq!(FlagEncoding::Ascii.decode("AB"), vec!["A", "B"]);
        assert_eq!(FlagEncoding::Utf8.decode("Ää"), vec!["Ä", "ä"]);
        assert_eq!(FlagEncoding::Long.decode("AaBbC"), vec!["Aa", "Bb"]);
        assert_eq!(FlagEncoding::Num.decode("101, 7,,"), vec!["101", "7"]);
    }

    #[test]
    fn test_flag_encoding_from_str() {
        assert_eq!("UTF-8".parse::<FlagEncoding>(), Ok(FlagEncoding::Utf8));
        assert_eq!("long".parse::<FlagEncoding>(), Ok(FlagEncoding::Long));
        assert!("LONG".parse::<FlagEncoding>().is_err());
    }

    #[test]
    fn test_rule_apply_and_reverse() {
        let rule = suffix("y", "ies", "[^aeiou]y");
        let form = rule.apply("try").unwrap();
        assert_eq!(form, "tries");

        let restored = format!("{}{}", form.strip_suffix("ies").unwrap(), "y");
        assert_eq!(restored, "try");

        assert_eq!(rule.apply("play"), None);
    }

    #[test]
    fn test_rule_requires_strip_text() {
        // too short for the condition, so it matches, but "x" has no "y"
        let rule = suffix("y", "ies", "[^aeiou]y");
        assert_eq!(rule.apply("x"), None);
    }

    #[test]
    fn test_prefix_rule() {
        let rule = AffixRule {
            kind: AffixKind::Prefix,
            strip: String::new(),
            append: "re".to_string(),
            condition: Condition::any(),
            cross_product: false,
        };
        assert_eq!(rule.apply("do").as_deref(), Some("redo"));
    }
}
