pub mod affix;
pub mod checker;
pub mod config;
pub mod dict;
pub mod error;

pub use affix::{AffixTable, Expansion};
pub use checker::dictionary::{Dictionary, DictionaryEntry, Lexicon};
pub use checker::suggestions::SuggestionEngine;
pub use checker::SpellChecker;
pub use config::Config;
pub use error::{ConditionError, DictionaryError, GrammarError, UnknownFlag};

#[derive(Debug, Clone, Default)]
pub struct CheckResult {
    pub error_count: usize,
    pub errors: Vec<Misspelling>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Misspelling {
    pub word: String,
    pub line: usize,
    pub column: usize,
    /// Empty when no correction was found.
    pub suggestions: Vec<String>,
}
