use std::io;
use std::path::PathBuf;

/// Fatal problems found while parsing an affix grammar.
///
/// Either variant means the whole grammar is unusable; no partial
/// [`AffixTable`](crate::affix::AffixTable) is ever handed out.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    #[error("{file}:{line}: {message}: `{text}`")]
    Syntax {
        file: String,
        line: usize,
        message: String,
        text: String,
    },

    #[error("{file}: {subject} declares {declared} entries but {found} were read")]
    CountMismatch {
        file: String,
        subject: String,
        declared: usize,
        found: usize,
    },
}

/// A condition pattern that can never match anything.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid condition `{pattern}`: {reason}")]
pub struct ConditionError {
    pub pattern: String,
    pub reason: &'static str,
}

/// A dictionary word carries a flag with no rule group behind it.
///
/// Reported per word; expansion just skips the flag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("flag `{flag}` of word `{word}` names no affix rule group")]
pub struct UnknownFlag {
    pub flag: String,
    pub word: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{file}: missing word count on the first line")]
    MissingCount { file: String },

    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error("failed to build word index: {0}")]
    Index(#[from] fst::Error),

    #[error("no dictionary for `{language}` under {}", dir.display())]
    NotFound { language: String, dir: PathBuf },
}
