use crate::affix::expand::{self, Expansion};
use crate::affix::{AffixTable, Replacement};
use crate::error::DictionaryError;
use fst::Map;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// One `.dic` line: a root word and its flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub word: String,
    pub flags: Vec<String>,
}

/// What the suggestion engine needs from a word store.
pub trait Lexicon {
    /// Exact, case-sensitive lookup.
    fn lookup(&self, word: &str) -> Option<&DictionaryEntry>;

    fn replacement_table(&self) -> &[Replacement];

    fn try_characters(&self) -> &[char];

    /// Forms licensed by `entry` through its flags.
    fn expand(&self, entry: &DictionaryEntry) -> HashSet<String>;

    fn contains(&self, word: &str) -> bool {
        self.lookup(word).is_some()
    }
}

impl<T: Lexicon + ?Sized> Lexicon for &T {
    fn lookup(&self, word: &str) -> Option<&DictionaryEntry> {
        (**self).lookup(word)
    }

    fn replacement_table(&self) -> &[Replacement] {
        (**self).replacement_table()
    }

    fn try_characters(&self) -> &[char] {
        (**self).try_characters()
    }

    fn expand(&self, entry: &DictionaryEntry) -> HashSet<String> {
        (**self).expand(entry)
    }
}

/// A parsed `.aff`/`.dic` pair.
pub struct Dictionary {
    name: String,
    affixes: AffixTable,
    index: Map<Vec<u8>>,
    entries: Vec<DictionaryEntry>,
}

impl fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dictionary")
            .field("name", &self.name)
            .field("entries", &format!("{} entries", self.entries.len()))
            .finish_non_exhaustive()
    }
}

impl Dictionary {
    /// Load the installed dictionary for `language` from `dir`.
    pub fn load(language: &str, dir: &Path) -> Result<Self, DictionaryError> {
        let info = crate::dict::manager::find_dictionary(dir, language).ok_or_else(|| {
            DictionaryError::NotFound {
                language: language.to_string(),
                dir: dir.to_path_buf(),
            }
        })?;

        Self::from_pair(&info.affix_path, &info.words_path)
    }

    /// Load from an affix file and a word list, both UTF-8.
    pub fn from_pair(affix_path: &Path, words_path: &Path) -> Result<Self, DictionaryError> {
        let read = |path: &Path| {
            fs::read_to_string(path).map_err(|source| DictionaryError::Io {
                path: path.to_path_buf(),
                source,
            })
        };
        let affixes = read(affix_path)?;
        let words = read(words_path)?;

        let name = affix_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown");

        Self::from_parts(&affixes, &words, name)
    }

    /// Build from in-memory grammar and word list text.
    pub fn from_parts(affixes: &str, words: &str, name: &str) -> Result<Self, DictionaryError> {
        let affixes = AffixTable::parse(affixes, &format!("{}.aff", name))?;

        if let Some(charset) = affixes.declared_encoding() {
            if !charset.eq_ignore_ascii_case("UTF-8") {
                warn!(
                    dictionary = name,
                    charset, "grammar declares a non UTF-8 charset; text was read as UTF-8"
                );
            }
        }

        let words = parse_word_list(&affixes, words, name)?;

        let index = Map::from_iter(
            words
                .keys()
                .enumerate()
                .map(|(i, word)| (word.as_bytes(), i as u64)),
        )?;

        let entries: Vec<DictionaryEntry> = words
            .into_iter()
            .map(|(word, flags)| DictionaryEntry { word, flags })
            .collect();

        let unknown = entries
            .iter()
            .filter(|entry| {
                entry.flags.iter().any(|flag| {
                    !affixes.knows_flag(flag) && affixes.compound_flag() != Some(flag.as_str())
                })
            })
            .count();
        if unknown > 0 {
            warn!(
                dictionary = name,
                words = unknown,
                "words carry flags with no affix group; those flags are skipped"
            );
        }

        debug!(dictionary = name, entries = entries.len(), "loaded dictionary");

        Ok(Self {
            name: name.to_string(),
            affixes,
            index,
            entries,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn affixes(&self) -> &AffixTable {
        &self.affixes
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Expansion of `entry` including flags that named no group.
    pub fn expand_entry(&self, entry: &DictionaryEntry) -> Expansion {
        expand::expand(&self.affixes, &entry.word, &entry.flags)
    }
}

impl Lexicon for Dictionary {
    fn lookup(&self, word: &str) -> Option<&DictionaryEntry> {
        self.index
            .get(word)
            .and_then(|i| self.entries.get(i as usize))
    }

    fn replacement_table(&self) -> &[Replacement] {
        self.affixes.replacements()
    }

    fn try_characters(&self) -> &[char] {
        self.affixes.try_characters()
    }

    fn expand(&self, entry: &DictionaryEntry) -> HashSet<String> {
        self.expand_entry(entry).forms
    }
}

/// Parse `.dic` text into word → flags, merging homonym lines.
fn parse_word_list(
    affixes: &AffixTable,
    text: &str,
    name: &str,
) -> Result<BTreeMap<String, Vec<String>>, DictionaryError> {
    let mut lines = text
        .lines()
        .map(|line| line.trim_start_matches('\u{feff}').trim())
        .filter(|line| !line.is_empty());

    let declared = lines
        .next()
        .and_then(|first| first.split_whitespace().next())
        .and_then(|count| count.parse::<usize>().ok())
        .ok_or_else(|| DictionaryError::MissingCount {
            file: format!("{}.dic", name),
        })?;

    let encoding = affixes.flag_encoding();
    let mut words: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for line in lines {
        // anything after the first whitespace is morphological data
        let Some(item) = line.split_whitespace().next() else {
            continue;
        };
        let (word, flags) = match item.split_once('/') {
            Some((word, flags)) if !word.is_empty() => (word, encoding.decode(flags)),
            _ => (item, Vec::new()),
        };

        let merged = words.entry(word.to_string()).or_default();
        for flag in flags {
            if !merged.contains(&flag) {
                merged.push(flag);
            }
        }
    }

    if declared != words.len() {
        warn!(
            dictionary = name,
            declared,
            read = words.len(),
            "word count on the first line does not match the entries read"
        );
    }

    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const AFF: &str = "SET UTF-8\nTRY aeiou\nSFX A Y 1\nSFX A 0 s .\n";

    #[test]
    fn test_build_and_load_dictionary() {
        let dir = tempdir().unwrap();
        let aff_path = dir.path().join("en_US.aff");
        let dic_path = dir.path().join("en_US.dic");
        fs::write(&aff_path, AFF).unwrap();
        fs::write(&dic_path, "3\nhello\nworld/A\ntest\n").unwrap();

        let dict = Dictionary::from_pair(&aff_path, &dic_path).unwrap();
        assert_eq!(dict.name(), "en_US");
        assert!(dict.contains("hello"));
        assert!(dict.contains("world"));
        assert!(!dict.contains("notfound"));
        assert_eq!(dict.lookup("world").unwrap().flags, vec!["A"]);
        assert_eq!(dict.try_characters(), ['a', 'e', 'i', 'o', 'u']);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let dict = Dictionary::from_parts(AFF, "2\nParis\nbread\n", "t").unwrap();
        assert!(dict.contains("Paris"));
        assert!(!dict.contains("paris"));
        assert!(!dict.contains("Bread"));
    }

    #[test]
    fn test_count_line_comment_and_morphology() {
        let dict = Dictionary::from_parts(AFF, "2  # two words\ncat/A po:noun\ndog\tpo:noun\n", "t")
            .unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.lookup("cat").unwrap().flags, vec!["A"]);
        assert!(dict.lookup("dog").unwrap().flags.is_empty());
    }

    #[test]
    fn test_missing_count() {
        let err = Dictionary::from_parts(AFF, "cat/A\ndog\n", "t").unwrap_err();
        assert!(matches!(err, DictionaryError::MissingCount { .. }));

        let err = Dictionary::from_parts(AFF, "", "t").unwrap_err();
        assert!(matches!(err, DictionaryError::MissingCount { .. }));
    }

    #[test]
    fn test_homonyms_merge_flags() {
        let aff = "SFX A Y 1\nSFX A 0 s .\nSFX B Y 1\nSFX B 0 ed .\n";
        let dict = Dictionary::from_parts(aff, "2\nwalk/A\nwalk/BA\n", "t").unwrap();
        assert_eq!(dict.len(), 1);

        let entry = dict.lookup("walk").unwrap();
        assert_eq!(entry.flags, vec!["A", "B"]);
        let forms = dict.expand(entry);
        assert!(forms.contains("walks"));
        assert!(forms.contains("walked"));
    }

    #[test]
    fn test_long_and_numeric_flags() {
        let aff = "FLAG long\nSFX Aa Y 1\nSFX Aa 0 s .\n";
        let dict = Dictionary::from_parts(aff, "1\ncat/AaZz\n", "t").unwrap();
        assert_eq!(dict.lookup("cat").unwrap().flags, vec!["Aa", "Zz"]);
        assert!(dict.expand(dict.lookup("cat").unwrap()).contains("cats"));

        let aff = "FLAG num\nSFX 101 Y 1\nSFX 101 0 s .\n";
        let dict = Dictionary::from_parts(aff, "1\ncat/101,7\n", "t").unwrap();
        let entry = dict.lookup("cat").unwrap();
        assert_eq!(entry.flags, vec!["101", "7"]);

        let expansion = dict.expand_entry(entry);
        assert!(expansion.contains("cats"));
        assert_eq!(expansion.unknown.len(), 1);
        assert_eq!(expansion.unknown[0].flag, "7");
    }

    #[test]
    fn test_grammar_error_prevents_loading() {
        let err =
            Dictionary::from_parts("SFX A Y 2\nSFX A 0 s .\n", "1\ncat/A\n", "t").unwrap_err();
        assert!(matches!(err, DictionaryError::Grammar(_)));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = Dictionary::from_pair(&dir.path().join("x.aff"), &dir.path().join("x.dic"))
            .unwrap_err();
        assert!(matches!(err, DictionaryError::Io { .. }));
    }
}
