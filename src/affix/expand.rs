use super::AffixTable;
use crate::error::UnknownFlag;
use std::collections::HashSet;
use tracing::debug;

/// Forms licensed by one root, plus the flags that led nowhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    pub forms: HashSet<String>,
    pub unknown: Vec<UnknownFlag>,
}

impl Expansion {
    pub fn contains(&self, form: &str) -> bool {
        self.forms.contains(form)
    }
}

/// Apply every rule named by `flags` to `word`.
///
/// Prefix groups apply prefix rules and suffix groups suffix rules; a flag
/// may name one of each. Prefixes and suffixes are not combined.
pub fn expand(table: &AffixTable, word: &str, flags: &[String]) -> Expansion {
    let mut expansion = Expansion::default();

    for flag in flags {
        let groups = [table.prefix_group(flag), table.suffix_group(flag)];
        if groups.iter().all(Option::is_none) {
            if table.compound_flag() != Some(flag.as_str()) {
                debug!(word, flag = flag.as_str(), "flag names no affix group");
                expansion.unknown.push(UnknownFlag {
                    flag: flag.clone(),
                    word: word.to_string(),
                });
            }
            continue;
        }

        for group in groups.into_iter().flatten() {
            for rule in &group.rules {
                if let Some(form) = rule.apply(word) {
                    expansion.forms.insert(form);
                }
            }
        }
    }

    expansion
}
