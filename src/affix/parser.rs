//! Line parser for Hunspell `.aff` grammars.

use super::condition::Condition;
use super::{AffixGroup, AffixKind, AffixRule, AffixTable, FlagEncoding, Replacement};
use crate::error::GrammarError;
use std::collections::hash_map::Entry;
use tracing::{debug, warn};

/// Directives real grammars carry that we accept without acting on them.
const IGNORED_DIRECTIVES: &[&str] = &[
    "AF",
    "AM",
    "BREAK",
    "CHECKCOMPOUNDCASE",
    "CHECKCOMPOUNDDUP",
    "CHECKCOMPOUNDPATTERN",
    "CHECKCOMPOUNDREP",
    "CHECKCOMPOUNDTRIPLE",
    "CHECKSHARPS",
    "CIRCUMFIX",
    "COMPLEXPREFIXES",
    "COMPOUNDBEGIN",
    "COMPOUNDEND",
    "COMPOUNDFIRST",
    "COMPOUNDFORBIDFLAG",
    "COMPOUNDLAST",
    "COMPOUNDMIDDLE",
    "COMPOUNDMORESUFFIXES",
    "COMPOUNDPERMITFLAG",
    "COMPOUNDROOT",
    "COMPOUNDRULE",
    "COMPOUNDSYLLABLE",
    "COMPOUNDWORDMAX",
    "FORBIDDENWORD",
    "FORCEUCASE",
    "FULLSTRIP",
    "GENERATE",
    "HOME",
    "HU_KOTOHANGZO",
    "ICONV",
    "IGNORE",
    "KEEPCASE",
    "KEY",
    "LANG",
    "LEFTHYPHENMIN",
    "LEMMA_PRESENT",
    "MAP",
    "MAXCPDSUGS",
    "MAXDIFF",
    "MAXNGRAMSUGS",
    "NAME",
    "NEEDAFFIX",
    "NOSPLITSUGS",
    "NOSUGGEST",
    "OCONV",
    "ONLYINCOMPOUND",
    "ONLYMAXDIFF",
    "ONLYROOT",
    "SIMPLIFIEDTRIPLE",
    "SUBSTANDARD",
    "SYLLABLENUM",
    "VERSION",
    "WARN",
    "WORDCHARS",
];

fn syntax(file: &str, line_nr: usize, message: impl Into<String>, text: &str) -> GrammarError {
    GrammarError::Syntax {
        file: file.to_string(),
        line: line_nr,
        message: message.into(),
        text: text.to_string(),
    }
}

/// Whitespace-separated fields, dropping a trailing `# comment`.
fn fields(line: &str) -> Vec<&str> {
    let mut tokens = line.split_whitespace();
    let mut fields: Vec<&str> = tokens.next().into_iter().collect();
    fields.extend(tokens.take_while(|token| !token.starts_with('#')));
    fields
}

/// Parser state for a single grammar. Consumed by [`AffixParser::parse`].
pub struct AffixParser<'a> {
    file: &'a str,
    line_nr: usize,
    table: AffixTable,
    seen_try: bool,
    seen_compound_min: bool,
    rep_declared: Option<usize>,
}

impl<'a> AffixParser<'a> {
    pub fn new(file: &'a str) -> Self {
        Self {
            file,
            line_nr: 0,
            table: AffixTable::default(),
            seen_try: false,
            seen_compound_min: false,
            rep_declared: None,
        }
    }

    /// Parse every line, then verify declared counts.
    pub fn parse<'l, I>(mut self, lines: I) -> Result<AffixTable, GrammarError>
    where
        I: IntoIterator<Item = &'l str>,
    {
        for raw in lines {
            self.line_nr += 1;
            let line = raw.trim_start_matches('\u{feff}').trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields = fields(line);
            self.directive(line, &fields)?;
        }
        self.finish()
    }

    fn error(&self, message: impl Into<String>, line: &str) -> GrammarError {
        syntax(self.file, self.line_nr, message, line)
    }

    fn single_argument<'f>(
        &self,
        line: &str,
        fields: &[&'f str],
    ) -> Result<&'f str, GrammarError> {
        match fields {
            [_, argument] => Ok(*argument),
            _ => Err(self.error(format!("{} takes exactly one argument", fields[0]), line)),
        }
    }

    fn directive(&mut self, line: &str, fields: &[&str]) -> Result<(), GrammarError> {
        match fields[0] {
            "TRY" => {
                let chars = self.single_argument(line, fields)?;
                if self.seen_try {
                    return Err(self.error("duplicate TRY directive", line));
                }
                self.seen_try = true;
                self.table.try_characters = chars.chars().collect();
            }
            "COMPOUNDFLAG" => {
                let flag = self.single_argument(line, fields)?;
                if self.table.compound_flag.is_some() {
                    return Err(self.error("duplicate COMPOUNDFLAG directive", line));
                }
                self.table.compound_flag = Some(flag.to_string());
            }
            "COMPOUNDMIN" => {
                let value = self.single_argument(line, fields)?;
                if self.seen_compound_min {
                    return Err(self.error("duplicate COMPOUNDMIN directive", line));
                }
                let min: i64 = value
                    .parse()
                    .map_err(|_| self.error("COMPOUNDMIN is not a number", line))?;
                self.seen_compound_min = true;
                self.table.compound_min = match u8::try_from(min) {
                    Ok(min) if (1..=50).contains(&min) => min,
                    _ => super::DEFAULT_COMPOUND_MIN,
                };
            }
            "FLAG" => {
                let value = self.single_argument(line, fields)?;
                self.table.flag_encoding = value
                    .parse::<FlagEncoding>()
                    .map_err(|message| self.error(message, line))?;
            }
            "SET" => {
                let charset = self.single_argument(line, fields)?;
                self.table.declared_encoding = Some(charset.to_string());
            }
            "REP" => self.replacement(line, fields)?,
            "PFX" => self.affix(AffixKind::Prefix, line, fields)?,
            "SFX" => self.affix(AffixKind::Suffix, line, fields)?,
            tag if IGNORED_DIRECTIVES.contains(&tag) => {
                debug!(
                    file = self.file,
                    line = self.line_nr,
                    directive = tag,
                    "ignoring directive"
                );
            }
            tag => {
                warn!(
                    file = self.file,
                    line = self.line_nr,
                    directive = tag,
                    "unknown affix directive"
                );
            }
        }
        Ok(())
    }

    fn replacement(&mut self, line: &str, fields: &[&str]) -> Result<(), GrammarError> {
        if self.rep_declared.is_none() {
            let count = match fields {
                [_, count] => count
                    .parse::<usize>()
                    .map_err(|_| self.error("REP count is not a number", line))?,
                _ => return Err(self.error("expected `REP <count>`", line)),
            };
            self.rep_declared = Some(count);
            return Ok(());
        }

        if fields.len() < 3 {
            return Err(self.error("expected `REP <pattern> <replacement>`", line));
        }

        let mut pattern = fields[1];
        let at_start = pattern.len() > 1 && pattern.starts_with('^');
        if at_start {
            pattern = &pattern[1..];
        }
        let at_end = pattern.len() > 1 && pattern.ends_with('$');
        if at_end {
            pattern = &pattern[..pattern.len() - 1];
        }

        self.table.replacements.push(Replacement {
            pattern: pattern.replace('_', " "),
            replacement: fields[2].replace('_', " "),
            at_start,
            at_end,
        });
        Ok(())
    }

    fn affix(&mut self, kind: AffixKind, line: &str, fields: &[&str]) -> Result<(), GrammarError> {
        let (file, line_nr) = (self.file, self.line_nr);
        let err = |message: &str| syntax(file, line_nr, message, line);

        let Some(&flag) = fields.get(1) else {
            return Err(err("missing affix flag"));
        };

        let groups = match kind {
            AffixKind::Prefix => &mut self.table.prefixes,
            AffixKind::Suffix => &mut self.table.suffixes,
        };

        match groups.entry(flag.to_string()) {
            Entry::Vacant(slot) => {
                let [_, _, cross, count] = fields else {
                    return Err(err(&format!(
                        "expected `{} <flag> <Y|N> <count>`",
                        kind.tag()
                    )));
                };
                let cross_product = match *cross {
                    "Y" => true,
                    "N" => false,
                    _ => return Err(err("cross product must be Y or N")),
                };
                let declared = count
                    .parse::<usize>()
                    .map_err(|_| err("rule count is not a number"))?;
                slot.insert(AffixGroup {
                    kind,
                    flag: flag.to_string(),
                    cross_product,
                    declared,
                    rules: Vec::with_capacity(declared),
                });
            }
            Entry::Occupied(mut group) => {
                if fields.len() < 4 {
                    return Err(err(&format!(
                        "expected `{} <flag> <strip> <append> <condition>`",
                        kind.tag()
                    )));
                }

                let strip = match fields[2] {
                    "0" => "",
                    strip => strip,
                };
                // continuation classes after `/` are not applied
                let raw_append = fields[3]
                    .split_once('/')
                    .map_or(fields[3], |(append, _)| append);
                let append = match raw_append {
                    "0" => "",
                    append => append,
                };

                let condition = match fields.get(4) {
                    Some(pattern) => {
                        Condition::compile(pattern).map_err(|e| err(&e.to_string()))?
                    }
                    None if append.is_empty() || append == "." => Condition::any(),
                    None => return Err(err("missing condition")),
                };
                let append = if fields.len() == 4 && append == "." {
                    ""
                } else {
                    append
                };

                let group = group.get_mut();
                group.rules.push(AffixRule {
                    kind,
                    strip: strip.to_string(),
                    append: append.to_string(),
                    condition,
                    cross_product: group.cross_product,
                });
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<AffixTable, GrammarError> {
        if let Some(declared) = self.rep_declared {
            let found = self.table.replacements.len();
            if declared != found {
                return Err(GrammarError::CountMismatch {
                    file: self.file.to_string(),
                    subject: "REP".to_string(),
                    declared,
                    found,
                });
            }
        }

        let mut short: Vec<&AffixGroup> = self
            .table
            .prefixes
            .values()
            .chain(self.table.suffixes.values())
            .filter(|group| group.rules.len() != group.declared)
            .collect();
        short.sort_by(|a, b| (a.kind.tag(), &a.flag).cmp(&(b.kind.tag(), &b.flag)));

        if let Some(group) = short.first() {
            return Err(GrammarError::CountMismatch {
                file: self.file.to_string(),
                subject: format!("{} {}", group.kind.tag(), group.flag),
                declared: group.declared,
                found: group.rules.len(),
            });
        }

        debug!(
            file = self.file,
            prefixes = self.table.prefixes.len(),
            suffixes = self.table.suffixes.len(),
            replacements = self.table.replacements.len(),
            "parsed affix grammar"
        );

        Ok(self.table)
    }
}
