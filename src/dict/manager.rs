use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// An installed `.aff`/`.dic` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryInfo {
    /// Normalized language code, e.g. `en-US`.
    pub language: String,
    pub affix_path: PathBuf,
    pub words_path: PathBuf,
    pub size_bytes: u64,
}

/// `en_US` and `en-us` both become `en-US`.
pub fn normalize_language(code: &str) -> String {
    let mut parts = code.trim().split(['_', '-']);
    let mut normalized = parts.next().unwrap_or_default().to_lowercase();
    for part in parts {
        normalized.push('-');
        if part.len() == 2 {
            normalized.push_str(&part.to_uppercase());
        } else {
            normalized.push_str(part);
        }
    }
    normalized
}

/// Every complete pair under `dir`, sorted by language.
///
/// Files without a partner are skipped. A missing directory yields nothing.
pub fn list_dictionaries(dir: &Path) -> Vec<DictionaryInfo> {
    let mut halves: BTreeMap<PathBuf, (Option<PathBuf>, Option<PathBuf>)> = BTreeMap::new();

    for entry in WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let slot = match path.extension().and_then(|s| s.to_str()) {
            Some("aff") => 0,
            Some("dic") => 1,
            _ => continue,
        };
        let pair = halves.entry(path.with_extension("")).or_default();
        if slot == 0 {
            pair.0 = Some(path.to_path_buf());
        } else {
            pair.1 = Some(path.to_path_buf());
        }
    }

    let mut found: Vec<DictionaryInfo> = halves
        .into_iter()
        .filter_map(|(stem, pair)| match pair {
            (Some(affix_path), Some(words_path)) => {
                let language = normalize_language(stem.file_name()?.to_str()?);
                let size_bytes = [&affix_path, &words_path]
                    .iter()
                    .filter_map(|p| p.metadata().ok())
                    .map(|m| m.len())
                    .sum();
                Some(DictionaryInfo {
                    language,
                    affix_path,
                    words_path,
                    size_bytes,
                })
            }
            _ => None,
        })
        .collect();

    found.sort_by(|a, b| a.language.cmp(&b.language).then(a.affix_path.cmp(&b.affix_path)));
    debug!(dir = %dir.display(), count = found.len(), "scanned for dictionaries");
    found
}

/// The dictionary for `language` under `dir`.
///
/// A folder named after the language wins, whatever its files are called
/// (`en_US/index.aff` + `en_US/index.dic`). Otherwise the first pair whose
/// stem names the language is used.
pub fn find_dictionary(dir: &Path, language: &str) -> Option<DictionaryInfo> {
    let wanted = normalize_language(language);
    let folders = [language.to_string(), wanted.clone(), wanted.replace('-', "_")];

    if let Some(info) = folders
        .iter()
        .map(|name| dir.join(name))
        .filter(|folder| folder.is_dir())
        .find_map(|folder| pair_in_folder(&folder, &wanted))
    {
        return Some(info);
    }

    list_dictionaries(dir)
        .into_iter()
        .find(|info| info.language == wanted)
}

/// Any `.aff` and `.dic` directly inside `folder`, first by name.
fn pair_in_folder(folder: &Path, language: &str) -> Option<DictionaryInfo> {
    let mut files: Vec<PathBuf> = WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect();
    files.sort();

    let with_extension = |ext: &str| {
        files
            .iter()
            .find(|path| path.extension().and_then(|s| s.to_str()) == Some(ext))
            .cloned()
    };
    let affix_path = with_extension("aff")?;
    let words_path = with_extension("dic")?;

    let size_bytes = [&affix_path, &words_path]
        .iter()
        .filter_map(|p| p.metadata().ok())
        .map(|m| m.len())
        .sum();
    debug!(folder = %folder.display(), "using language folder");

    Some(DictionaryInfo {
        language: language.to_string(),
        affix_path,
        words_path,
        size_bytes,
    })
}
