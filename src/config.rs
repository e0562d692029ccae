use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const LOCAL_CONFIG: &str = ".affixchk.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub language: String,
    pub dictionary_dir: PathBuf,
    pub ignore_patterns: Vec<String>,
    pub max_suggestions: usize,

    /// Apply case and single-deletion refinement to uncorrectable words.
    pub refine_suggestions: bool,
}

fn default_language() -> String {
    "en_US".to_string()
}

fn default_max_suggestions() -> usize {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: default_language(),
            dictionary_dir: Self::data_dir().unwrap_or_else(|| PathBuf::from("dictionaries")),
            ignore_patterns: vec![
                r"https?://\S+".to_string(),         // URLs
                r"\b[a-fA-F0-9]{32,}\b".to_string(), // Hashes
                r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}".to_string(), // Emails
            ],
            max_suggestions: default_max_suggestions(),
            refine_suggestions: true,
        }
    }
}

impl Config {
    /// Load configuration with priority: arguments > local config > global config > defaults
    pub fn load(language: Option<String>, dictionary_dir: Option<PathBuf>) -> Result<Self> {
        let layers = [Self::global_config_path(), Some(PathBuf::from(LOCAL_CONFIG))];
        Self::load_layers(layers.iter().flatten(), language, dictionary_dir)
    }

    fn load_layers<'a>(
        paths: impl IntoIterator<Item = &'a PathBuf>,
        language: Option<String>,
        dictionary_dir: Option<PathBuf>,
    ) -> Result<Self> {
        let mut config = Self::default();

        for path in paths {
            if path.exists() {
                config = config.merge(Self::from_file(path)?);
            }
        }

        if let Some(language) = language {
            config.language = language;
        }
        if let Some(dir) = dictionary_dir {
            config.dictionary_dir = dir;
        }

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn merge(mut self, other: Self) -> Self {
        // other's values override self's if they differ from defaults
        let defaults = Self::default();
        if other.language != defaults.language {
            self.language = other.language;
        }
        if other.dictionary_dir != defaults.dictionary_dir {
            self.dictionary_dir = other.dictionary_dir;
        }
        if other.ignore_patterns != defaults.ignore_patterns {
            self.ignore_patterns = other.ignore_patterns;
        }
        if other.max_suggestions != defaults.max_suggestions {
            self.max_suggestions = other.max_suggestions;
        }
        if other.refine_suggestions != defaults.refine_suggestions {
            self.refine_suggestions = other.refine_suggestions;
        }
        self
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "affixchk").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "affixchk").map(|dirs| dirs.data_dir().to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.language, "en_US");
        assert_eq!(config.max_suggestions, 5);
        assert!(config.refine_suggestions);
        assert_eq!(config.ignore_patterns.len(), 3);
    }

    #[test]
    fn test_merge_configs() {
        let base = Config::default();
        let override_config = Config {
            language: "en_GB".to_string(),
            ..Default::default()
        };

        let merged = base.merge(override_config);
        assert_eq!(merged.language, "en_GB");
        assert_eq!(merged.max_suggestions, 5);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "max_suggestions = 3\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.max_suggestions, 3);
        assert_eq!(config.language, "en_US");
    }

    #[test]
    fn test_layers_and_arguments() {
        let dir = tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let local = dir.path().join("local.toml");
        fs::write(&global, "language = \"de_DE\"\nmax_suggestions = 8\n").unwrap();
        fs::write(&local, "max_suggestions = 2\nrefine_suggestions = false\n").unwrap();

        let config = Config::load_layers([&global, &local], None, None).unwrap();
        assert_eq!(config.language, "de_DE");
        assert_eq!(config.max_suggestions, 2);
        assert!(!config.refine_suggestions);

        let config = Config::load_layers(
            [&global, &local],
            Some("fr_FR".to_string()),
            Some(dir.path().to_path_buf()),
        )
        .unwrap();
        assert_eq!(config.language, "fr_FR");
        assert_eq!(config.dictionary_dir, dir.path());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "max_suggestions = \"many\"\n").unwrap();
        assert!(Config::load_layers([&path], None, None).is_err());
    }
}
