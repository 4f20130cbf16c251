use crate::error::{Error, Result};
use directories::ProjectDirs;
use log::error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// What a rule category does with a word it recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordOption {
    Leave,
    Remove,
    Split,
}

impl FromStr for WordOption {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "leave" => Ok(WordOption::Leave),
            "remove" => Ok(WordOption::Remove),
            "split" => Ok(WordOption::Split),
            _ => Err(format!("Unknown word option: {}", s)),
        }
    }
}

impl fmt::Display for WordOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordOption::Leave => write!(f, "leave"),
            WordOption::Remove => write!(f, "remove"),
            WordOption::Split => write!(f, "split"),
        }
    }
}

impl WordOption {
    /// Strict parse of a stored strategy value for `rule`.
    pub fn parse_for(rule: &str, raw: &str) -> Result<Self> {
        raw.parse().map_err(|_| Error::InvalidStrategy {
            rule: rule.to_string(),
            value: raw.to_string(),
        })
    }

    /// Resolve a stored strategy value, treating an unknown value as a
    /// configuration fault: asserts in debug builds, leaves words unchanged
    /// in release builds.
    pub fn resolve(rule: &str, raw: &str) -> Self {
        match Self::parse_for(rule, raw) {
            Ok(option) => option,
            Err(e) => {
                error!("{}", e);
                debug_assert!(false, "{}", e);
                WordOption::Leave
            }
        }
    }
}

/// Snapshot of the word filtering rules. Immutable for the duration of a parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSettings {
    pub remove_words_in_source: bool,
    /// When false, Qt keywords and Q-prefixed names are removed.
    pub check_qt_keywords: bool,
    /// When false, words written entirely in capitals are removed.
    pub check_all_caps: bool,
    pub remove_email_addresses: bool,
    pub remove_websites: bool,
    pub words_with_numbers: WordOption,
    pub words_with_underscores: WordOption,
    pub camel_case: WordOption,
    pub words_with_dots: WordOption,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            remove_words_in_source: true,
            check_qt_keywords: false,
            check_all_caps: false,
            remove_email_addresses: true,
            remove_websites: true,
            words_with_numbers: WordOption::Remove,
            words_with_underscores: WordOption::Split,
            camel_case: WordOption::Split,
            words_with_dots: WordOption::Split,
        }
    }
}

/// Settings that decide which files get processed at all.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CoreSettings {
    pub only_parse_current_file: bool,
    pub check_external_files: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub filter: FilterSettings,
    pub core: CoreSettings,
}

/// On-disk layout. Every field is optional so files layer over each other.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    filter: FilterSection,
    #[serde(default)]
    core: CoreSection,
}

#[derive(Debug, Default, Deserialize)]
struct FilterSection {
    remove_words_in_source: Option<bool>,
    check_qt_keywords: Option<bool>,
    check_all_caps: Option<bool>,
    remove_email_addresses: Option<bool>,
    remove_websites: Option<bool>,
    words_with_numbers: Option<String>,
    words_with_underscores: Option<String>,
    camel_case: Option<String>,
    words_with_dots: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CoreSection {
    only_parse_current_file: Option<bool>,
    check_external_files: Option<bool>,
}

impl Config {
    /// Load configuration with priority: explicit file > local config > global config > defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                config.merge(Self::read_file(&global_path)?);
            }
        }

        let local_path = PathBuf::from(".cppspell.toml");
        if local_path.exists() {
            config.merge(Self::read_file(&local_path)?);
        }

        if let Some(path) = explicit {
            config.merge(Self::read_file(path)?);
        }

        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        let mut config = Self::default();
        config.merge(toml::from_str(contents)?);
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<ConfigFile> {
        let contents = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn merge(&mut self, other: ConfigFile) {
        let f = other.filter;
        let filter = &mut self.filter;
        if let Some(v) = f.remove_words_in_source {
            filter.remove_words_in_source = v;
        }
        if let Some(v) = f.check_qt_keywords {
            filter.check_qt_keywords = v;
        }
        if let Some(v) = f.check_all_caps {
            filter.check_all_caps = v;
        }
        if let Some(v) = f.remove_email_addresses {
            filter.remove_email_addresses = v;
        }
        if let Some(v) = f.remove_websites {
            filter.remove_websites = v;
        }
        if let Some(raw) = f.words_with_numbers {
            filter.words_with_numbers = WordOption::resolve("words_with_numbers", &raw);
        }
        if let Some(raw) = f.words_with_underscores {
            filter.words_with_underscores = WordOption::resolve("words_with_underscores", &raw);
        }
        if let Some(raw) = f.camel_case {
            filter.camel_case = WordOption::resolve("camel_case", &raw);
        }
        if let Some(raw) = f.words_with_dots {
            filter.words_with_dots = WordOption::resolve("words_with_dots", &raw);
        }

        if let Some(v) = other.core.only_parse_current_file {
            self.core.only_parse_current_file = v;
        }
        if let Some(v) = other.core.check_external_files {
            self.core.check_external_files = v;
        }
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "cppspell").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.filter.remove_words_in_source);
        assert!(!config.filter.check_qt_keywords);
        assert_eq!(config.filter.words_with_numbers, WordOption::Remove);
        assert_eq!(config.filter.camel_case, WordOption::Split);
        assert!(!config.core.only_parse_current_file);
    }

    #[test]
    fn test_partial_file_overrides_defaults() {
        let config = Config::from_toml_str(
            r#"
[filter]
camel_case = "remove"
check_all_caps = true

[core]
check_external_files = true
"#,
        )
        .unwrap();

        assert_eq!(config.filter.camel_case, WordOption::Remove);
        assert!(config.filter.check_all_caps);
        assert_eq!(config.filter.words_with_dots, WordOption::Split);
        assert!(config.core.check_external_files);
    }

    #[test]
    fn test_strategy_parsing_is_case_insensitive() {
        assert_eq!("Split".parse::<WordOption>(), Ok(WordOption::Split));
        assert_eq!(" leave ".parse::<WordOption>(), Ok(WordOption::Leave));
        assert!(WordOption::parse_for("camel_case", "explode").is_err());
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "Invalid strategy"))]
    fn test_unknown_strategy_falls_back_to_leave() {
        assert_eq!(WordOption::resolve("words_with_dots", "shred"), WordOption::Leave);
    }
}
