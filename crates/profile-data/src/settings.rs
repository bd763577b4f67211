//! The `settings.ini` file.
//!
//! Format: one `KEY = value ; comment` per line. Lines starting with `;` and
//! blank lines are skipped, values may be wrapped in double quotes (which is
//! the only way to put a `;` inside one). Unknown keys and values that do not
//! parse as the key's type are reported and otherwise ignored, so a broken
//! line never keeps the agent from starting.
//!
//! When the file does not exist it is generated from the defaults so the
//! operator has something to edit.

use crate::error::{DataError, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Values wider than this do not push the comment column further right
const MAX_VALUE_COLUMN: usize = 25;

const HEADER: &str = "; This file was automatically generated by AutoMatch.\n\
                      ; You can edit it to change the default settings.\n\
                      ; Invalid settings will be ignored and cause a notice.\n";

/// Type of a setting, as written in the generated comments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    Int,
    Float,
    Bool,
    Str,
}

impl fmt::Display for SettingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SettingKind::Int => "int",
            SettingKind::Float => "float",
            SettingKind::Bool => "bool",
            SettingKind::Str => "string",
        };
        f.write_str(name)
    }
}

/// Key, type, and optional unit/comment of every known setting, in file order
const SETTING_KEYS: &[(&str, SettingKind, Option<&str>)] = &[
    ("ORIGIN_URL", SettingKind::Str, None),
    ("BASE_URL", SettingKind::Str, None),
    ("LEGACY_API_PREFIX", SettingKind::Str, None),
    ("GRAPHQL_API_SUFFIX", SettingKind::Str, None),
    ("COOKIE_FILE", SettingKind::Str, None),
    ("FORBIDDEN_STRINGS_FILE", SettingKind::Str, None),
    ("KNOWN_PROFILES_FILE", SettingKind::Str, None),
    ("PROGRESS_MAX_LENGTH", SettingKind::Int, Some("characters")),
    ("MILES_IN_KM", SettingKind::Float, Some("kms to miles conversion ratio")),
    ("USER_AGENT", SettingKind::Str, Some("User agent to use when making requests")),
    ("NO_RECOMMENDATIONS_RETRY_INTERVAL", SettingKind::Int, Some("minutes")),
    ("MAX_SLEEP_TIME", SettingKind::Int, Some("seconds")),
    ("BIO_MIN_LENGTH", SettingKind::Int, Some("characters")),
    ("AUTO_LIKE", SettingKind::Bool, None),
    ("ASK_BEFORE_LIKE", SettingKind::Bool, None),
    ("ASK_BEFORE_LIKE_DEFAULT_CHOICE", SettingKind::Str, Some("y/n")),
    ("AUTO_PASS", SettingKind::Bool, None),
];

/// Answer used when the operator just presses enter at the like prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultChoice {
    Like,
    Pass,
}

impl DefaultChoice {
    pub fn as_char(&self) -> char {
        match self {
            DefaultChoice::Like => 'y',
            DefaultChoice::Pass => 'n',
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "y" => Some(DefaultChoice::Like),
            "n" => Some(DefaultChoice::Pass),
            _ => None,
        }
    }
}

/// Where the loaded settings came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsSource {
    File,
    Generated,
}

/// Every tunable of the agent.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub origin_url: String,
    pub base_url: String,
    pub legacy_api_prefix: String,
    pub graphql_api_suffix: String,
    pub cookie_file: PathBuf,
    pub forbidden_strings_file: PathBuf,
    pub known_profiles_file: PathBuf,
    pub progress_max_length: usize,
    pub miles_in_km: f64,
    pub user_agent: String,
    /// Minutes to wait when a batch had no real candidates
    pub no_recommendations_retry_interval: u64,
    /// Upper bound, in seconds, of the random pause between batches
    pub max_sleep_time: u64,
    pub bio_min_length: usize,
    pub auto_like: bool,
    pub ask_before_like: bool,
    pub ask_before_like_default_choice: DefaultChoice,
    pub auto_pass: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            origin_url: "https://okcupid.com".to_string(),
            base_url: "okcupid.com".to_string(),
            legacy_api_prefix: "api.".to_string(),
            graphql_api_suffix: "graphql/".to_string(),
            cookie_file: PathBuf::from("cookies"),
            forbidden_strings_file: PathBuf::from("forbidden_strings"),
            known_profiles_file: PathBuf::from("known_profiles.json"),
            progress_max_length: 80,
            miles_in_km: 1.60934,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/101.0.4951.54 Safari/537.36"
                .to_string(),
            no_recommendations_retry_interval: 5,
            max_sleep_time: 3,
            bio_min_length: 200,
            auto_like: true,
            ask_before_like: true,
            ask_before_like_default_choice: DefaultChoice::Pass,
            auto_pass: true,
        }
    }
}

impl Settings {
    /// Load settings from `path`, writing a default file first if there is none.
    pub fn load(path: &Path) -> Result<(Self, SettingsSource)> {
        match fs::read_to_string(path) {
            Ok(content) => Ok((Self::parse(&content), SettingsSource::File)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let settings = Self::default();
                fs::write(path, settings.render()).map_err(|e| DataError::io(path, e))?;
                debug!("Generated default settings at {}", path.display());
                Ok((settings, SettingsSource::Generated))
            }
            Err(e) => Err(DataError::io(path, e)),
        }
    }

    /// Parse file content on top of the defaults.
    pub fn parse(content: &str) -> Self {
        let mut settings = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') {
                continue;
            }

            let Some((key, raw)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = strip_comment(raw.trim());

            let Some(kind) = kind_of(key) else {
                warn!("Unknown setting '{}'", key);
                continue;
            };

            if let Err(e) = settings.apply(key, kind, &value) {
                warn!(
                    "{} (expected {}), using default value \"{}\"",
                    e,
                    kind,
                    settings.value_of(key).unwrap_or_default()
                );
            }
        }

        settings
    }

    /// Render the settings in the generated-file layout.
    pub fn render(&self) -> String {
        let rows: Vec<(&str, String, String)> = SETTING_KEYS
            .iter()
            .map(|(key, kind, comment)| {
                let value = self.value_of(key).unwrap_or_default();
                let value = if value.contains(' ') {
                    format!("\"{value}\"")
                } else {
                    value
                };
                let comment = match comment {
                    Some(comment) => format!("{comment} ({kind})"),
                    None => kind.to_string(),
                };
                (*key, value, comment)
            })
            .collect();

        let key_width = rows.iter().map(|(k, _, _)| k.len()).max().unwrap_or(0);
        let value_width = rows
            .iter()
            .map(|(_, v, _)| v.chars().count())
            .max()
            .unwrap_or(0)
            .min(MAX_VALUE_COLUMN);

        let mut out = String::from(HEADER);
        out.push('\n');
        for (key, value, comment) in rows {
            out.push_str(&format!(
                "{key:<key_width$} = {value:<value_width$} ; {comment}\n"
            ));
        }
        out
    }

    fn apply(&mut self, key: &str, kind: SettingKind, value: &str) -> Result<()> {
        let invalid = || DataError::InvalidSetting {
            key: key.to_string(),
            value: value.to_string(),
        };

        match kind {
            SettingKind::Int => {
                let n: u64 = value.parse().map_err(|_| invalid())?;
                match key {
                    "PROGRESS_MAX_LENGTH" => self.progress_max_length = n as usize,
                    "NO_RECOMMENDATIONS_RETRY_INTERVAL" => {
                        self.no_recommendations_retry_interval = n
                    }
                    "MAX_SLEEP_TIME" => self.max_sleep_time = n,
                    "BIO_MIN_LENGTH" => self.bio_min_length = n as usize,
                    _ => return Err(invalid()),
                }
            }
            SettingKind::Float => {
                let x: f64 = value.parse().map_err(|_| invalid())?;
                if !x.is_finite() {
                    return Err(invalid());
                }
                match key {
                    "MILES_IN_KM" => self.miles_in_km = x,
                    _ => return Err(invalid()),
                }
            }
            SettingKind::Bool => {
                let flag = !matches!(unquote(value), "" | "0" | "false");
                match key {
                    "AUTO_LIKE" => self.auto_like = flag,
                    "ASK_BEFORE_LIKE" => self.ask_before_like = flag,
                    "AUTO_PASS" => self.auto_pass = flag,
                    _ => return Err(invalid()),
                }
            }
            SettingKind::Str => {
                let text = unquote(value).to_string();
                match key {
                    "ORIGIN_URL" => self.origin_url = text,
                    "BASE_URL" => self.base_url = text,
                    "LEGACY_API_PREFIX" => self.legacy_api_prefix = text,
                    "GRAPHQL_API_SUFFIX" => self.graphql_api_suffix = text,
                    "COOKIE_FILE" => self.cookie_file = PathBuf::from(text),
                    "FORBIDDEN_STRINGS_FILE" => self.forbidden_strings_file = PathBuf::from(text),
                    "KNOWN_PROFILES_FILE" => self.known_profiles_file = PathBuf::from(text),
                    "USER_AGENT" => self.user_agent = text,
                    "ASK_BEFORE_LIKE_DEFAULT_CHOICE" => {
                        self.ask_before_like_default_choice =
                            DefaultChoice::parse(&text).ok_or_else(invalid)?
                    }
                    _ => return Err(invalid()),
                }
            }
        }

        Ok(())
    }

    fn value_of(&self, key: &str) -> Option<String> {
        let value = match key {
            "ORIGIN_URL" => self.origin_url.clone(),
            "BASE_URL" => self.base_url.clone(),
            "LEGACY_API_PREFIX" => self.legacy_api_prefix.clone(),
            "GRAPHQL_API_SUFFIX" => self.graphql_api_suffix.clone(),
            "COOKIE_FILE" => self.cookie_file.display().to_string(),
            "FORBIDDEN_STRINGS_FILE" => self.forbidden_strings_file.display().to_string(),
            "KNOWN_PROFILES_FILE" => self.known_profiles_file.display().to_string(),
            "PROGRESS_MAX_LENGTH" => self.progress_max_length.to_string(),
            "MILES_IN_KM" => self.miles_in_km.to_string(),
            "USER_AGENT" => self.user_agent.clone(),
            "NO_RECOMMENDATIONS_RETRY_INTERVAL" => {
                self.no_recommendations_retry_interval.to_string()
            }
            "MAX_SLEEP_TIME" => self.max_sleep_time.to_string(),
            "BIO_MIN_LENGTH" => self.bio_min_length.to_string(),
            "AUTO_LIKE" => self.auto_like.to_string(),
            "ASK_BEFORE_LIKE" => self.ask_before_like.to_string(),
            "ASK_BEFORE_LIKE_DEFAULT_CHOICE" => {
                self.ask_before_like_default_choice.as_char().to_string()
            }
            "AUTO_PASS" => self.auto_pass.to_string(),
            _ => return None,
        };
        Some(value)
    }
}

fn kind_of(key: &str) -> Option<SettingKind> {
    SETTING_KEYS
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|(_, kind, _)| *kind)
}

/// Drop a trailing `; comment`, leaving quoted values intact.
fn strip_comment(raw: &str) -> String {
    if let Some(rest) = raw.strip_prefix('"') {
        if let Some(end) = rest.find('"') {
            return format!("\"{}\"", &rest[..end]);
        }
    }
    match raw.find(';') {
        Some(idx) => raw[..idx].trim().to_string(),
        None => raw.to_string(),
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_overrides_defaults() {
        let settings = Settings::parse(
            "; comment line\n\
             \n\
             BIO_MIN_LENGTH = 50 ; characters (int)\n\
             AUTO_LIKE      = false\n\
             ASK_BEFORE_LIKE_DEFAULT_CHOICE = y\n\
             MILES_IN_KM = 1.5\n",
        );

        assert_eq!(settings.bio_min_length, 50);
        assert!(!settings.auto_like);
        assert_eq!(settings.ask_before_like_default_choice, DefaultChoice::Like);
        assert_eq!(settings.miles_in_km, 1.5);
        assert!(settings.auto_pass);
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let settings = Settings::parse(
            "MAX_SLEEP_TIME = soon\n\
             ASK_BEFORE_LIKE_DEFAULT_CHOICE = maybe\n\
             NOT_A_SETTING = 1\n\
             no equals sign here\n",
        );

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_bool_false_words_and_anything_else() {
        let settings = Settings::parse("AUTO_PASS =\nASK_BEFORE_LIKE = 0\nAUTO_LIKE = yes\n");
        assert!(!settings.auto_pass);
        assert!(!settings.ask_before_like);
        assert!(settings.auto_like);
    }

    #[test]
    fn test_quoted_value_keeps_semicolons() {
        let settings = Settings::parse("USER_AGENT = \"Agent (X; Y)\" ; comment\n");
        assert_eq!(settings.user_agent, "Agent (X; Y)");
    }

    #[test]
    fn test_quoted_bool_is_unquoted() {
        let settings = Settings::parse("AUTO_PASS = \"false\"\nAUTO_LIKE = \"0\" ; off\n");
        assert!(!settings.auto_pass);
        assert!(!settings.auto_like);
    }

    #[test]
    fn test_render_then_parse_gives_defaults() {
        let defaults = Settings::default();
        assert_eq!(Settings::parse(&defaults.render()), defaults);
    }

    #[test]
    fn test_render_layout() {
        let rendered = Settings::default().render();
        assert!(rendered.starts_with("; This file was automatically generated by AutoMatch."));
        let key_width = "NO_RECOMMENDATIONS_RETRY_INTERVAL".len();
        assert!(rendered.contains(&format!("{:<key_width$} = 200", "BIO_MIN_LENGTH")));
        assert!(rendered.contains("; characters (int)"));
        assert!(rendered.contains("; bool"));
    }

    #[test]
    fn test_load_generates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.ini");

        let (settings, source) = Settings::load(&path).unwrap();
        assert_eq!(source, SettingsSource::Generated);
        assert_eq!(settings, Settings::default());
        assert!(path.exists());

        let (_, source) = Settings::load(&path).unwrap();
        assert_eq!(source, SettingsSource::File);
    }
}
