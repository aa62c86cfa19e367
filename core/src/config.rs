// SPDX-FileCopyrightText: 2026 The fantastical-cli contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::APP_NAME;
use crate::date::WeekStart;
use crate::error::{Error, Result};
use crate::eventkit::Format;

/// Overrides the location of the user configuration file.
pub const CONFIG_ENV: &str = "FANTASTICAL_CONFIG";

/// Project-level configuration, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = ".fantastical.json";

const ENV_DEFAULT_OPEN: &str = "FANTASTICAL_DEFAULT_OPEN";
const ENV_DEFAULT_PRINT: &str = "FANTASTICAL_DEFAULT_PRINT";
const ENV_DEFAULT_COPY: &str = "FANTASTICAL_DEFAULT_COPY";
const ENV_DEFAULT_JSON: &str = "FANTASTICAL_DEFAULT_JSON";
const ENV_DEFAULT_PLAIN: &str = "FANTASTICAL_DEFAULT_PLAIN";
const ENV_DRY_RUN: &str = "FANTASTICAL_DRY_RUN";
const ENV_VERBOSE: &str = "FANTASTICAL_VERBOSE";
const ENV_DEFAULT_CALENDAR: &str = "FANTASTICAL_DEFAULT_CALENDAR";
const ENV_DEFAULT_NOTE: &str = "FANTASTICAL_DEFAULT_NOTE";
const ENV_DEFAULT_ADD: &str = "FANTASTICAL_DEFAULT_ADD";
const ENV_APPLESCRIPT_ADD: &str = "FANTASTICAL_APPLESCRIPT_ADD";
const ENV_APPLESCRIPT_RUN: &str = "FANTASTICAL_APPLESCRIPT_RUN";
const ENV_APPLESCRIPT_PRINT: &str = "FANTASTICAL_APPLESCRIPT_PRINT";
const ENV_WEEK_START: &str = "FANTASTICAL_WEEK_START";

/// Whether opening URLs and running AppleScript is on by default.
///
/// Only macOS has Fantastical, so elsewhere the CLI prints instead.
pub const fn platform_default_open() -> bool {
    cfg!(target_os = "macos")
}

/// Defaults layered from files and the environment. Command-line flags take
/// precedence over every field here.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub parse: ParseConfig,
    pub applescript: AppleScriptConfig,
    pub eventkit: EventKitConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub open: Option<bool>,
    pub print: Option<bool>,
    pub copy: Option<bool>,
    pub json: Option<bool>,
    pub plain: Option<bool>,
    pub dry_run: Option<bool>,
    pub verbose: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    pub calendar: Option<String>,
    pub note: Option<String>,
    pub add: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct AppleScriptConfig {
    pub add: Option<bool>,
    pub run: Option<bool>,
    pub print: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct EventKitConfig {
    pub week_start: Option<WeekStart>,
    pub format: Option<Format>,
}

impl Config {
    /// Overlay `other` on top of `self`, field by field.
    pub fn merge(&mut self, other: Config) {
        let Config {
            output,
            parse,
            applescript,
            eventkit,
        } = other;

        overlay(&mut self.output.open, output.open);
        overlay(&mut self.output.print, output.print);
        overlay(&mut self.output.copy, output.copy);
        overlay(&mut self.output.json, output.json);
        overlay(&mut self.output.plain, output.plain);
        overlay(&mut self.output.dry_run, output.dry_run);
        overlay(&mut self.output.verbose, output.verbose);

        overlay_text(&mut self.parse.calendar, parse.calendar);
        overlay_text(&mut self.parse.note, parse.note);
        overlay(&mut self.parse.add, parse.add);

        overlay(&mut self.applescript.add, applescript.add);
        overlay(&mut self.applescript.run, applescript.run);
        overlay(&mut self.applescript.print, applescript.print);

        overlay(&mut self.eventkit.week_start, eventkit.week_start);
        overlay(&mut self.eventkit.format, eventkit.format);
    }

    /// Apply `FANTASTICAL_*` variables found through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str| env_bool(&lookup, key);
        let text = |key: &str| env_text(&lookup, key);

        overlay(&mut self.output.open, flag(ENV_DEFAULT_OPEN));
        overlay(&mut self.output.print, flag(ENV_DEFAULT_PRINT));
        overlay(&mut self.output.copy, flag(ENV_DEFAULT_COPY));
        overlay(&mut self.output.json, flag(ENV_DEFAULT_JSON));
        overlay(&mut self.output.plain, flag(ENV_DEFAULT_PLAIN));
        overlay(&mut self.output.dry_run, flag(ENV_DRY_RUN));
        overlay(&mut self.output.verbose, flag(ENV_VERBOSE));

        overlay_text(&mut self.parse.calendar, text(ENV_DEFAULT_CALENDAR));
        overlay_text(&mut self.parse.note, text(ENV_DEFAULT_NOTE));
        overlay(&mut self.parse.add, flag(ENV_DEFAULT_ADD));

        overlay(&mut self.applescript.add, flag(ENV_APPLESCRIPT_ADD));
        overlay(&mut self.applescript.run, flag(ENV_APPLESCRIPT_RUN));
        overlay(&mut self.applescript.print, flag(ENV_APPLESCRIPT_PRINT));

        if let Some(raw) = text(ENV_WEEK_START) {
            match raw.parse() {
                Ok(week_start) => self.eventkit.week_start = Some(week_start),
                Err(e) => tracing::warn!(%raw, "ignoring {ENV_WEEK_START}: {e}"),
            }
        }
    }
}

/// The files a configuration is read from, lowest precedence first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSources {
    pub user: Option<PathBuf>,
    pub project: Option<PathBuf>,
}

impl ConfigSources {
    /// Locate the user and project files.
    ///
    /// The user file is `path` when given, else `$FANTASTICAL_CONFIG`, else
    /// `<config dir>/fantastical/config.json`.
    pub fn discover<F>(path: Option<PathBuf>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let user = path
            .filter(|p| !p.as_os_str().is_empty())
            .or_else(|| env_text(&lookup, CONFIG_ENV).map(PathBuf::from))
            .or_else(|| match get_config_dir() {
                Some(dir) => Some(dir.join(APP_NAME).join("config.json")),
                None => {
                    tracing::warn!("user-specific config directory not found");
                    None
                }
            });

        Self {
            user,
            project: Some(PathBuf::from(PROJECT_CONFIG_FILE)),
        }
    }
}

/// Load the configuration for this process: files found through
/// [`ConfigSources::discover`] overlaid with the process environment.
pub async fn parse_config(path: Option<PathBuf>) -> Result<Config> {
    let lookup = |key: &str| std::env::var(key).ok();
    let sources = ConfigSources::discover(path, lookup);
    load_config(&sources, lookup).await
}

#[tracing::instrument(skip(lookup))]
pub async fn load_config<F>(sources: &ConfigSources, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = Config::default();
    for path in [&sources.user, &sources.project].into_iter().flatten() {
        if let Some(layer) = read_config_file(path).await? {
            tracing::debug!(path = %path.display(), "merging config file");
            config.merge(layer);
        }
    }
    config.apply_env(lookup);
    Ok(config)
}

/// Read one configuration file. Missing and blank files yield `None`.
pub async fn read_config_file(path: &Path) -> Result<Option<Config>> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(Error::Config {
                path: path.to_owned(),
                message: format!("read failed: {e}"),
            });
        }
    };

    if content.trim().is_empty() {
        return Ok(None);
    }

    let is_toml = path.extension().is_some_and(|ext| ext == "toml");
    let parsed = if is_toml {
        toml::from_str(&content).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(&content).map_err(|e| e.to_string())
    };

    parsed.map(Some).map_err(|message| Error::Config {
        path: path.to_owned(),
        message: format!("parse failed: {message}"),
    })
}

/// Parse a boolean the way Go's `strconv.ParseBool` does.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn env_text<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_bool<F>(lookup: &F, key: &str) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = env_text(lookup, key)?;
    let parsed = parse_bool(&raw);
    if parsed.is_none() {
        tracing::debug!(key, %raw, "ignoring unrecognized boolean");
    }
    parsed
}

fn overlay<T>(dst: &mut Option<T>, src: Option<T>) {
    if src.is_some() {
        *dst = src;
    }
}

fn overlay_text(dst: &mut Option<String>, src: Option<String>) {
    if let Some(src) = src.filter(|s| !s.trim().is_empty()) {
        *dst = Some(src);
    }
}

/// `~/Library/Application Support` on macOS, `$XDG_CONFIG_HOME` on other
/// unix systems, the platform default elsewhere.
fn get_config_dir() -> Option<PathBuf> {
    #[cfg(all(unix, not(target_os = "macos")))]
    let config_dir = xdg::BaseDirectories::new().get_config_home();
    #[cfg(any(not(unix), target_os = "macos"))]
    let config_dir = dirs::config_dir();
    config_dir
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_bool_go_spelling() {
        for s in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse_bool(s), Some(true), "{s}");
        }
        for s in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_bool(s), Some(false), "{s}");
        }
        assert_eq!(parse_bool("yes"), None);
        assert_eq!(parse_bool("tRuE"), None);
    }

    #[test]
    fn test_discover_falls_back_to_user_config_dir() {
        let sources = ConfigSources::discover(None, env(&[]));
        let expected = get_config_dir().map(|dir| dir.join(APP_NAME).join("config.json"));
        assert_eq!(sources.user, expected);
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn test_user_config_in_application_support() {
        let user = ConfigSources::discover(None, env(&[])).user.unwrap();
        assert!(
            user.ends_with("Library/Application Support/fantastical/config.json"),
            "{}",
            user.display()
        );
    }

    #[test]
    fn test_discover_prefers_explicit_path() {
        let sources = ConfigSources::discover(
            Some(PathBuf::from("/tmp/cli.json")),
            env(&[(CONFIG_ENV, "/tmp/env.json")]),
        );
        assert_eq!(sources.user, Some(PathBuf::from("/tmp/cli.json")));
        assert_eq!(sources.project, Some(PathBuf::from(PROJECT_CONFIG_FILE)));
    }

    #[test]
    fn test_discover_uses_env_path() {
        let sources = ConfigSources::discover(None, env(&[(CONFIG_ENV, " /tmp/env.json ")]));
        assert_eq!(sources.user, Some(PathBuf::from("/tmp/env.json")));
    }

    #[tokio::test]
    async fn test_missing_and_blank_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        let blank = write(&dir, "blank.json", "  \n");
        let sources = ConfigSources {
            user: Some(dir.path().join("missing.json")),
            project: Some(blank),
        };
        let config = load_config(&sources, env(&[])).await.unwrap();
        assert_eq!(config, Config::default());
    }

    #[tokio::test]
    async fn test_project_overrides_user() {
        let dir = TempDir::new().unwrap();
        let user = write(
            &dir,
            "user.json",
            r#"{"output": {"open": false, "print": true}, "parse": {"calendar": "Home", "note": "n"}}"#,
        );
        let project = write(
            &dir,
            "project.json",
            r#"{"output": {"open": true}, "parse": {"calendar": "Work", "note": "  "}}"#,
        );
        let sources = ConfigSources {
            user: Some(user),
            project: Some(project),
        };

        let config = load_config(&sources, env(&[])).await.unwrap();
        assert_eq!(config.output.open, Some(true));
        assert_eq!(config.output.print, Some(true));
        assert_eq!(config.parse.calendar.as_deref(), Some("Work"));
        assert_eq!(config.parse.note.as_deref(), Some("n"));
    }

    #[tokio::test]
    async fn test_env_overrides_files() {
        let dir = TempDir::new().unwrap();
        let user = write(
            &dir,
            "user.json",
            r#"{"parse": {"calendar": "Work", "add": false}, "applescript": {"run": true}}"#,
        );
        let sources = ConfigSources {
            user: Some(user),
            project: None,
        };
        let lookup = env(&[
            (ENV_DEFAULT_CALENDAR, "Personal"),
            (ENV_DEFAULT_ADD, "1"),
            (ENV_APPLESCRIPT_RUN, "F"),
            (ENV_DRY_RUN, "maybe"),
            (ENV_WEEK_START, "sunday"),
        ]);

        let config = load_config(&sources, lookup).await.unwrap();
        assert_eq!(config.parse.calendar.as_deref(), Some("Personal"));
        assert_eq!(config.parse.add, Some(true));
        assert_eq!(config.applescript.run, Some(false));
        assert_eq!(config.output.dry_run, None);
        assert_eq!(config.eventkit.week_start, Some(WeekStart::Sunday));
    }

    #[tokio::test]
    async fn test_toml_config() {
        let dir = TempDir::new().unwrap();
        let user = write(
            &dir,
            "config.toml",
            r#"
[output]
copy = true

[eventkit]
week_start = "sunday"
format = "table"
"#,
        );
        let config = read_config_file(&user).await.unwrap().unwrap();
        assert_eq!(config.output.copy, Some(true));
        assert_eq!(config.eventkit.week_start, Some(WeekStart::Sunday));
        assert_eq!(config.eventkit.format, Some(Format::Table));
    }

    #[tokio::test]
    async fn test_malformed_config_names_path() {
        let dir = TempDir::new().unwrap();
        let user = write(&dir, "broken.json", "{ not json");
        let err = read_config_file(&user).await.unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("broken.json"));
    }
}
