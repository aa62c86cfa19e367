// SPDX-FileCopyrightText: 2026 The fantastical-cli contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use chrono::{DateTime, SecondsFormat, TimeZone};
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::process::Command;

use crate::APP_NAME;
use crate::dispatch::CommandLine;
use crate::error::{Error, Result};
use crate::eventkit::{AuthStatus, CalendarInfo, EventInfo};

/// Points at a prebuilt helper, bypassing the compile cache.
pub const HELPER_ENV: &str = "FANTASTICAL_EVENTKIT_HELPER";

/// Swift source of the helper, compiled on first use.
pub const HELPER_SOURCE: &str = include_str!("../../assets/eventkit-helper.swift");

const HELPER_NAME: &str = "eventkit-helper";

const BUILD_FAILED: &str =
    "build failed; install Xcode Command Line Tools (xcode-select --install)";

/// Cache key of the helper source: hex of the first 8 bytes of its SHA-256.
pub fn source_hash(source: &str) -> String {
    Sha256::digest(source.as_bytes())[..8]
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Finds the helper binary, compiling it into the cache when needed.
#[derive(Debug, Clone)]
pub struct HelperLocator {
    pub override_path: Option<PathBuf>,

    /// Directory holding the compiled helper, its source and hash.
    pub cache_root: Option<PathBuf>,

    pub source: &'static str,

    /// Tried in order; each is invoked with
    /// `-O -framework EventKit -o <bin> <src>` appended.
    pub compilers: Vec<CommandLine>,

    /// Compiling only works with Xcode tools present.
    pub allow_compile: bool,
}

impl HelperLocator {
    pub fn from_env() -> Self {
        let override_path = std::env::var(HELPER_ENV)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Self {
            override_path,
            cache_root: dirs::cache_dir().map(|dir| dir.join(APP_NAME)),
            source: HELPER_SOURCE,
            compilers: vec![
                CommandLine {
                    program: "xcrun".to_string(),
                    args: vec!["swiftc".to_string()],
                },
                CommandLine {
                    program: "swiftc".to_string(),
                    args: vec![],
                },
            ],
            allow_compile: cfg!(target_os = "macos"),
        }
    }

    /// Path of a runnable helper.
    #[tracing::instrument(skip(self), fields(override_path = ?self.override_path))]
    pub async fn resolve(&self) -> Result<PathBuf> {
        if let Some(path) = &self.override_path {
            tracing::debug!(path = %path.display(), "using helper override");
            return Ok(path.clone());
        }

        let root = self
            .cache_root
            .as_ref()
            .ok_or_else(|| Error::Helper("user cache directory not found".to_string()))?;
        let binary = root.join(HELPER_NAME);
        let source_path = root.join(format!("{HELPER_NAME}.swift"));
        let hash_path = root.join(format!("{HELPER_NAME}.hash"));
        let hash = source_hash(self.source);

        let built = fs::try_exists(&binary).await.unwrap_or(false);
        if built {
            match fs::read_to_string(&hash_path).await {
                Ok(current) if current.trim() == hash => {
                    tracing::debug!(path = %binary.display(), "using cached helper");
                    return Ok(binary);
                }
                Ok(_) => tracing::debug!("helper hash mismatch; recompiling"),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::debug!("helper hash missing; recompiling")
                }
                Err(e) => tracing::warn!("failed to read {}: {e}", hash_path.display()),
            }
        }

        if !self.allow_compile {
            return Err(Error::Unsupported(format!(
                "eventkit is only available on macOS (or set {HELPER_ENV} to a prebuilt helper)"
            )));
        }

        fs::create_dir_all(root)
            .await
            .map_err(|e| Error::io(format!("failed to create {}", root.display()), e))?;
        fs::write(&source_path, self.source)
            .await
            .map_err(|e| Error::io(format!("failed to write {}", source_path.display()), e))?;

        self.compile(&source_path, &binary).await?;

        if let Err(e) = fs::write(&hash_path, format!("{hash}\n")).await {
            tracing::warn!("failed to write {}: {e}", hash_path.display());
        }
        Ok(binary)
    }

    async fn compile(&self, source: &Path, output: &Path) -> Result<()> {
        for compiler in &self.compilers {
            let Ok(program) = which::which(&compiler.program) else {
                tracing::debug!(program = %compiler.program, "compiler not found");
                continue;
            };

            tracing::info!(program = %compiler.program, "compiling eventkit helper");
            let status = Command::new(&program)
                .args(&compiler.args)
                .args(["-O", "-framework", "EventKit", "-o"])
                .arg(output)
                .arg(source)
                .stdin(Stdio::null())
                .stdout(std::io::stderr())
                .stderr(Stdio::inherit())
                .status()
                .await;

            match status {
                Ok(status) if status.success() => return Ok(()),
                Ok(status) => {
                    tracing::debug!(program = %compiler.program, %status, "compiler failed")
                }
                Err(e) => tracing::debug!(program = %compiler.program, "failed to spawn: {e}"),
            }
        }
        Err(Error::Helper(BUILD_FAILED.to_string()))
    }
}

/// An event query as sent to the helper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery<Tz: TimeZone> {
    pub from: DateTime<Tz>,
    pub to: DateTime<Tz>,
    pub calendars: Vec<String>,
    pub calendar_ids: Vec<String>,
}

/// Client for a resolved helper binary.
#[derive(Debug, Clone)]
pub struct EventKitHelper {
    program: PathBuf,
    no_input: bool,
}

impl EventKitHelper {
    /// `no_input` stops the helper from triggering the permission prompt.
    pub fn new(program: PathBuf, no_input: bool) -> Self {
        Self { program, no_input }
    }

    pub async fn locate(locator: &HelperLocator, no_input: bool) -> Result<Self> {
        Ok(Self::new(locator.resolve().await?, no_input))
    }

    pub async fn status(&self) -> Result<AuthStatus> {
        self.call(vec!["status".to_string()]).await
    }

    pub async fn calendars(&self) -> Result<Vec<CalendarInfo>> {
        let mut args = vec!["calendars".to_string()];
        self.push_no_input(&mut args);
        self.call(args).await
    }

    pub async fn events<Tz>(&self, query: &EventQuery<Tz>) -> Result<Vec<EventInfo>>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let mut args = vec![
            "events".to_string(),
            "--from".to_string(),
            query.from.to_rfc3339_opts(SecondsFormat::Secs, true),
            "--to".to_string(),
            query.to.to_rfc3339_opts(SecondsFormat::Secs, true),
        ];
        for name in &query.calendars {
            args.extend(["--calendar".to_string(), name.clone()]);
        }
        for id in &query.calendar_ids {
            args.extend(["--calendar-id".to_string(), id.clone()]);
        }
        self.push_no_input(&mut args);
        self.call(args).await
    }

    fn push_no_input(&self, args: &mut Vec<String>) {
        if self.no_input {
            args.push("--no-input".to_string());
        }
    }

    async fn call<T: DeserializeOwned>(&self, args: Vec<String>) -> Result<T> {
        tracing::debug!(program = %self.program.display(), ?args, "running eventkit helper");
        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::io(format!("failed to spawn {}", self.program.display()), e))?;

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| Error::io(format!("failed to wait for {}", self.program.display()), e))?;

        if !output.status.success() {
            return Err(Error::Process {
                program: HELPER_NAME.to_string(),
                status: output.status.to_string(),
            });
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| Error::Helper(format!("unexpected output: {e}")))
    }
}
