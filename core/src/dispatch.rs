// SPDX-FileCopyrightText: 2026 The fantastical-cli contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Handing requests to the operating system: opening URLs, the clipboard and
//! `osascript`.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::{Error, Result};

/// Replaces the system URL opener, e.g. `FANTASTICAL_OPEN_COMMAND=true` in tests.
pub const OPEN_COMMAND_ENV: &str = "FANTASTICAL_OPEN_COMMAND";
/// Replaces `osascript`.
pub const OSASCRIPT_COMMAND_ENV: &str = "FANTASTICAL_OSASCRIPT_COMMAND";
/// Replaces the clipboard tool; the text is written to its stdin.
pub const COPY_COMMAND_ENV: &str = "FANTASTICAL_COPY_COMMAND";

/// Clipboard tools tried in order when no override is set.
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("clip", &[]),
];

/// A program with leading arguments, as given in an override variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Split on whitespace; `None` when blank.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut words = raw.split_whitespace().map(str::to_string);
        let program = words.next()?;
        Some(Self {
            program,
            args: words.collect(),
        })
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    /// Log actions instead of performing them.
    pub dry_run: bool,
    pub open_command: Option<CommandLine>,
    pub osascript_command: Option<CommandLine>,
    pub copy_command: Option<CommandLine>,
}

impl Dispatcher {
    pub fn from_env() -> Self {
        Self::with_env(|key| std::env::var(key).ok())
    }

    pub fn with_env<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let command = |key: &str| lookup(key).as_deref().and_then(CommandLine::parse);
        Self {
            dry_run: false,
            open_command: command(OPEN_COMMAND_ENV),
            osascript_command: command(OSASCRIPT_COMMAND_ENV),
            copy_command: command(COPY_COMMAND_ENV),
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Open `url` with the system's default handler.
    pub async fn open_url(&self, url: &str) -> Result<()> {
        if self.dry_run {
            tracing::info!(url, "dry run: would open URL");
            return Ok(());
        }

        if let Some(opener) = &self.open_command {
            tracing::debug!(program = %opener.program, url, "opening URL with override");
            let mut cmd = opener.command();
            cmd.arg(url);
            return run(cmd, &opener.program, None).await;
        }

        let mut last_err = None;
        for std_cmd in open::commands(url) {
            let program = std_cmd.get_program().to_string_lossy().into_owned();
            tracing::debug!(%program, url, "opening URL");
            match run(Command::from(std_cmd), &program, None).await {
                Ok(()) => return Ok(()),
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            Error::Unsupported(format!(
                "don't know how to open URLs on {} (use --print)",
                std::env::consts::OS
            ))
        }))
    }

    /// Place `text` on the clipboard.
    pub async fn copy(&self, text: &str) -> Result<()> {
        if self.dry_run {
            tracing::info!(text, "dry run: would copy to clipboard");
            return Ok(());
        }

        let (cmd, program) = match &self.copy_command {
            Some(tool) => (tool.command(), tool.program.clone()),
            None => {
                let (path, args) = find_clipboard_tool().ok_or_else(|| {
                    Error::Unsupported(
                        "clipboard tool not found (need pbcopy, wl-copy, xclip, xsel or clip)"
                            .to_string(),
                    )
                })?;
                let mut cmd = Command::new(&path);
                cmd.args(args);
                (cmd, path.display().to_string())
            }
        };

        tracing::debug!(%program, "copying to clipboard");
        run(cmd, &program, Some(text)).await
    }

    /// Run `osascript` with the given arguments, streaming its output.
    pub async fn run_osascript(&self, args: &[String]) -> Result<()> {
        if self.dry_run {
            tracing::info!(?args, "dry run: would run osascript");
            return Ok(());
        }

        let (mut cmd, program) = match &self.osascript_command {
            Some(runner) => (runner.command(), runner.program.clone()),
            None if cfg!(target_os = "macos") => {
                (Command::new("osascript"), "osascript".to_string())
            }
            None => {
                return Err(Error::Unsupported(
                    "applescript --run is only supported on macOS (osascript); use --print to output the script"
                        .to_string(),
                ));
            }
        };

        cmd.args(args);
        tracing::debug!(%program, "running AppleScript");
        run(cmd, &program, None).await
    }
}

fn find_clipboard_tool() -> Option<(PathBuf, &'static [&'static str])> {
    CLIPBOARD_TOOLS
        .iter()
        .find_map(|(name, args)| which::which(name).ok().map(|path| (path, *args)))
}

/// Spawn `cmd`, optionally feeding `stdin`, and fail on a non-zero exit.
async fn run(mut cmd: Command, program: &str, stdin: Option<&str>) -> Result<()> {
    cmd.stdin(if stdin.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    })
    .stdout(Stdio::inherit())
    .stderr(Stdio::inherit());

    let mut child = cmd
        .spawn()
        .map_err(|e| Error::io(format!("failed to spawn {program}"), e))?;

    if let Some(text) = stdin {
        let mut pipe = child
            .stdin
            .take()
            .ok_or_else(|| Error::Unsupported(format!("{program} has no stdin")))?;
        pipe.write_all(text.as_bytes())
            .await
            .map_err(|e| Error::io(format!("failed to write to {program}"), e))?;
        pipe.shutdown()
            .await
            .map_err(|e| Error::io(format!("failed to close stdin of {program}"), e))?;
    }

    let status = child
        .wait()
        .await
        .map_err(|e| Error::io(format!("failed to wait for {program}"), e))?;

    if status.success() {
        Ok(())
    } else {
        Err(Error::Process {
            program: program.to_string(),
            status: status.to_string(),
        })
    }
}
