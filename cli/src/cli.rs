// SPDX-FileCopyrightText: 2026 The fantastical-cli contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, ffi::OsString, io, io::IsTerminal, path::PathBuf, process::ExitCode};

use clap::{ArgMatches, Command, ValueHint, arg, builder::styling, crate_version, value_parser};
use colored::Colorize;
use fantastical_core::{APP_NAME, Config, parse_config};
use tracing_subscriber::EnvFilter;

use crate::cmd_applescript::CmdAppleScript;
use crate::cmd_completion::{CmdCompletion, CmdCompletionInstall};
use crate::cmd_eventkit::{CmdEventKitCalendars, CmdEventKitEvents, CmdEventKitStatus};
use crate::cmd_parse::CmdParse;
use crate::cmd_show::CmdShow;
use crate::cmd_version::{CmdVersion, version_line};
use crate::context::Context;

/// Filter directives for logging, e.g. `FANTASTICAL_LOG=fantastical_core=trace`.
pub const LOG_ENV: &str = "FANTASTICAL_LOG";

const EXIT_FAILURE: u8 = 1;
const EXIT_USAGE: u8 = 2;

/// Run the Fantastical command-line interface.
pub async fn run() -> ExitCode {
    let cli = match Cli::try_parse_from(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(e.exit_code() as u8);
        }
    };

    match cli.run(&mut io::stdout()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", error_label(io::stderr().is_terminal()), e);
            ExitCode::from(exit_code(e.as_ref()))
        }
    }
}

/// The `Error:` prefix, red only when stderr is a terminal.
fn error_label(color: bool) -> String {
    if !color {
        return "Error:".to_string();
    }
    colored::control::set_override(true);
    "Error:".red().to_string()
}

/// Usage mistakes exit with 2, everything else with 1.
pub fn exit_code(err: &(dyn Error + 'static)) -> u8 {
    match err.downcast_ref::<fantastical_core::Error>() {
        Some(e) if e.is_usage() => EXIT_USAGE,
        _ => EXIT_FAILURE,
    }
}

/// Command-line interface
#[derive(Debug)]
pub struct Cli {
    /// Path to the configuration file
    pub config: Option<PathBuf>,

    /// The command to execute
    pub command: Commands,
}

impl Cli {
    /// Create the command-line interface
    pub fn command() -> Command {
        const STYLES: styling::Styles = styling::Styles::styled()
            .header(styling::AnsiColor::Green.on_default().bold())
            .usage(styling::AnsiColor::Green.on_default().bold())
            .literal(styling::AnsiColor::Blue.on_default().bold())
            .placeholder(styling::AnsiColor::Cyan.on_default());

        Command::new(APP_NAME)
            .about("Build Fantastical URL handlers, send AppleScript and query calendars via EventKit.")
            .version(crate_version!())
            .long_version(version_line())
            .styles(STYLES)
            .subcommand_required(true)
            .arg_required_else_help(true)
            .arg(
                arg!(-c --config <CONFIG> "Path to the configuration file")
                    .long_help(
                        "\
Path to the configuration file. Defaults to $FANTASTICAL_CONFIG, then \
~/Library/Application Support/fantastical/config.json on MacOS, \
$XDG_CONFIG_HOME/fantastical/config.json on Linux, %APPDATA%/fantastical/config.json \
on Windows. A .fantastical.json in the working directory is layered on top.",
                    )
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath)
                    .global(true),
            )
            .subcommand(CmdParse::command())
            .subcommand(CmdShow::command())
            .subcommand(CmdAppleScript::command())
            .subcommand(
                Command::new("eventkit")
                    .about("Query calendars and events through EventKit (macOS)")
                    .arg_required_else_help(true)
                    .subcommand_required(true)
                    .subcommand(CmdEventKitStatus::command())
                    .subcommand(CmdEventKitCalendars::command())
                    .subcommand(CmdEventKitEvents::command()),
            )
            .subcommand(CmdCompletion::command())
            .subcommand(CmdVersion::command())
    }

    /// Parse the specified arguments
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let commands = Self::command();
        let matches = commands.try_get_matches_from(args)?;
        Ok(Self::from(matches))
    }

    /// Create a CLI instance from the `ArgMatches`
    pub fn from(matches: ArgMatches) -> Self {
        use Commands::*;
        let command = match matches.subcommand() {
            Some((CmdParse::NAME, matches)) => Parse(CmdParse::from(matches)),
            Some((CmdShow::NAME, matches)) => Show(CmdShow::from(matches)),
            Some((CmdAppleScript::NAME, matches)) => AppleScript(CmdAppleScript::from(matches)),
            Some(("eventkit", matches)) => match matches.subcommand() {
                Some((CmdEventKitStatus::NAME, matches)) => {
                    EventKitStatus(CmdEventKitStatus::from(matches))
                }
                Some((CmdEventKitCalendars::NAME, matches)) => {
                    EventKitCalendars(CmdEventKitCalendars::from(matches))
                }
                Some((CmdEventKitEvents::NAME, matches)) => {
                    EventKitEvents(CmdEventKitEvents::from(matches))
                }
                _ => unreachable!(),
            },
            Some((CmdCompletion::NAME, matches)) => match matches.subcommand() {
                Some((CmdCompletionInstall::NAME, matches)) => {
                    CompletionInstall(CmdCompletionInstall::from(matches))
                }
                _ => Completion(CmdCompletion::from(matches)),
            },
            Some((CmdVersion::NAME, matches)) => Version(CmdVersion::from(matches)),
            _ => unreachable!(),
        };

        let config = matches.get_one("config").cloned();
        Cli { config, command }
    }

    /// Run the command
    pub async fn run(self, out: &mut impl io::Write) -> Result<(), Box<dyn Error>> {
        self.command.run(self.config, out).await
    }
}

/// The commands available in the CLI
#[derive(Debug, Clone)]
pub enum Commands {
    /// Build a parse URL from a sentence
    Parse(CmdParse),

    /// Build a show URL
    Show(CmdShow),

    /// Send a sentence through AppleScript
    AppleScript(CmdAppleScript),

    /// Show Calendar authorization status
    EventKitStatus(CmdEventKitStatus),

    /// List calendars
    EventKitCalendars(CmdEventKitCalendars),

    /// List events
    EventKitEvents(CmdEventKitEvents),

    /// Print shell completion
    Completion(CmdCompletion),

    /// Install shell completion
    CompletionInstall(CmdCompletionInstall),

    /// Print version information
    Version(CmdVersion),
}

impl Commands {
    /// Run the command, loading the configuration from `config` or the
    /// default locations
    #[rustfmt::skip]
    pub async fn run(
        self,
        config: Option<PathBuf>,
        out: &mut impl io::Write,
    ) -> Result<(), Box<dyn Error>> {
        use Commands::*;

        // no configuration needed
        let command = match self {
            Completion(a)        => return a.run(out),
            CompletionInstall(a) => return a.run(out).await,
            Version(a)           => return a.run(out),
            command => command,
        };

        let config = parse_config(config).await?;
        command.run_with(config, out).await
    }

    /// Run the command with an already loaded configuration
    #[rustfmt::skip]
    pub async fn run_with(
        self,
        config: Config,
        out: &mut impl io::Write,
    ) -> Result<(), Box<dyn Error>> {
        use Commands::*;

        init_tracing(self.verbose() || config.output.verbose.unwrap_or(false));
        tracing::debug!(?config, "loaded configuration");

        let ctx = Context::new(config);
        match self {
            Parse(a)             => a.run(&ctx, out).await,
            Show(a)              => a.run(&ctx, out).await,
            AppleScript(a)       => a.run(&ctx, out).await,
            EventKitStatus(a)    => a.run(&ctx, out).await,
            EventKitCalendars(a) => a.run(&ctx, out).await,
            EventKitEvents(a)    => a.run(&ctx, out).await,
            Completion(a)        => a.run(out),
            CompletionInstall(a) => a.run(out).await,
            Version(a)           => a.run(out),
        }
    }

    fn verbose(&self) -> bool {
        use Commands::*;
        match self {
            Parse(a) => a.verbose,
            Show(a) => a.verbose,
            AppleScript(a) => a.verbose,
            EventKitStatus(a) => a.verbose,
            EventKitCalendars(a) => a.verbose,
            EventKitEvents(a) => a.verbose,
            Completion(_) | CompletionInstall(_) | Version(_) => false,
        }
    }
}

/// Install the stderr subscriber once; `FANTASTICAL_LOG` wins over `verbose`.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| match verbose {
        true => EnvFilter::new("debug"),
        false => EnvFilter::new("warn"),
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}
