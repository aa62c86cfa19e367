// SPDX-FileCopyrightText: 2026 The fantastical-cli contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{Arg, ArgAction, ArgMatches, arg};
use fantastical_core::eventkit::Format;
use fantastical_core::{OutputConfig, parse_bool, platform_default_open};

#[derive(Debug, Clone, Copy)]
pub struct CommonArgs;

impl CommonArgs {
    pub fn verbose() -> Arg {
        arg!(-v --verbose "Log debug details to stderr")
    }

    pub fn get_verbose(matches: &ArgMatches) -> bool {
        matches.get_flag("verbose")
    }

    pub fn dry_run() -> Arg {
        toggle("dry-run", "Log what would be opened, copied or run without doing it")
    }

    pub fn get_dry_run(matches: &ArgMatches) -> Option<bool> {
        get_toggle(matches, "dry-run")
    }

    pub fn stdin() -> Arg {
        arg!(--stdin "Read the sentence from standard input")
    }

    pub fn get_stdin(matches: &ArgMatches) -> bool {
        matches.get_flag("stdin")
    }

    pub fn sentence() -> Arg {
        arg!(sentence: [SENTENCE] "Natural-language sentence, e.g. \"Dinner with Sam tomorrow 7pm\"")
            .num_args(1..)
    }

    pub fn get_sentence(matches: &ArgMatches) -> Vec<String> {
        matches
            .get_many::<String>("sentence")
            .map(|words| words.cloned().collect())
            .unwrap_or_default()
    }
}

/// A boolean flag that also accepts an explicit value: `--open`,
/// `--open=true`, `--open=false`.
pub fn toggle(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .value_name("BOOL")
        .num_args(0..=1)
        .require_equals(true)
        .default_missing_value("true")
        .action(ArgAction::Set)
        .value_parser(|s: &str| parse_bool(s).ok_or_else(|| format!("invalid boolean {s:?}")))
}

pub fn get_toggle(matches: &ArgMatches, name: &str) -> Option<bool> {
    matches.get_one::<bool>(name).copied()
}

/// Output flags shared by the URL-building commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlOutputArgs {
    pub open: Option<bool>,
    pub print: Option<bool>,
    pub copy: Option<bool>,
    pub json: Option<bool>,
    pub plain: Option<bool>,
    pub dry_run: Option<bool>,
}

impl UrlOutputArgs {
    pub fn args() -> [Arg; 6] {
        [
            toggle("open", "Open the URL with the system handler (default on macOS)"),
            toggle("print", "Print the URL to stdout"),
            toggle("copy", "Copy the URL to the clipboard"),
            toggle("json", "Print a JSON object describing the result"),
            toggle("plain", "Print the bare URL (default)"),
            CommonArgs::dry_run(),
        ]
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            open: get_toggle(matches, "open"),
            print: get_toggle(matches, "print"),
            copy: get_toggle(matches, "copy"),
            json: get_toggle(matches, "json"),
            plain: get_toggle(matches, "plain"),
            dry_run: CommonArgs::get_dry_run(matches),
        }
    }

    /// Combine with configured defaults. Flags win field by field, except that
    /// naming either `--json` or `--plain` ignores both configured values.
    pub fn resolve(&self, config: &OutputConfig) -> Result<UrlOutput, Box<dyn Error>> {
        let (json, plain) = match (self.json, self.plain) {
            (None, None) => (
                config.json.unwrap_or(false),
                config.plain.unwrap_or(false),
            ),
            (json, plain) => (json.unwrap_or(false), plain.unwrap_or(false)),
        };
        if json && plain {
            let err = fantastical_core::Error::usage("--json and --plain are mutually exclusive");
            return Err(err.into());
        }

        Ok(UrlOutput {
            open: self.open.or(config.open).unwrap_or(platform_default_open()),
            print: self.print.or(config.print).unwrap_or(false),
            copy: self.copy.or(config.copy).unwrap_or(false),
            json,
            dry_run: self.dry_run.or(config.dry_run).unwrap_or(false),
        })
    }
}

/// What to do with a generated URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UrlOutput {
    pub open: bool,
    pub print: bool,
    pub copy: bool,
    pub json: bool,
    pub dry_run: bool,
}

impl UrlOutput {
    /// The URL is printed when asked for, or when nothing else would happen.
    pub fn should_print(&self) -> bool {
        self.print || (!self.open && !self.copy)
    }
}

/// Format selection shared by the `eventkit` commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatArgs {
    pub format: Option<Format>,
    pub json: bool,
    pub plain: bool,
}

impl FormatArgs {
    pub fn args(with_table: bool) -> [Arg; 3] {
        let help = match with_table {
            true => "Output format (plain|json|table)",
            false => "Output format (plain|json)",
        };
        [
            arg!(--format <FORMAT>)
                .help(help)
                .value_parser(|s: &str| s.parse::<Format>().map_err(|e| e.to_string())),
            arg!(--json "Print machine-readable JSON output"),
            arg!(--plain "Print stable plain-text output"),
        ]
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            format: matches.get_one::<Format>("format").copied(),
            json: matches.get_flag("json"),
            plain: matches.get_flag("plain"),
        }
    }

    /// Pick the output format; `fallback` is the configured default.
    pub fn resolve(
        &self,
        fallback: Option<Format>,
        allow_table: bool,
    ) -> Result<Format, fantastical_core::Error> {
        use fantastical_core::Error;

        let format = match (self.format, self.json, self.plain) {
            (Some(_), true, _) | (Some(_), _, true) => {
                return Err(Error::usage("cannot combine --format with --json/--plain"));
            }
            (_, true, true) => return Err(Error::usage("--json and --plain are mutually exclusive")),
            (Some(format), _, _) => format,
            (None, true, _) => Format::Json,
            (None, _, true) => Format::Plain,
            (None, false, false) => match fallback {
                Some(Format::Table) if !allow_table => Format::Plain,
                Some(format) => format,
                None => Format::Plain,
            },
        };

        if format == Format::Table && !allow_table {
            return Err(Error::usage("status does not support table output"));
        }
        Ok(format)
    }
}
