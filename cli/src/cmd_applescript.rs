// SPDX-FileCopyrightText: 2026 The fantastical-cli contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::io;

use clap::{ArgMatches, Command};
use fantastical_core::applescript::{osascript_args, script};
use fantastical_core::platform_default_open;

use crate::arg::{CommonArgs, get_toggle, toggle};
use crate::context::Context;

#[derive(Debug, Clone)]
pub struct CmdAppleScript {
    pub words: Vec<String>,
    pub add: Option<bool>,
    pub run: Option<bool>,
    pub print: Option<bool>,

    pub stdin: bool,
    pub dry_run: Option<bool>,
    pub verbose: bool,
}

impl CmdAppleScript {
    pub const NAME: &str = "applescript";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("as")
            .about("Send \"parse sentence\" to Fantastical via osascript (macOS)")
            .after_help("EXAMPLE:\n  fantastical applescript --add \"Wake up at 8am\"")
            .arg(CommonArgs::sentence())
            .arg(toggle("add", "Use 'with add immediately'"))
            .arg(toggle("run", "Run osascript (default on macOS)"))
            .arg(toggle("print", "Print the AppleScript instead of (or in addition to) running it"))
            .arg(CommonArgs::stdin())
            .arg(CommonArgs::dry_run())
            .arg(CommonArgs::verbose())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            words: CommonArgs::get_sentence(matches),
            add: get_toggle(matches, "add"),
            run: get_toggle(matches, "run"),
            print: get_toggle(matches, "print"),

            stdin: CommonArgs::get_stdin(matches),
            dry_run: CommonArgs::get_dry_run(matches),
            verbose: CommonArgs::get_verbose(matches),
        }
    }

    pub async fn run(self, ctx: &Context, out: &mut impl io::Write) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "sending sentence via AppleScript...");
        let config = &ctx.config.applescript;
        let add = self.add.or(config.add).unwrap_or(false);
        let run = self.run.or(config.run).unwrap_or(platform_default_open());
        let print = self.print.or(config.print).unwrap_or(false);
        let dry_run = self.dry_run.or(ctx.config.output.dry_run).unwrap_or(false);

        let sentence = ctx.sentence(&self.words, self.stdin).await?;
        if sentence.is_empty() {
            return Err(fantastical_core::Error::usage("missing <sentence...>").into());
        }

        if print || !run {
            writeln!(out, "{}", script())?;
        }
        if !run {
            return Ok(());
        }

        ctx.dispatcher(dry_run)
            .run_osascript(&osascript_args(&sentence, add))
            .await?;
        Ok(())
    }
}
