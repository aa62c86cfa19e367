// SPDX-FileCopyrightText: 2026 The fantastical-cli contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::io;

use clap::{ArgMatches, Command, arg};
use fantastical_core::url::{ParseUrl, parse_param};

use crate::arg::{CommonArgs, UrlOutputArgs, get_toggle, toggle};
use crate::context::Context;
use crate::url_output::deliver_url;

#[derive(Debug, Clone)]
pub struct CmdParse {
    pub words: Vec<String>,
    pub note: Option<String>,
    pub calendar: Option<String>,
    pub add: Option<bool>,
    pub params: Vec<String>,

    pub stdin: bool,
    pub output: UrlOutputArgs,
    pub verbose: bool,
}

impl CmdParse {
    pub const NAME: &str = "parse";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Build (and optionally open) an x-fantastical3://parse URL")
            .after_help(
                "EXAMPLE:\n  fantastical parse \"Wake up at 8am\" --add --calendar Work --note \"Alarm\"",
            )
            .arg(CommonArgs::sentence())
            .arg(arg!(-n --note <NOTE> "Note attached to the event (n=...)"))
            .arg(
                arg!(--calendar <CALENDAR> "Calendar to add to (calendarName=...)")
                    .alias("calendarName"),
            )
            .arg(toggle("add", "Add immediately without interaction (add=1)"))
            .arg(
                arg!(--param <PARAM> "Extra query parameter as KEY=VALUE (repeatable)")
                    .action(clap::ArgAction::Append),
            )
            .arg(CommonArgs::stdin())
            .args(UrlOutputArgs::args())
            .arg(CommonArgs::verbose())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            words: CommonArgs::get_sentence(matches),
            note: matches.get_one("note").cloned(),
            calendar: matches.get_one("calendar").cloned(),
            add: get_toggle(matches, "add"),
            params: matches
                .get_many::<String>("param")
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),

            stdin: CommonArgs::get_stdin(matches),
            output: UrlOutputArgs::from(matches),
            verbose: CommonArgs::get_verbose(matches),
        }
    }

    pub async fn run(self, ctx: &Context, out: &mut impl io::Write) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "building parse URL...");
        let output = self.output.resolve(&ctx.config.output)?;
        let defaults = &ctx.config.parse;

        let mut request = ParseUrl::new(ctx.sentence(&self.words, self.stdin).await?);
        request.note = self.note.or_else(|| defaults.note.clone());
        request.calendar = self.calendar.or_else(|| defaults.calendar.clone());
        request.add = self.add.or(defaults.add).unwrap_or(false);
        request.extra = self
            .params
            .iter()
            .map(|raw| parse_param(raw))
            .collect::<Result<_, _>>()?;

        let url = request.build()?;
        deliver_url(Self::NAME, &url, output, &ctx.dispatcher(output.dry_run), out).await
    }
}
