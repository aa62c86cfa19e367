// SPDX-FileCopyrightText: 2026 The fantastical-cli contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::io;

use chrono::{Local, NaiveDate};
use clap::{ArgMatches, Command, arg};
use fantastical_core::url::ShowTarget;

use crate::arg::{CommonArgs, UrlOutputArgs};
use crate::context::Context;
use crate::url_output::deliver_url;

#[derive(Debug, Clone)]
pub struct CmdShow {
    pub target: Vec<String>,

    pub output: UrlOutputArgs,
    pub verbose: bool,
}

impl CmdShow {
    pub const NAME: &str = "show";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Build (and optionally open) an x-fantastical3://show URL")
            .after_help(
                "\
EXAMPLES:
  fantastical show mini today
  fantastical show calendar 2026-01-03
  fantastical show month tomorrow
  fantastical show set \"My Calendar Set\"",
            )
            .arg(
                arg!(target: [TARGET] "View (mini, calendar, day, week, month, year, set) followed by a date or set name")
                    .num_args(1..),
            )
            .args(UrlOutputArgs::args())
            .arg(CommonArgs::verbose())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            target: matches
                .get_many::<String>("target")
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),

            output: UrlOutputArgs::from(matches),
            verbose: CommonArgs::get_verbose(matches),
        }
    }

    pub async fn run(self, ctx: &Context, out: &mut impl io::Write) -> Result<(), Box<dyn Error>> {
        self.run_on(Local::now().date_naive(), ctx, out).await
    }

    async fn run_on(
        self,
        today: NaiveDate,
        ctx: &Context,
        out: &mut impl io::Write,
    ) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "building show URL...");
        let output = self.output.resolve(&ctx.config.output)?;
        let url = ShowTarget::from_args(&self.target, today)?.url();
        deliver_url(Self::NAME, &url, output, &ctx.dispatcher(output.dry_run), out).await
    }
}
