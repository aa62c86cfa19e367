// SPDX-FileCopyrightText: 2026 The fantastical-cli contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::io;

use clap::{ArgMatches, Command, crate_version};
use fantastical_core::APP_NAME;

#[derive(Debug, Clone, Copy)]
pub struct CmdVersion;

impl CmdVersion {
    pub const NAME: &str = "version";

    pub fn command() -> Command {
        Command::new(Self::NAME).about("Print version information")
    }

    pub fn from(_matches: &ArgMatches) -> Self {
        Self
    }

    pub fn run(self, out: &mut impl io::Write) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "printing version...");
        writeln!(out, "{}", version_line())?;
        Ok(())
    }
}

/// `fantastical <version>` followed by the build commit and its date when
/// known.
pub fn version_line() -> String {
    let build = [option_env!("FANTASTICAL_COMMIT"), option_env!("FANTASTICAL_COMMIT_DATE")];
    let build: Vec<_> = build.into_iter().flatten().collect();
    match build.is_empty() {
        true => format!("{APP_NAME} {}", crate_version!()),
        false => format!("{APP_NAME} {} ({})", crate_version!(), build.join(" ")),
    }
}
