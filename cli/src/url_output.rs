// SPDX-FileCopyrightText: 2026 The fantastical-cli contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::io;

use fantastical_core::Dispatcher;
use serde::Serialize;

use crate::arg::UrlOutput;

#[derive(Debug, Serialize)]
struct UrlReport<'a> {
    command: &'a str,
    url: &'a str,
    opened: bool,
    copied: bool,
    dry_run: bool,
}

/// Print, copy and open `url` as `output` asks, in that order.
pub async fn deliver_url(
    command: &str,
    url: &str,
    output: UrlOutput,
    dispatcher: &Dispatcher,
    out: &mut impl io::Write,
) -> Result<(), Box<dyn Error>> {
    if !output.json && output.should_print() {
        writeln!(out, "{url}")?;
    }
    if output.copy {
        dispatcher.copy(url).await?;
    }
    if output.open {
        dispatcher.open_url(url).await?;
    }

    if output.json {
        let report = UrlReport {
            command,
            url,
            opened: output.open,
            copied: output.copy,
            dry_run: output.dry_run,
        };
        serde_json::to_writer(&mut *out, &report)?;
        writeln!(out)?;
    }
    Ok(())
}
