// SPDX-FileCopyrightText: 2026 The fantastical-cli contributors
//
// SPDX-License-Identifier: Apache-2.0

mod arg;
mod cli;
mod cmd_applescript;
mod cmd_completion;
mod cmd_eventkit;
mod cmd_parse;
mod cmd_show;
mod cmd_version;
mod context;
mod event_formatter;
mod table;
mod url_output;

pub use crate::cli::{Cli, Commands, LOG_ENV, exit_code, run};
