// SPDX-FileCopyrightText: 2026 The fantastical-cli contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Read-only access to the macOS calendar store through a small compiled
//! helper.

mod filter;
mod helper;
mod model;

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

pub use crate::eventkit::filter::{EventFilter, SortKey, sort_calendars};
pub use crate::eventkit::helper::{
    EventKitHelper, EventQuery, HELPER_ENV, HELPER_SOURCE, HelperLocator, source_hash,
};
pub use crate::eventkit::model::{AuthStatus, CalendarInfo, EventInfo};

/// Output format of the `eventkit` commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Plain,
    Json,
    Table,
}

impl Format {
    pub const ALL: [Format; 3] = [Self::Plain, Self::Json, Self::Table];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Json => "json",
            Self::Table => "table",
        }
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::usage(format!("invalid --format value: {s}")))
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
