// SPDX-FileCopyrightText: 2026 The fantastical-cli contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::eventkit::{CalendarInfo, EventInfo};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Start,
    End,
    Title,
    Calendar,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [Self::Start, Self::End, Self::Title, Self::Calendar];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
            Self::Title => "title",
            Self::Calendar => "calendar",
        }
    }

    fn compare(&self, a: &EventInfo, b: &EventInfo) -> Ordering {
        match self {
            Self::Start => a.start.cmp(&b.start),
            Self::End => a.end.cmp(&b.end),
            Self::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            Self::Calendar => a
                .calendar
                .to_lowercase()
                .cmp(&b.calendar.to_lowercase())
                .then_with(|| a.start.cmp(&b.start)),
        }
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::usage(format!(
                    "invalid --sort value {s:?} (want start, end, title or calendar)"
                ))
            })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Post-processing applied to events returned by the helper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFilter {
    /// Case-insensitive substring matched against title, location and notes.
    pub query: Option<String>,
    pub include_all_day: bool,
    pub include_declined: bool,
    pub sort: SortKey,
    /// Keep at most this many events; zero means no limit.
    pub limit: usize,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            query: None,
            include_all_day: true,
            include_declined: false,
            sort: SortKey::default(),
            limit: 0,
        }
    }
}

impl EventFilter {
    pub fn apply(&self, mut events: Vec<EventInfo>) -> Vec<EventInfo> {
        let query = self
            .query
            .as_deref()
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());

        events.retain(|event| {
            if !self.include_all_day && event.all_day {
                return false;
            }
            if !self.include_declined && event.declined {
                return false;
            }
            match &query {
                Some(q) => matches_query(event, q),
                None => true,
            }
        });

        events.sort_by(|a, b| self.sort.compare(a, b));
        if self.limit > 0 {
            events.truncate(self.limit);
        }
        events
    }
}

fn matches_query(event: &EventInfo, query: &str) -> bool {
    [
        Some(event.title.as_str()),
        event.location.as_deref(),
        event.notes.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(query))
}

/// Order calendars by title, ignoring case.
pub fn sort_calendars(calendars: &mut [CalendarInfo]) {
    calendars.sort_by_cached_key(|c| c.title.to_lowercase());
}
