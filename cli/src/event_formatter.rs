// SPDX-FileCopyrightText: 2026 The fantastical-cli contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::borrow::Cow;
use std::fmt::{self, Write};

use chrono::{DateTime, FixedOffset, Local, SecondsFormat, Utc};
use chrono_tz::Tz;
use fantastical_core::eventkit::{AuthStatus, CalendarInfo, EventInfo, Format};
use serde::Serialize;

use crate::table::{Column, Table};

/// The zone event times are shown in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputZone {
    #[default]
    Local,
    Named(Tz),
}

impl OutputZone {
    /// Parse an IANA zone name; blank means the system zone.
    pub fn parse(name: Option<&str>) -> Result<Self, fantastical_core::Error> {
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            None => Ok(Self::Local),
            Some(name) => name
                .parse::<Tz>()
                .map(Self::Named)
                .map_err(|_| fantastical_core::Error::usage(format!("invalid --tz value: {name}"))),
        }
    }

    pub fn convert(&self, dt: &DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            Self::Local => dt.with_timezone(&Local).fixed_offset(),
            Self::Named(tz) => dt.with_timezone(tz).fixed_offset(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EventFormatter {
    format: Format,
    zone: OutputZone,
}

impl EventFormatter {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            zone: OutputZone::default(),
        }
    }

    pub fn with_zone(mut self, zone: OutputZone) -> Self {
        self.zone = zone;
        self
    }

    pub fn events(&self, events: &[EventInfo]) -> Result<String, serde_json::Error> {
        match self.format {
            Format::Json => {
                let items: Vec<_> = events.iter().map(|e| JsonEvent::new(e, self.zone)).collect();
                serde_json::to_string(&items).map(|s| s + "\n")
            }
            Format::Table => {
                let columns = [
                    EventColumn::Start(self.zone),
                    EventColumn::End(self.zone),
                    EventColumn::Calendar,
                    EventColumn::Title,
                ];
                Ok(Table::new(&columns, events).to_string())
            }
            Format::Plain => Ok(events.iter().fold(String::new(), |mut out, e| {
                let _ = writeln!(
                    out,
                    "{}\t{}\t{}\t{}",
                    short_time(self.zone, &e.start),
                    short_time(self.zone, &e.end),
                    e.calendar,
                    e.title
                );
                out
            })),
        }
    }

    pub fn calendars(&self, calendars: &[CalendarInfo]) -> Result<String, serde_json::Error> {
        match self.format {
            Format::Json => serde_json::to_string(calendars).map(|s| s + "\n"),
            Format::Table => {
                let columns = [
                    CalendarColumn::Title,
                    CalendarColumn::Source,
                    CalendarColumn::Kind,
                    CalendarColumn::Id,
                ];
                Ok(Table::new(&columns, calendars).to_string())
            }
            Format::Plain => Ok(calendars.iter().fold(String::new(), |mut out, c| {
                let _ = writeln!(out, "{}\t({})", c.title, c.source);
                out
            })),
        }
    }

    pub fn status(&self, status: &AuthStatus) -> Result<String, serde_json::Error> {
        match self.format {
            Format::Json => serde_json::to_string(status).map(|s| s + "\n"),
            Format::Plain | Format::Table => Ok(format!("{}\n", status.status)),
        }
    }
}

fn short_time(zone: OutputZone, dt: &DateTime<Utc>) -> impl fmt::Display {
    zone.convert(dt).format("%Y-%m-%d %H:%M")
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonEvent<'a> {
    id: &'a str,
    title: &'a str,
    calendar: &'a str,
    calendar_id: &'a str,
    start: String,
    end: String,
    all_day: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<&'a str>,
}

impl<'a> JsonEvent<'a> {
    fn new(event: &'a EventInfo, zone: OutputZone) -> Self {
        let rfc3339 = |dt: &DateTime<Utc>| zone.convert(dt).to_rfc3339_opts(SecondsFormat::Secs, true);
        Self {
            id: &event.id,
            title: &event.title,
            calendar: &event.calendar,
            calendar_id: &event.calendar_id,
            start: rfc3339(&event.start),
            end: rfc3339(&event.end),
            all_day: event.all_day,
            location: event.location.as_deref(),
            notes: event.notes.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum EventColumn {
    Start(OutputZone),
    End(OutputZone),
    Calendar,
    Title,
}

impl Column<EventInfo> for EventColumn {
    fn name(&self) -> &'static str {
        match self {
            Self::Start(_) => "Start",
            Self::End(_) => "End",
            Self::Calendar => "Calendar",
            Self::Title => "Title",
        }
    }

    fn format<'a>(&self, event: &'a EventInfo) -> Cow<'a, str> {
        match self {
            Self::Start(zone) => short_time(*zone, &event.start).to_string().into(),
            Self::End(zone) => short_time(*zone, &event.end).to_string().into(),
            Self::Calendar => event.calendar.as_str().into(),
            Self::Title => event.title.as_str().into(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum CalendarColumn {
    Title,
    Source,
    Kind,
    Id,
}

impl Column<CalendarInfo> for CalendarColumn {
    fn name(&self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Source => "Source",
            Self::Kind => "Type",
            Self::Id => "ID",
        }
    }

    fn format<'a>(&self, calendar: &'a CalendarInfo) -> Cow<'a, str> {
        match self {
            Self::Title => calendar.title.as_str(),
            Self::Source => calendar.source.as_str(),
            Self::Kind => calendar.kind.as_str(),
            Self::Id => calendar.id.as_str(),
        }
        .into()
    }
}
