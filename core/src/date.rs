// SPDX-FileCopyrightText: 2026 The fantastical-cli contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::{fmt, str::FromStr};

use chrono::{
    DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone,
    offset::LocalResult,
};

use crate::error::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parse a `show` date: `today`, `tomorrow`, `yesterday` or `YYYY-MM-DD`.
pub fn parse_date_arg(s: &str, today: NaiveDate) -> Result<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return Err(Error::usage("empty date"));
    }

    match s.to_lowercase().as_str() {
        "today" => Ok(today),
        "tomorrow" => add_days(today, 1),
        "yesterday" => add_days(today, -1),
        _ => NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| {
            Error::usage(format!(
                "invalid date {s:?}; want yyyy-mm-dd (e.g. 2026-01-03) or today/tomorrow/yesterday"
            ))
        }),
    }
}

/// A `--from`/`--to` value, with or without a time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

/// Parse `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM` or `YYYY-MM-DDTHH:MM:SS`.
pub fn parse_date_time(s: &str) -> Result<DateInput> {
    let s = s.trim();
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(DateInput::DateTime(dt));
        }
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map(DateInput::Date)
        .map_err(|_| {
            Error::usage(format!(
                "invalid date {s:?}; want YYYY-MM-DD, YYYY-MM-DDTHH:MM or YYYY-MM-DDTHH:MM:SS"
            ))
        })
}

/// First day of the week used by `--this-week` and `--next-week`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl FromStr for WeekStart {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "monday" | "mon" => Ok(Self::Monday),
            "sunday" | "sun" => Ok(Self::Sunday),
            other => Err(Error::usage(format!(
                "invalid week start {other:?} (want: monday, sunday)"
            ))),
        }
    }
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monday => f.write_str("monday"),
            Self::Sunday => f.write_str("sunday"),
        }
    }
}

/// A closed interval of instants, both ends inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange<Tz: TimeZone> {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

/// The date-selection flags of `eventkit events`, before resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeSpec {
    pub from: Option<String>,
    pub to: Option<String>,
    pub days: Option<u32>,
    pub today: bool,
    pub tomorrow: bool,
    pub this_week: bool,
    pub next_week: bool,
}

impl RangeSpec {
    /// Resolve the flags into a concrete range relative to `now`.
    pub fn resolve<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
        week_start: WeekStart,
    ) -> Result<DateRange<Tz>> {
        let tz = now.timezone();
        let today = now.date_naive();

        let presets = [self.today, self.tomorrow, self.this_week, self.next_week];
        let preset_count = presets.iter().filter(|&&p| p).count();
        let explicit = self.from.is_some() || self.to.is_some();
        if preset_count > 1 {
            return Err(Error::usage(
                "only one of --today/--tomorrow/--this-week/--next-week can be used",
            ));
        }
        if preset_count > 0 && (explicit || self.days.is_some()) {
            return Err(Error::usage(
                "--from/--to/--days cannot be combined with date shortcuts",
            ));
        }
        if self.days.is_some() && explicit {
            return Err(Error::usage("--days cannot be combined with --from/--to"));
        }

        if let Some(days) = self.days {
            if days == 0 {
                return Err(Error::usage("--days must be greater than 0"));
            }
            let end = now
                .clone()
                .checked_add_days(Days::new(days.into()))
                .ok_or_else(|| Error::usage(format!("--days {days} is out of range")))?;
            return Ok(DateRange {
                start: now.clone(),
                end,
            });
        }

        if self.today {
            return whole_day(&tz, today);
        }
        if self.tomorrow {
            return whole_day(&tz, add_days(today, 1)?);
        }
        if self.this_week {
            return whole_week(&tz, today, week_start);
        }
        if self.next_week {
            return whole_week(&tz, add_days(today, 7)?, week_start);
        }

        let from = self.from.as_deref().map(parse_date_time).transpose()?;
        let to = self.to.as_deref().map(parse_date_time).transpose()?;

        let (start, end) = match (from, to) {
            (None, None) => (start_of_day(&tz, today)?, end_of_day(&tz, today)?),
            (Some(from), Some(to)) => (range_start(&tz, from)?, range_end(&tz, to)?),
            (Some(DateInput::Date(date)), None) => {
                (start_of_day(&tz, date)?, end_of_day(&tz, date)?)
            }
            (Some(DateInput::DateTime(dt)), None) => {
                let start = localize(&tz, dt)?;
                let end = shift_days(&start, 1)?;
                (start, end)
            }
            (None, Some(DateInput::Date(date))) => {
                (start_of_day(&tz, date)?, end_of_day(&tz, date)?)
            }
            (None, Some(DateInput::DateTime(dt))) => {
                let end = localize(&tz, dt)?;
                let start = shift_days(&end, -1)?;
                (start, end)
            }
        };

        if end < start {
            return Err(Error::usage("--to must be after --from"));
        }
        Ok(DateRange { start, end })
    }
}

fn range_start<Tz: TimeZone>(tz: &Tz, input: DateInput) -> Result<DateTime<Tz>> {
    match input {
        DateInput::Date(date) => start_of_day(tz, date),
        DateInput::DateTime(dt) => localize(tz, dt),
    }
}

fn range_end<Tz: TimeZone>(tz: &Tz, input: DateInput) -> Result<DateTime<Tz>> {
    match input {
        DateInput::Date(date) => end_of_day(tz, date),
        DateInput::DateTime(dt) => localize(tz, dt),
    }
}

fn whole_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Result<DateRange<Tz>> {
    Ok(DateRange {
        start: start_of_day(tz, date)?,
        end: end_of_day(tz, date)?,
    })
}

fn whole_week<Tz: TimeZone>(
    tz: &Tz,
    date: NaiveDate,
    week_start: WeekStart,
) -> Result<DateRange<Tz>> {
    let offset = match week_start {
        WeekStart::Monday => date.weekday().num_days_from_monday(),
        WeekStart::Sunday => date.weekday().num_days_from_sunday(),
    };
    let first = add_days(date, -i64::from(offset))?;
    Ok(DateRange {
        start: start_of_day(tz, first)?,
        end: end_of_day(tz, add_days(first, 6)?)?,
    })
}

fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Result<DateTime<Tz>> {
    localize(tz, date.and_time(NaiveTime::MIN))
}

/// One second before the following midnight.
fn end_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Result<DateTime<Tz>> {
    let next = start_of_day(tz, add_days(date, 1)?)?;
    next.checked_sub_signed(TimeDelta::seconds(1))
        .ok_or_else(out_of_range)
}

fn add_days(date: NaiveDate, days: i64) -> Result<NaiveDate> {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.ok_or_else(out_of_range)
}

fn out_of_range() -> Error {
    Error::usage("date is out of range")
}

fn shift_days<Tz: TimeZone>(dt: &DateTime<Tz>, days: i64) -> Result<DateTime<Tz>> {
    let shifted = if days >= 0 {
        dt.clone().checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        dt.clone().checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.ok_or_else(out_of_range)
}

fn localize<Tz: TimeZone>(tz: &Tz, dt: NaiveDateTime) -> Result<DateTime<Tz>> {
    match tz.from_local_datetime(&dt) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, _) => {
            tracing::warn!(%dt, "ambiguous local time, picking earliest");
            Ok(earliest)
        }
        LocalResult::None => Err(Error::usage(format!(
            "{} does not exist in the local time zone",
            dt.format("%Y-%m-%d %H:%M")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Offset, Timelike};
    use chrono_tz::Europe::Berlin;

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(3600).unwrap()
    }

    /// Wednesday 2026-01-07 15:30 +01:00
    fn now() -> DateTime<FixedOffset> {
        tz().with_ymd_and_hms(2026, 1, 7, 15, 30, 0).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<FixedOffset> {
        tz().with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_arg_absolute() {
        let today = date(2026, 1, 7);
        assert_eq!(parse_date_arg("2026-01-03", today).unwrap(), date(2026, 1, 3));
        assert_eq!(parse_date_arg(" 2026-01-03 ", today).unwrap(), date(2026, 1, 3));
    }

    #[test]
    fn test_parse_date_arg_relative() {
        let today = date(2026, 1, 1);
        assert_eq!(parse_date_arg("today", today).unwrap(), today);
        assert_eq!(parse_date_arg("Tomorrow", today).unwrap(), date(2026, 1, 2));
        assert_eq!(parse_date_arg("YESTERDAY", today).unwrap(), date(2025, 12, 31));
    }

    #[test]
    fn test_parse_date_arg_invalid() {
        let today = date(2026, 1, 1);
        assert!(parse_date_arg("not-a-date", today).unwrap_err().is_usage());
        assert!(parse_date_arg("", today).unwrap_err().is_usage());
        assert!(parse_date_arg("2026-13-01", today).unwrap_err().is_usage());
    }

    #[test]
    fn test_parse_date_time_variants() {
        assert_eq!(
            parse_date_time("2026-01-03").unwrap(),
            DateInput::Date(date(2026, 1, 3))
        );
        match parse_date_time("2026-01-03T09:15").unwrap() {
            DateInput::DateTime(dt) => assert_eq!((dt.hour(), dt.minute()), (9, 15)),
            other => panic!("Expected DateTime, got {other:?}"),
        }
        match parse_date_time("2026-01-03T09:15:42").unwrap() {
            DateInput::DateTime(dt) => assert_eq!(dt.second(), 42),
            other => panic!("Expected DateTime, got {other:?}"),
        }
        assert!(parse_date_time("2026-01-03 09:15").is_err());
    }

    #[test]
    fn test_default_range_is_today() {
        let range = RangeSpec::default()
            .resolve(&now(), WeekStart::Monday)
            .unwrap();
        assert_eq!(range.start, at(2026, 1, 7, 0, 0, 0));
        assert_eq!(range.end, at(2026, 1, 7, 23, 59, 59));
    }

    #[test]
    fn test_tomorrow_range() {
        let spec = RangeSpec {
            tomorrow: true,
            ..Default::default()
        };
        let range = spec.resolve(&now(), WeekStart::Monday).unwrap();
        assert_eq!(range.start, at(2026, 1, 8, 0, 0, 0));
        assert_eq!(range.end, at(2026, 1, 8, 23, 59, 59));
    }

    #[test]
    fn test_this_week_monday_start() {
        let spec = RangeSpec {
            this_week: true,
            ..Default::default()
        };
        let range = spec.resolve(&now(), WeekStart::Monday).unwrap();
        assert_eq!(range.start, at(2026, 1, 5, 0, 0, 0));
        assert_eq!(range.end, at(2026, 1, 11, 23, 59, 59));
    }

    #[test]
    fn test_next_week_sunday_start() {
        let spec = RangeSpec {
            next_week: true,
            ..Default::default()
        };
        let range = spec.resolve(&now(), WeekStart::Sunday).unwrap();
        assert_eq!(range.start, at(2026, 1, 11, 0, 0, 0));
        assert_eq!(range.end, at(2026, 1, 17, 23, 59, 59));
    }

    #[test]
    fn test_days_range_starts_now() {
        let spec = RangeSpec {
            days: Some(3),
            ..Default::default()
        };
        let range = spec.resolve(&now(), WeekStart::Monday).unwrap();
        assert_eq!(range.start, now());
        assert_eq!(range.end, at(2026, 1, 10, 15, 30, 0));
    }

    #[test]
    fn test_from_date_only_covers_that_day() {
        let spec = RangeSpec {
            from: Some("2026-01-03".to_string()),
            ..Default::default()
        };
        let range = spec.resolve(&now(), WeekStart::Monday).unwrap();
        assert_eq!(range.start, at(2026, 1, 3, 0, 0, 0));
        assert_eq!(range.end, at(2026, 1, 3, 23, 59, 59));
    }

    #[test]
    fn test_from_with_time_spans_a_day() {
        let spec = RangeSpec {
            from: Some("2026-01-03T10:00".to_string()),
            ..Default::default()
        };
        let range = spec.resolve(&now(), WeekStart::Monday).unwrap();
        assert_eq!(range.start, at(2026, 1, 3, 10, 0, 0));
        assert_eq!(range.end, at(2026, 1, 4, 10, 0, 0));
    }

    #[test]
    fn test_to_with_time_spans_previous_day() {
        let spec = RangeSpec {
            to: Some("2026-01-03T10:00".to_string()),
            ..Default::default()
        };
        let range = spec.resolve(&now(), WeekStart::Monday).unwrap();
        assert_eq!(range.start, at(2026, 1, 2, 10, 0, 0));
        assert_eq!(range.end, at(2026, 1, 3, 10, 0, 0));
    }

    #[test]
    fn test_to_date_only_covers_that_day() {
        let spec = RangeSpec {
            to: Some("2026-01-03".to_string()),
            ..Default::default()
        };
        let range = spec.resolve(&now(), WeekStart::Monday).unwrap();
        assert_eq!(range.start, at(2026, 1, 3, 0, 0, 0));
        assert_eq!(range.end, at(2026, 1, 3, 23, 59, 59));
    }

    #[test]
    fn test_dst_gap_is_usage_error() {
        let now = Berlin.with_ymd_and_hms(2026, 3, 29, 12, 0, 0).unwrap();
        let spec = RangeSpec {
            from: Some("2026-03-29T02:30".to_string()),
            ..Default::default()
        };
        let err = spec.resolve(&now, WeekStart::Monday).unwrap_err();
        assert!(err.is_usage(), "{err}");
    }

    #[test]
    fn test_dst_overlap_picks_earliest() {
        let now = Berlin.with_ymd_and_hms(2026, 10, 25, 12, 0, 0).unwrap();
        let spec = RangeSpec {
            from: Some("2026-10-25T02:30".to_string()),
            ..Default::default()
        };
        let range = spec.resolve(&now, WeekStart::Monday).unwrap();
        let summer = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(range.start, summer.with_ymd_and_hms(2026, 10, 25, 2, 30, 0).unwrap());
        assert_eq!(range.start.offset().fix(), summer);
    }

    #[test]
    fn test_out_of_range_dates_are_usage_errors() {
        let spec = RangeSpec {
            to: Some("+262142-12-31".to_string()),
            ..Default::default()
        };
        let err = spec.resolve(&now(), WeekStart::Monday).unwrap_err();
        assert!(err.is_usage(), "{err}");

        assert!(parse_date_arg("tomorrow", NaiveDate::MAX).unwrap_err().is_usage());
        assert!(parse_date_arg("yesterday", NaiveDate::MIN).unwrap_err().is_usage());
    }

    #[test]
    fn test_from_and_to_dates() {
        let spec = RangeSpec {
            from: Some("2026-01-03".to_string()),
            to: Some("2026-01-05".to_string()),
            ..Default::default()
        };
        let range = spec.resolve(&now(), WeekStart::Monday).unwrap();
        assert_eq!(range.start, at(2026, 1, 3, 0, 0, 0));
        assert_eq!(range.end, at(2026, 1, 5, 23, 59, 59));
    }

    #[test]
    fn test_range_conflicts_are_usage_errors() {
        let cases = [
            RangeSpec {
                today: true,
                tomorrow: true,
                ..Default::default()
            },
            RangeSpec {
                today: true,
                from: Some("2026-01-03".to_string()),
                ..Default::default()
            },
            RangeSpec {
                days: Some(2),
                to: Some("2026-01-03".to_string()),
                ..Default::default()
            },
            RangeSpec {
                days: Some(0),
                ..Default::default()
            },
            RangeSpec {
                from: Some("2026-01-05".to_string()),
                to: Some("2026-01-03".to_string()),
                ..Default::default()
            },
            RangeSpec {
                from: Some("next tuesday".to_string()),
                ..Default::default()
            },
        ];
        for spec in cases {
            let err = spec.resolve(&now(), WeekStart::Monday).unwrap_err();
            assert!(err.is_usage(), "{spec:?} gave {err}");
        }
    }

    #[test]
    fn test_week_start_from_str() {
        assert_eq!("Sunday".parse::<WeekStart>().unwrap(), WeekStart::Sunday);
        assert_eq!("mon".parse::<WeekStart>().unwrap(), WeekStart::Monday);
        assert!("friday".parse::<WeekStart>().is_err());
    }
}
