// SPDX-FileCopyrightText: 2026 The fantastical-cli contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::io;

use chrono::Local;
use clap::{ArgAction, ArgMatches, Command, arg, value_parser};
use clap_num::number_range;
use fantastical_core::date::RangeSpec;
use fantastical_core::eventkit::{
    EventFilter, EventKitHelper, EventQuery, SortKey, sort_calendars,
};

use crate::arg::{CommonArgs, FormatArgs, get_toggle, toggle};
use crate::context::Context;
use crate::event_formatter::{EventFormatter, OutputZone};

const ACCESS_NOTE: &str = "NOTE:\n  Requires Calendar access; macOS will prompt on first use.";

fn no_input() -> clap::Arg {
    arg!(--"no-input" "Do not prompt for Calendar access")
}

fn get_no_input(matches: &ArgMatches) -> bool {
    matches.get_flag("no-input")
}

#[derive(Debug, Clone)]
pub struct CmdEventKitStatus {
    pub format: FormatArgs,
    pub verbose: bool,
}

impl CmdEventKitStatus {
    pub const NAME: &str = "status";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Show Calendar authorization status")
            .args(FormatArgs::args(false))
            .arg(CommonArgs::verbose())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            format: FormatArgs::from(matches),
            verbose: CommonArgs::get_verbose(matches),
        }
    }

    pub async fn run(self, ctx: &Context, out: &mut impl io::Write) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "querying calendar authorization...");
        let format = self.format.resolve(ctx.config.eventkit.format, false)?;

        let helper = EventKitHelper::locate(&ctx.helper, true).await?;
        let status = helper.status().await?;
        write!(out, "{}", EventFormatter::new(format).status(&status)?)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CmdEventKitCalendars {
    pub format: FormatArgs,
    pub no_input: bool,
    pub verbose: bool,
}

impl CmdEventKitCalendars {
    pub const NAME: &str = "calendars";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("List calendars")
            .after_help(ACCESS_NOTE)
            .args(FormatArgs::args(true))
            .arg(no_input())
            .arg(CommonArgs::verbose())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            format: FormatArgs::from(matches),
            no_input: get_no_input(matches),
            verbose: CommonArgs::get_verbose(matches),
        }
    }

    pub async fn run(self, ctx: &Context, out: &mut impl io::Write) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "listing calendars...");
        let format = self.format.resolve(ctx.config.eventkit.format, true)?;

        let helper = EventKitHelper::locate(&ctx.helper, self.no_input).await?;
        let mut calendars = helper.calendars().await?;
        sort_calendars(&mut calendars);
        write!(out, "{}", EventFormatter::new(format).calendars(&calendars)?)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CmdEventKitEvents {
    pub calendars: Vec<String>,
    pub calendar_ids: Vec<String>,
    pub range: RangeSpec,
    pub filter: EventFilter,
    pub tz: Option<String>,

    pub format: FormatArgs,
    pub no_input: bool,
    pub verbose: bool,
}

impl CmdEventKitEvents {
    pub const NAME: &str = "events";

    pub fn command() -> Command {
        fn days_in_range(s: &str) -> Result<u32, String> {
            number_range(s, 1, 3660)
        }

        fn sort_key(s: &str) -> Result<SortKey, String> {
            s.parse().map_err(|e: fantastical_core::Error| e.to_string())
        }

        Command::new(Self::NAME)
            .about("List events in a date range")
            .after_help(format!(
                "{ACCESS_NOTE}\n  Date shortcuts (--today/--tomorrow/--this-week/--next-week/--days) \
                 cannot be combined with --from/--to."
            ))
            .arg(
                arg!(--calendar <NAME> "Calendar title (repeatable)")
                    .action(ArgAction::Append),
            )
            .arg(
                arg!(--"calendar-id" <ID> "Calendar identifier (repeatable)")
                    .action(ArgAction::Append),
            )
            .arg(arg!(--from <FROM> "Start (YYYY-MM-DD, YYYY-MM-DDTHH:MM or YYYY-MM-DDTHH:MM:SS)"))
            .arg(arg!(--to <TO> "End (YYYY-MM-DD, YYYY-MM-DDTHH:MM or YYYY-MM-DDTHH:MM:SS)"))
            .arg(arg!(--days <DAYS> "Days from now").value_parser(days_in_range))
            .arg(arg!(--today "Use today's date range"))
            .arg(arg!(--tomorrow "Use tomorrow's date range"))
            .arg(arg!(--"this-week" "Use this week's date range"))
            .arg(arg!(--"next-week" "Use next week's date range"))
            .arg(arg!(--limit <N> "Limit number of events returned").value_parser(value_parser!(usize)))
            .arg(toggle("include-all-day", "Include all-day events (default true)"))
            .arg(toggle("include-declined", "Include declined events"))
            .arg(
                arg!(--sort <KEY> "Sort by start|end|title|calendar")
                    .value_parser(sort_key)
                    .default_value("start"),
            )
            .arg(arg!(--tz <ZONE> "Time zone for output (IANA name)"))
            .arg(arg!(--query <TEXT> "Filter by title/location/notes (case-insensitive)"))
            .args(FormatArgs::args(true))
            .arg(no_input())
            .arg(CommonArgs::verbose())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        let strings = |id: &str| -> Vec<String> {
            matches
                .get_many::<String>(id)
                .map(|values| values.cloned().collect())
                .unwrap_or_default()
        };

        Self {
            calendars: strings("calendar"),
            calendar_ids: strings("calendar-id"),
            range: RangeSpec {
                from: matches.get_one("from").cloned(),
                to: matches.get_one("to").cloned(),
                days: matches.get_one("days").copied(),
                today: matches.get_flag("today"),
                tomorrow: matches.get_flag("tomorrow"),
                this_week: matches.get_flag("this-week"),
                next_week: matches.get_flag("next-week"),
            },
            filter: EventFilter {
                query: matches.get_one("query").cloned(),
                include_all_day: get_toggle(matches, "include-all-day").unwrap_or(true),
                include_declined: get_toggle(matches, "include-declined").unwrap_or(false),
                sort: matches.get_one("sort").copied().unwrap_or_default(),
                limit: matches.get_one("limit").copied().unwrap_or(0),
            },
            tz: matches.get_one("tz").cloned(),

            format: FormatArgs::from(matches),
            no_input: get_no_input(matches),
            verbose: CommonArgs::get_verbose(matches),
        }
    }

    pub async fn run(self, ctx: &Context, out: &mut impl io::Write) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "listing events...");
        let format = self.format.resolve(ctx.config.eventkit.format, true)?;
        let zone = OutputZone::parse(self.tz.as_deref())?;
        let week_start = ctx.config.eventkit.week_start.unwrap_or_default();
        let range = self.range.resolve(&Local::now(), week_start)?;
        tracing::debug!(start = %range.start, end = %range.end, "resolved date range");

        let helper = EventKitHelper::locate(&ctx.helper, self.no_input).await?;
        let query = EventQuery {
            from: range.start,
            to: range.end,
            calendars: self.calendars,
            calendar_ids: self.calendar_ids,
        };
        let events = self.filter.apply(helper.events(&query).await?);
        tracing::debug!(count = events.len(), "events after filtering");

        let formatter = EventFormatter::new(format).with_zone(zone);
        write!(out, "{}", formatter.events(&events)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fantastical_core::Config;
    use fantastical_core::eventkit::HelperLocator;

    fn matches_for(cmd: Command, args: &[&str]) -> ArgMatches {
        let name = cmd.get_name().to_string();
        let matches = Command::new("test")
            .subcommand(cmd)
            .try_get_matches_from(["test", name.as_str()].iter().chain(args))
            .unwrap();
        matches.subcommand_matches(&name).unwrap().clone()
    }

    #[test]
    fn test_parse_events_defaults() {
        let cmd = CmdEventKitEvents::from(&matches_for(CmdEventKitEvents::command(), &[]));
        assert_eq!(cmd.range, RangeSpec::default());
        assert_eq!(cmd.filter, EventFilter::default());
        assert!(cmd.calendars.is_empty());
        assert!(!cmd.no_input);
    }

    #[test]
    fn test_parse_events_flags() {
        let args = [
            "--calendar", "Work", "--calendar", "Home", "--calendar-id", "C9", "--days", "3",
            "--limit", "5", "--include-all-day=false", "--include-declined", "--sort", "Title",
            "--tz", "Asia/Tokyo", "--query", "standup", "--json", "--no-input",
        ];
        let cmd = CmdEventKitEvents::from(&matches_for(CmdEventKitEvents::command(), &args));
        assert_eq!(cmd.calendars, ["Work", "Home"]);
        assert_eq!(cmd.calendar_ids, ["C9"]);
        assert_eq!(cmd.range.days, Some(3));
        assert_eq!(
            cmd.filter,
            EventFilter {
                query: Some("standup".to_string()),
                include_all_day: false,
                include_declined: true,
                sort: SortKey::Title,
                limit: 5,
            }
        );
        assert_eq!(cmd.tz.as_deref(), Some("Asia/Tokyo"));
        assert!(cmd.format.json);
        assert!(cmd.no_input);
    }

    #[test]
    fn test_parse_events_rejects_bad_values() {
        for args in [&["--days", "0"][..], &["--sort", "priority"][..], &["--limit", "-1"][..]] {
            let res = Command::new("test")
                .subcommand(CmdEventKitEvents::command())
                .try_get_matches_from(["test", "events"].iter().chain(args));
            assert!(res.is_err(), "{args:?}");
        }
    }

    #[test]
    fn test_status_has_no_table_format() {
        let cmd = CmdEventKitStatus::from(&matches_for(
            CmdEventKitStatus::command(),
            &["--format", "table"],
        ));
        assert!(cmd.format.resolve(None, false).unwrap_err().is_usage());
    }

    #[cfg(unix)]
    mod helper {
        use super::*;
        use std::path::{Path, PathBuf};
        use tempfile::TempDir;

        const EVENTS: &str = r#"[
{"id":"2","title":"Lunch","calendar":"Home","calendarId":"H","start":"2026-01-07T12:00:00Z","end":"2026-01-07T13:00:00Z","allDay":false},
{"id":"1","title":"Standup","calendar":"Work","calendarId":"W","start":"2026-01-07T08:00:00Z","end":"2026-01-07T08:15:00Z","allDay":false},
{"id":"3","title":"Holiday","calendar":"Home","calendarId":"H","start":"2026-01-07T00:00:00Z","end":"2026-01-08T00:00:00Z","allDay":true}
]"#;

        const CALENDARS: &str = r#"[
{"id":"W","title":"work","source":"iCloud","type":"caldav","allowsModifications":true},
{"id":"H","title":"Home","source":"On My Mac","type":"local","allowsModifications":true}
]"#;

        fn fake_helper(dir: &Path) -> PathBuf {
            use std::os::unix::fs::PermissionsExt;
            let path = dir.join("helper");
            let script = format!(
                "#!/bin/sh\ncase \"$1\" in\n  status) echo '{{\"status\":\"full_access\",\"canPrompt\":false}}' ;;\n  calendars) cat <<'EOF'\n{CALENDARS}\nEOF\n  ;;\n  events) cat <<'EOF'\n{EVENTS}\nEOF\n  ;;\nesac\n"
            );
            std::fs::write(&path, script).unwrap();
            let mut perms = std::fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms).unwrap();
            path
        }

        fn context(dir: &TempDir) -> Context {
            Context {
                helper: HelperLocator {
                    override_path: Some(fake_helper(dir.path())),
                    ..HelperLocator::from_env()
                },
                ..Context::new(Config::default())
            }
        }

        #[tokio::test]
        async fn test_status_plain_and_json() {
            let dir = TempDir::new().unwrap();
            let ctx = context(&dir);

            let mut out = Vec::new();
            let cmd = CmdEventKitStatus::from(&matches_for(CmdEventKitStatus::command(), &[]));
            cmd.run(&ctx, &mut out).await.unwrap();
            assert_eq!(String::from_utf8(out).unwrap(), "full_access\n");

            let mut out = Vec::new();
            let cmd =
                CmdEventKitStatus::from(&matches_for(CmdEventKitStatus::command(), &["--json"]));
            cmd.run(&ctx, &mut out).await.unwrap();
            assert_eq!(
                String::from_utf8(out).unwrap(),
                "{\"status\":\"full_access\",\"canPrompt\":false}\n"
            );
        }

        #[tokio::test]
        async fn test_calendars_sorted() {
            let dir = TempDir::new().unwrap();
            let mut out = Vec::new();
            let cmd = CmdEventKitCalendars::from(&matches_for(CmdEventKitCalendars::command(), &[]));
            cmd.run(&context(&dir), &mut out).await.unwrap();
            assert_eq!(
                String::from_utf8(out).unwrap(),
                "Home\t(On My Mac)\nwork\t(iCloud)\n"
            );
        }

        #[tokio::test]
        async fn test_events_filtered_sorted_in_zone() {
            let dir = TempDir::new().unwrap();
            let mut out = Vec::new();
            let args = ["--include-all-day=false", "--tz", "UTC", "--limit", "5"];
            let cmd = CmdEventKitEvents::from(&matches_for(CmdEventKitEvents::command(), &args));
            cmd.run(&context(&dir), &mut out).await.unwrap();
            assert_eq!(
                String::from_utf8(out).unwrap(),
                "2026-01-07 08:00\t2026-01-07 08:15\tWork\tStandup\n\
                 2026-01-07 12:00\t2026-01-07 13:00\tHome\tLunch\n"
            );
        }

        #[tokio::test]
        async fn test_events_range_errors_before_helper() {
            let dir = TempDir::new().unwrap();
            let cmd = CmdEventKitEvents::from(&matches_for(
                CmdEventKitEvents::command(),
                &["--today", "--tomorrow"],
            ));
            let err = cmd.run(&context(&dir), &mut Vec::new()).await.unwrap_err();
            let err = err.downcast_ref::<fantastical_core::Error>().unwrap();
            assert!(err.is_usage());
        }
    }
}
