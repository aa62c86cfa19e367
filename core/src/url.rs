// SPDX-FileCopyrightText: 2026 The fantastical-cli contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Builders for `x-fantastical3://` URLs.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use url::form_urlencoded;

use crate::date::parse_date_arg;
use crate::error::{Error, Result};

/// The URL scheme registered by Fantastical 3 and later.
pub const SCHEME: &str = "x-fantastical3://";

/// Encode query pairs with keys in ascending order.
///
/// Spaces become `%20` rather than `+`, which some URL handlers refuse.
pub fn encode_query<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let sorted: BTreeMap<&str, &str> = pairs.into_iter().collect();
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(sorted)
        .finish()
        .replace('+', "%20")
}

/// A `parse` request: Fantastical interprets a natural-language sentence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseUrl {
    pub sentence: String,
    pub note: Option<String>,
    pub calendar: Option<String>,
    pub add: bool,
    /// Additional raw query parameters, applied after the known ones.
    pub extra: Vec<(String, String)>,
}

impl ParseUrl {
    pub fn new(sentence: impl Into<String>) -> Self {
        Self {
            sentence: sentence.into(),
            ..Default::default()
        }
    }

    pub fn build(&self) -> Result<String> {
        let sentence = self.sentence.trim();
        if sentence.is_empty() {
            return Err(Error::usage("missing <sentence...>"));
        }

        let mut query: BTreeMap<&str, &str> = BTreeMap::new();
        query.insert("s", sentence);
        if let Some(note) = non_blank(self.note.as_deref()) {
            query.insert("n", note);
        }
        if let Some(calendar) = non_blank(self.calendar.as_deref()) {
            query.insert("calendarName", calendar);
        }
        if self.add {
            query.insert("add", "1");
        }
        for (key, value) in &self.extra {
            if key == "s" {
                return Err(Error::usage("--param cannot override the sentence (s)"));
            }
            query.insert(key.as_str(), value.as_str());
        }

        Ok(format!("{SCHEME}parse?{}", encode_query(query)))
    }
}

/// Split a `KEY=VALUE` pair given to `--param`.
pub fn parse_param(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| Error::usage(format!("invalid --param {raw:?}; want KEY=VALUE")))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(Error::usage(format!("invalid --param {raw:?}; empty key")));
    }
    Ok((key.to_string(), value.to_string()))
}

/// The target of a `show` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowTarget {
    /// A calendar view such as `mini`, `calendar` or `month`, optionally at a date.
    View {
        view: String,
        date: Option<NaiveDate>,
    },

    /// A named calendar set.
    Set { name: String },
}

impl ShowTarget {
    /// Interpret the positional arguments of `show`, resolving relative dates
    /// against `today`.
    pub fn from_args(args: &[String], today: NaiveDate) -> Result<Self> {
        let Some((view, rest)) = args.split_first() else {
            return Err(Error::usage("missing view (mini|calendar|set)"));
        };

        let view = view.trim().to_lowercase();
        if view == "set" {
            let name = rest.join(" ").trim().to_string();
            if name.is_empty() {
                return Err(Error::usage("missing calendar set name"));
            }
            return Ok(Self::Set { name });
        }

        let valid = !view.is_empty()
            && view
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(Error::usage(format!(
                "unknown show target {view:?} (want: mini, calendar, set)"
            )));
        }

        match rest {
            [] => Ok(Self::View { view, date: None }),
            [date] => Ok(Self::View {
                date: Some(parse_date_arg(date, today)?),
                view,
            }),
            _ => Err(Error::usage(format!(
                "too many args for {view:?}; expected: fantastical show {view} [date]"
            ))),
        }
    }

    pub fn url(&self) -> String {
        match self {
            Self::View { view, date: None } => format!("{SCHEME}show/{view}"),
            Self::View {
                view,
                date: Some(date),
            } => format!("{SCHEME}show/{view}/{}", date.format("%Y-%m-%d")),
            Self::Set { name } => {
                format!("{SCHEME}show/set?{}", encode_query([("name", name.as_str())]))
            }
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 3).unwrap()
    }

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_encode_query_spaces() {
        let encoded = encode_query([("s", "Wake up at 8am")]);
        assert_eq!(encoded, "s=Wake%20up%20at%208am");
    }

    #[test]
    fn test_encode_query_sorted_and_plus_escaped() {
        let encoded = encode_query([("s", "1+1"), ("add", "1")]);
        assert_eq!(encoded, "add=1&s=1%2B1");
    }

    #[test]
    fn test_build_parse_url() {
        let url = ParseUrl {
            sentence: "Dinner with Sam".to_string(),
            note: Some("Bring notes".to_string()),
            calendar: Some("Work".to_string()),
            add: true,
            extra: vec![("foo".to_string(), "bar".to_string())],
        }
        .build()
        .unwrap();

        assert_eq!(
            url,
            "x-fantastical3://parse?add=1&calendarName=Work&foo=bar&n=Bring%20notes&s=Dinner%20with%20Sam"
        );
        assert!(!url.contains('+'));
    }

    #[test]
    fn test_build_parse_url_skips_blank_fields() {
        let url = ParseUrl {
            sentence: "  Wake up  ".to_string(),
            note: Some("   ".to_string()),
            calendar: Some(String::new()),
            ..Default::default()
        }
        .build()
        .unwrap();
        assert_eq!(url, "x-fantastical3://parse?s=Wake%20up");
    }

    #[test]
    fn test_build_parse_url_missing_sentence() {
        let err = ParseUrl::new("  ").build().unwrap_err();
        assert!(err.is_usage());
    }

    #[test]
    fn test_build_parse_url_rejects_sentence_override() {
        let mut req = ParseUrl::new("Lunch");
        req.extra.push(("s".to_string(), "Other".to_string()));
        assert!(req.build().unwrap_err().is_usage());
    }

    #[test]
    fn test_parse_param() {
        assert_eq!(
            parse_param("foo=bar=baz").unwrap(),
            ("foo".to_string(), "bar=baz".to_string())
        );
        assert!(parse_param("novalue").unwrap_err().is_usage());
        assert!(parse_param("=x").unwrap_err().is_usage());
    }

    #[test]
    fn test_show_mini_with_date() {
        let target = ShowTarget::from_args(&strings(&["mini", "2026-01-03"]), today()).unwrap();
        assert_eq!(target.url(), "x-fantastical3://show/mini/2026-01-03");
    }

    #[test]
    fn test_show_relative_date() {
        let target = ShowTarget::from_args(&strings(&["Calendar", "tomorrow"]), today()).unwrap();
        assert_eq!(target.url(), "x-fantastical3://show/calendar/2026-01-04");
    }

    #[test]
    fn test_show_generic_view() {
        let target = ShowTarget::from_args(&strings(&["month", "2026-01-03"]), today()).unwrap();
        assert_eq!(target.url(), "x-fantastical3://show/month/2026-01-03");

        let target = ShowTarget::from_args(&strings(&["week"]), today()).unwrap();
        assert_eq!(target.url(), "x-fantastical3://show/week");
    }

    #[test]
    fn test_show_set() {
        let target =
            ShowTarget::from_args(&strings(&["set", "My", "Calendar", "Set"]), today()).unwrap();
        assert_eq!(
            target,
            ShowTarget::Set {
                name: "My Calendar Set".to_string()
            }
        );
        assert_eq!(target.url(), "x-fantastical3://show/set?name=My%20Calendar%20Set");
    }

    #[test]
    fn test_show_errors() {
        let usage = |args: &[&str]| {
            ShowTarget::from_args(&strings(args), today())
                .unwrap_err()
                .is_usage()
        };
        assert!(usage(&[]));
        assert!(usage(&["set"]));
        assert!(usage(&["mini", "2026-01-03", "extra"]));
        assert!(usage(&["mini", "not-a-date"]));
        assert!(usage(&["../etc"]));
    }
}
