// SPDX-FileCopyrightText: 2026 The fantastical-cli contributors
//
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Calendar authorization state as reported by EventKit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatus {
    /// e.g. `full_access`, `denied`, `not_determined`.
    pub status: String,

    /// Whether asking would show the system permission prompt.
    pub can_prompt: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarInfo {
    pub id: String,
    pub title: String,

    /// The account the calendar belongs to, e.g. `iCloud`.
    pub source: String,

    /// `local`, `caldav`, `exchange`, `subscription` or `birthday`.
    #[serde(rename = "type")]
    pub kind: String,

    pub allows_modifications: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInfo {
    pub id: String,
    pub title: String,
    pub calendar: String,
    pub calendar_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub all_day: bool,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,

    /// The current user declined the invitation.
    #[serde(default)]
    pub declined: bool,
}
