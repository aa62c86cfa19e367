// SPDX-FileCopyrightText: 2026 The fantastical-cli contributors
//
// SPDX-License-Identifier: Apache-2.0

//! The AppleScript sent to Fantastical through `osascript`.
//!
//! The sentence travels as a script argument rather than being spliced into
//! the source, so no quoting is needed.

const SCRIPT_LINES: &[&str] = &[
    "on run argv",
    "set theSentence to item 1 of argv",
    "set addImmediately to false",
    "if (count of argv) > 1 then",
    "set addImmediately to (item 2 of argv is \"1\")",
    "end if",
    "tell application \"Fantastical\"",
    "if addImmediately then",
    "parse sentence theSentence with add immediately",
    "else",
    "parse sentence theSentence",
    "end if",
    "end tell",
    "end run",
];

/// The script source, one statement per line.
pub fn script() -> String {
    SCRIPT_LINES.join("\n")
}

/// Arguments for `osascript`: the script as `-e` pairs, then the sentence and
/// the add flag after `--`.
pub fn osascript_args(sentence: &str, add: bool) -> Vec<String> {
    let mut args = Vec::with_capacity(SCRIPT_LINES.len() * 2 + 3);
    for line in SCRIPT_LINES {
        args.push("-e".to_string());
        args.push((*line).to_string());
    }
    args.push("--".to_string());
    args.push(sentence.to_string());
    args.push(if add { "1" } else { "0" }.to_string());
    args
}
