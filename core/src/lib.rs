// SPDX-FileCopyrightText: 2026 The fantastical-cli contributors
//
// SPDX-License-Identifier: Apache-2.0

pub mod applescript;
mod config;
pub mod date;
mod dispatch;
mod error;
pub mod eventkit;
pub mod url;

/// Name used for configuration and cache directories.
pub const APP_NAME: &str = "fantastical";

pub use crate::config::{
    AppleScriptConfig, CONFIG_ENV, Config, ConfigSources, EventKitConfig, OutputConfig,
    PROJECT_CONFIG_FILE, ParseConfig, load_config, parse_bool, parse_config,
    platform_default_open, read_config_file,
};
pub use crate::dispatch::{
    COPY_COMMAND_ENV, CommandLine, Dispatcher, OPEN_COMMAND_ENV, OSASCRIPT_COMMAND_ENV,
};
pub use crate::error::{Error, Result};
