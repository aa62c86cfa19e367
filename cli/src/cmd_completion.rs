// SPDX-FileCopyrightText: 2026 The fantastical-cli contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::io;
use std::path::PathBuf;

use clap::{Arg, ArgMatches, Command, ValueEnum, ValueHint, arg, value_parser};
use clap_complete::generate;

use crate::Cli;

fn shell_arg() -> Arg {
    arg!(shell: <SHELL> "The shell generator to use").value_parser(value_parser!(Shell))
}

#[derive(Debug, Clone, Copy)]
pub struct CmdCompletion {
    pub shell: Shell,
}

impl CmdCompletion {
    pub const NAME: &str = "completion";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Generate shell completion for the specified shell")
            .after_help("EXAMPLES:\n  fantastical completion zsh\n  fantastical completion install fish")
            .args_conflicts_with_subcommands(true)
            .subcommand_negates_reqs(true)
            .arg(shell_arg())
            .subcommand(CmdCompletionInstall::command())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        match matches.get_one::<Shell>("shell") {
            Some(shell) => Self { shell: *shell },
            _ => unreachable!(),
        }
    }

    pub fn run(self, out: &mut impl io::Write) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "generating shell completion...");
        self.shell.generate(out);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CmdCompletionInstall {
    pub shell: Shell,
    pub path: Option<PathBuf>,
}

impl CmdCompletionInstall {
    pub const NAME: &str = "install";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Write the completion script to the shell's completion directory")
            .arg(shell_arg())
            .arg(
                arg!(--path <PATH> "Destination file, overriding the shell's default location")
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
    }

    pub fn from(matches: &ArgMatches) -> Self {
        match matches.get_one::<Shell>("shell") {
            Some(shell) => Self {
                shell: *shell,
                path: matches.get_one("path").cloned(),
            },
            _ => unreachable!(),
        }
    }

    pub async fn run(self, out: &mut impl io::Write) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "installing shell completion...");
        let path = match self.path {
            Some(path) => path,
            None => {
                let location = self.shell.default_location().ok_or_else(|| {
                    fantastical_core::Error::usage(format!(
                        "no default completion location for {}; pass --path",
                        self.shell.name()
                    ))
                })?;
                let home = dirs::home_dir().ok_or("cannot determine home directory")?;
                home.join(location)
            }
        };

        let mut script = Vec::new();
        self.shell.generate(&mut script);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| fantastical_core::Error::io(parent.display().to_string(), e))?;
        }
        tokio::fs::write(&path, script)
            .await
            .map_err(|e| fantastical_core::Error::io(path.display().to_string(), e))?;

        writeln!(out, "Installed {} completion to {}", self.shell.name(), path.display())?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Elvish,
    Fish,
    Nushell,
    #[clap(name = "powershell")]
    #[allow(clippy::enum_variant_names)]
    PowerShell,
    Zsh,
}

impl Shell {
    pub fn name(self) -> &'static str {
        match self {
            Shell::Bash => "bash",
            Shell::Elvish => "elvish",
            Shell::Fish => "fish",
            Shell::Nushell => "nushell",
            Shell::PowerShell => "powershell",
            Shell::Zsh => "zsh",
        }
    }

    pub fn generate(self, buf: &mut impl io::Write) {
        use clap_complete::Shell as ClapShell;

        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        match self {
            Shell::Bash => generate(ClapShell::Bash, &mut cmd, name, buf),
            Shell::Elvish => generate(ClapShell::Elvish, &mut cmd, name, buf),
            Shell::Fish => generate(ClapShell::Fish, &mut cmd, name, buf),
            Shell::PowerShell => generate(ClapShell::PowerShell, &mut cmd, name, buf),
            Shell::Zsh => generate(ClapShell::Zsh, &mut cmd, name, buf),
            Shell::Nushell => generate(clap_complete_nushell::Nushell {}, &mut cmd, name, buf),
        }
    }

    /// Where the shell picks up user completions, relative to the home
    /// directory; PowerShell has no such directory.
    pub fn default_location(self) -> Option<PathBuf> {
        let name = fantastical_core::APP_NAME;
        let path = match self {
            Shell::Bash => format!(".local/share/bash-completion/completions/{name}"),
            Shell::Zsh => format!(".zfunc/_{name}"),
            Shell::Fish => format!(".config/fish/completions/{name}.fish"),
            Shell::Elvish => format!(".config/elvish/lib/{name}.elv"),
            Shell::Nushell => format!(".config/nushell/completions/{name}.nu"),
            Shell::PowerShell => return None,
        };
        Some(PathBuf::from(path))
    }
}
