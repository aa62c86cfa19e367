// SPDX-FileCopyrightText: 2026 The fantastical-cli contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use fantastical_core::eventkit::HelperLocator;
use fantastical_core::{Config, Dispatcher};
use tokio::io::AsyncReadExt;

/// Everything a command needs besides its own arguments.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    pub dispatcher: Dispatcher,
    pub helper: HelperLocator,

    /// Replaces the process stdin for `--stdin`.
    pub stdin: Option<String>,
}

impl Context {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            dispatcher: Dispatcher::from_env(),
            helper: HelperLocator::from_env(),
            stdin: None,
        }
    }

    pub fn dispatcher(&self, dry_run: bool) -> Dispatcher {
        self.dispatcher.clone().with_dry_run(dry_run)
    }

    /// The sentence from positional words, or from stdin when `from_stdin`.
    pub async fn sentence(
        &self,
        words: &[String],
        from_stdin: bool,
    ) -> Result<String, Box<dyn Error>> {
        if !from_stdin {
            return Ok(words.join(" ").trim().to_string());
        }
        if !words.is_empty() {
            let err = fantastical_core::Error::usage("--stdin cannot be combined with <sentence...>");
            return Err(err.into());
        }

        let input = match &self.stdin {
            Some(input) => input.clone(),
            None => {
                let mut input = String::new();
                tokio::io::stdin().read_to_string(&mut input).await?;
                input
            }
        };
        Ok(input.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(stdin: Option<&str>) -> Context {
        Context {
            stdin: stdin.map(str::to_string),
            ..Context::new(Config::default())
        }
    }

    #[tokio::test]
    async fn test_sentence_from_words() {
        let words = vec!["  Wake".to_string(), "up ".to_string()];
        let sentence = context(None).sentence(&words, false).await.unwrap();
        assert_eq!(sentence, "Wake up");
    }

    #[tokio::test]
    async fn test_sentence_from_stdin() {
        let sentence = context(Some("Lunch with Ana\n")).sentence(&[], true).await.unwrap();
        assert_eq!(sentence, "Lunch with Ana");
    }

    #[tokio::test]
    async fn test_stdin_conflicts_with_words() {
        let words = vec!["Lunch".to_string()];
        let err = context(Some("x")).sentence(&words, true).await.unwrap_err();
        let err = err.downcast_ref::<fantastical_core::Error>().unwrap();
        assert!(err.is_usage());
    }
}
