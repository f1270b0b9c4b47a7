//! Command-line interface parsing for quickdef
//!
//! This module handles parsing of CLI arguments using clap. Words given on
//! the command line are looked up once and printed; without words the
//! interactive popup opens.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use reqwest::Url;
use thiserror::Error;

use crate::config::LookupConfig;

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    /// The API URL could not be parsed
    #[error("Invalid API URL: '{0}'")]
    InvalidApiUrl(String),

    /// A flag that only applies to one-shot lookups was given without words
    #[error("--{0} needs at least one WORD")]
    RequiresWords(&'static str),
}

/// quickdef - look up English word definitions
#[derive(Parser, Debug)]
#[command(name = "quickdef")]
#[command(about = "Look up English word definitions from the terminal")]
#[command(version)]
pub struct Cli {
    /// Words to look up; opens the interactive popup when omitted
    ///
    /// Examples:
    ///   quickdef hello              # Print the definition of "hello"
    ///   quickdef --json ice-cream   # Print the raw lookup response
    ///   quickdef                    # Open the interactive popup
    #[arg(value_name = "WORD")]
    pub words: Vec<String>,

    /// Treat each WORD as an in-page selection (at most three words)
    #[arg(long)]
    pub selection: bool,

    /// Print lookup responses as JSON, one per line
    #[arg(long)]
    pub json: bool,

    /// Keep definitions in memory only
    #[arg(long)]
    pub no_cache: bool,

    /// Directory for cached definitions
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Base URL of the dictionary API
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// What the binary should do after startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Open the interactive toolbar popup
    Interactive,
    /// Look up the given words and exit
    OneShot { words: Vec<String> },
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub mode: Mode,
    /// Apply the in-page selection rules to one-shot words
    pub selection: bool,
    /// Print JSON responses instead of text
    pub json: bool,
    /// Lookup pipeline settings
    pub lookup: LookupConfig,
    /// Default log filter directive when `RUST_LOG` is unset
    pub log_directive: String,
}

/// Maps `-v` occurrences to a log level
pub fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// Flags override the values in `base`, which normally comes from
    /// [`LookupConfig::from_env`].
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if a flag value is invalid or misplaced
    pub fn from_cli(cli: &Cli, base: LookupConfig) -> Result<Self, CliError> {
        let mode = if cli.words.is_empty() {
            if cli.json {
                return Err(CliError::RequiresWords("json"));
            }
            if cli.selection {
                return Err(CliError::RequiresWords("selection"));
            }
            Mode::Interactive
        } else {
            Mode::OneShot {
                words: cli.words.clone(),
            }
        };

        let mut lookup = base;
        if let Some(url) = &cli.api_url {
            Url::parse(url).map_err(|_| CliError::InvalidApiUrl(url.clone()))?;
            lookup.api_base_url = url.clone();
        }
        if let Some(dir) = &cli.cache_dir {
            lookup.cache_dir = Some(dir.clone());
        }
        if cli.no_cache {
            lookup.cache_enabled = false;
        }

        Ok(StartupConfig {
            mode,
            selection: cli.selection,
            json: cli.json,
            lookup,
            log_directive: format!("quickdef={}", log_level(cli.verbose)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn startup(args: &[&str]) -> Result<StartupConfig, CliError> {
        let cli = Cli::parse_from(args.iter().copied());
        StartupConfig::from_cli(&cli, LookupConfig::default())
    }

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["quickdef"]);
        assert!(cli.words.is_empty());
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_cli_parse_words_and_flags() {
        let cli = Cli::parse_from(["quickdef", "--json", "-vv", "hello", "world"]);
        assert_eq!(cli.words, vec!["hello", "world"]);
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_startup_config_interactive() {
        let config = startup(&["quickdef"]).unwrap();
        assert_eq!(config.mode, Mode::Interactive);
        assert_eq!(config.log_directive, "quickdef=warn");
        assert!(config.lookup.cache_enabled);
    }

    #[test]
    fn test_startup_config_one_shot() {
        let config = startup(&["quickdef", "hello"]).unwrap();
        assert_eq!(
            config.mode,
            Mode::OneShot {
                words: vec!["hello".to_string()]
            }
        );
    }

    #[test]
    fn test_startup_config_overrides() {
        let config = startup(&[
            "quickdef",
            "--no-cache",
            "--cache-dir",
            "/tmp/defs",
            "--api-url",
            "http://localhost:8080",
            "hello",
        ])
        .unwrap();

        assert!(!config.lookup.cache_enabled);
        assert_eq!(config.lookup.cache_dir, Some(PathBuf::from("/tmp/defs")));
        assert_eq!(config.lookup.api_base_url, "http://localhost:8080");
    }

    #[test]
    fn test_startup_config_invalid_api_url() {
        let result = startup(&["quickdef", "--api-url", "not a url", "hello"]);
        assert!(matches!(result, Err(CliError::InvalidApiUrl(_))));
    }

    #[test]
    fn test_json_and_selection_need_words() {
        assert!(matches!(
            startup(&["quickdef", "--json"]),
            Err(CliError::RequiresWords("json"))
        ));
        assert!(matches!(
            startup(&["quickdef", "--selection"]),
            Err(CliError::RequiresWords("selection"))
        ));
    }

    #[test]
    fn test_log_level() {
        assert_eq!(log_level(0), "warn");
        assert_eq!(log_level(1), "info");
        assert_eq!(log_level(2), "debug");
        assert_eq!(log_level(7), "trace");
    }
}
