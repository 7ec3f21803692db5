use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Confirm, Password};
use tracing::{info, warn};
use weather_core::{Config, HistoryStore, WeatherClient};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather lookups with search history")]
pub struct Cli {
    /// Path to the configuration file (defaults to the platform config dir).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure {
        /// Key to store; prompts when omitted.
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Show current weather for a city and remember the search.
    Show {
        /// City name, e.g. "London" or "Paris,FR".
        city: String,

        /// Print the record as JSON instead of the formatted view.
        #[arg(long)]
        json: bool,
    },

    /// Show a one-line summary for several cities; failures are skipped.
    Compare {
        #[arg(required = true)]
        cities: Vec<String>,
    },

    /// List recent searches, most recent first.
    History {
        /// Show at most this many entries.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Forget all recent searches.
    ClearHistory {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        match self.command {
            Command::Configure { api_key } => {
                let key = match api_key {
                    Some(key) => key,
                    None => Password::new("OpenWeather API key:")
                        .without_confirmation()
                        .prompt()
                        .context("Failed to read API key")?,
                };

                config.set_api_key(key);
                if !config.has_valid_api_key() {
                    anyhow::bail!("API key must not be empty");
                }
                let config_path = match self.config {
                    Some(path) => {
                        config.save_to(&path)?;
                        path
                    }
                    None => {
                        config.save()?;
                        Config::config_file_path()?
                    }
                };

                info!(path = %config_path.display(), "configuration saved");
                println!("Saved configuration to {}", config_path.display());
            }
            Command::Show { city, json } => {
                warn_if_unconfigured(&config);

                let mut client = WeatherClient::new(&config)?;
                let mut history = HistoryStore::open(&config.history_file);

                match client.lookup(&city).await {
                    Ok(record) => {
                        history.record(record.city());

                        if json {
                            println!("{}", serde_json::to_string_pretty(&record.to_json())?);
                        } else {
                            println!("{}", render::record(&record));
                        }
                    }
                    Err(_) => {
                        let message = client
                            .last_error_message()
                            .unwrap_or_else(|| "Unknown error occurred".to_string());
                        eprintln!("✗ {message}");
                        return Ok(ExitCode::FAILURE);
                    }
                }
            }
            Command::Compare { cities } => {
                warn_if_unconfigured(&config);

                let mut client = WeatherClient::new(&config)?;
                let records = client.lookup_many(&cities).await;

                if records.is_empty() {
                    eprintln!("✗ No weather found for the given cities");
                    return Ok(ExitCode::FAILURE);
                }

                for record in &records {
                    println!("{}", render::summary(record));
                }
            }
            Command::History { limit } => {
                let history = HistoryStore::open(&config.history_file);
                print!("{}", render::history(history.list(), limit));
            }
            Command::ClearHistory { yes } => {
                let confirmed = yes
                    || Confirm::new("Clear all search history?")
                        .with_default(false)
                        .prompt()
                        .context("Failed to read confirmation")?;

                if !confirmed {
                    println!("History kept.");
                    return Ok(ExitCode::SUCCESS);
                }

                let mut history = HistoryStore::open(&config.history_file);
                history.clear();

                println!("History cleared.");
                print!("{}", render::history(history.list(), None));
            }
        }

        Ok(ExitCode::SUCCESS)
    }
}

fn warn_if_unconfigured(config: &Config) {
    if !config.has_valid_api_key() {
        warn!("no valid API key configured");
        eprintln!(
            "No valid OpenWeather API key configured.\n\
             Hint: run `weather configure`. Get a free key at https://openweathermap.org/api"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_show_with_json_flag() {
        let cli = Cli::try_parse_from(["weather", "show", "New York", "--json"]).expect("parse");

        match cli.command {
            Command::Show { city, json } => {
                assert_eq!(city, "New York");
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn compare_requires_a_city() {
        assert!(Cli::try_parse_from(["weather", "compare"]).is_err());
    }

    #[test]
    fn global_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["weather", "history", "--config", "/tmp/w.toml"])
            .expect("parse");

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/w.toml")));
        assert!(matches!(cli.command, Command::History { limit: None }));
    }

    #[tokio::test]
    async fn clear_history_with_yes_empties_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let history_file = dir.path().join("history.json");
        let config_path = dir.path().join("config.toml");

        let config = Config {
            history_file: history_file.clone(),
            ..Config::default()
        };
        config.save_to(&config_path).expect("save config");

        HistoryStore::open(&history_file).record("Paris");

        let cli = Cli {
            config: Some(config_path),
            command: Command::ClearHistory { yes: true },
        };
        cli.run().await.expect("run must succeed");

        assert!(HistoryStore::open(&history_file).is_empty());
    }

    #[tokio::test]
    async fn configure_with_flag_persists_key() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config_path = dir.path().join("config.toml");

        let cli = Cli {
            config: Some(config_path.clone()),
            command: Command::Configure { api_key: Some("abc123".into()) },
        };
        cli.run().await.expect("run must succeed");

        let saved = Config::load_from(&config_path).expect("load");
        assert_eq!(saved.api_key, "abc123");
    }
}
