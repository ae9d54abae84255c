use std::{process::ExitCode, sync::Arc};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use inquire::{Confirm, CustomType, Text, validator::Validation};
use meteo_core::{
    Config, ConfiguredLocation, Coordinates, QueryOutcome, WeatherService, codes,
    provider_from_config,
};

use crate::display::TerminalSink;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteo", version, about = "Current weather from Open-Meteo")]
pub struct Cli {
    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Without a subcommand the configured default city is shown.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show current weather for a place name.
    City {
        /// Place name; several words are joined with spaces.
        #[arg(required = true)]
        name: Vec<String>,
    },

    /// Show current weather at a coordinate.
    #[command(allow_negative_numbers = true)]
    Coords { latitude: f64, longitude: f64 },

    /// Show current weather at the configured home location.
    Here,

    /// List the weather codes and their descriptions.
    Codes,

    /// Interactively edit the configuration file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let config = Config::load()?;
        tracing::debug!(?config, "configuration loaded");

        let outcome = match self.command {
            Some(Command::Configure) => {
                configure(config)?;
                return Ok(ExitCode::SUCCESS);
            }
            Some(Command::Codes) => {
                for entry in codes::entries() {
                    println!("{:>3}  {}  {}", entry.code, entry.icon, entry.description);
                }
                return Ok(ExitCode::SUCCESS);
            }
            Some(Command::City { name }) => service(&config)?.search_by_city(&name.join(" ")).await,
            Some(Command::Coords { latitude, longitude }) => {
                service(&config)?.search_by_coords(latitude, longitude).await
            }
            Some(Command::Here) => {
                let source = ConfiguredLocation::from(&config.geolocation);
                service(&config)?.search_by_location(&source).await
            }
            None => match config.search.default_city.as_deref() {
                Some(city) => service(&config)?.search_by_city(city).await,
                None => {
                    eprintln!(
                        "No default city configured.\n\
                         Hint: run `meteo city <name>` or `meteo configure`."
                    );
                    return Ok(ExitCode::FAILURE);
                }
            },
        };

        Ok(exit_code(&outcome))
    }
}

fn exit_code(outcome: &QueryOutcome) -> ExitCode {
    match outcome {
        QueryOutcome::Rendered(_) | QueryOutcome::Ignored => ExitCode::SUCCESS,
        QueryOutcome::Failed(err) => {
            tracing::warn!(%err, "query failed");
            ExitCode::FAILURE
        }
        QueryOutcome::Superseded => ExitCode::FAILURE,
    }
}

fn service(config: &Config) -> anyhow::Result<WeatherService> {
    let provider = provider_from_config(config)?;
    let sink = Arc::new(TerminalSink::new());
    Ok(WeatherService::new(provider.clone(), provider, sink, config))
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let current_city = config.search.default_city.clone().unwrap_or_default();
    let city = Text::new("Default city (empty for none):")
        .with_default(&current_city)
        .prompt()
        .context("Failed to read default city")?;
    let city = city.trim();
    config.search.default_city = (!city.is_empty()).then(|| city.to_string());

    let language = Text::new("Geocoding language:")
        .with_default(&config.search.language)
        .prompt()
        .context("Failed to read language")?;
    config.search.language = language.trim().to_string();

    let set_home = Confirm::new("Set a home location for `meteo here`?")
        .with_default(config.geolocation.home.is_some())
        .prompt()
        .context("Failed to read answer")?;

    let home = if set_home {
        let latitude = CustomType::<f64>::new("Latitude:")
            .with_error_message("Please type a number")
            .with_validator(|v: &f64| {
                Ok(if (-90.0..=90.0).contains(v) {
                    Validation::Valid
                } else {
                    Validation::Invalid("Latitude must be between -90 and 90".into())
                })
            })
            .prompt()
            .context("Failed to read latitude")?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .with_error_message("Please type a number")
            .with_validator(|v: &f64| {
                Ok(if (-180.0..=180.0).contains(v) {
                    Validation::Valid
                } else {
                    Validation::Invalid("Longitude must be between -180 and 180".into())
                })
            })
            .prompt()
            .context("Failed to read longitude")?;
        Some(Coordinates::new(latitude, longitude))
    } else {
        None
    };
    config.set_home(home);

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}
