use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use weather_core::{Config, ResolutionResult, WeatherCategory, WeatherOutcome};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    /// JSON gazetteer to use instead of the configured or bundled one.
    #[arg(long, global = true)]
    pub gazetteer: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and default country code.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name, e.g. "Meerut City" or "bombay".
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,

        /// Print the outcome as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show which known city a name resolves to, without querying the weather.
    Resolve {
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut cfg = Config::load()?;
        if let Some(path) = self.gazetteer {
            cfg.gazetteer_path = Some(path);
        }

        match self.command {
            Command::Configure => configure(cfg),
            Command::Show { city, json } => show(&cfg, &city.join(" "), json).await,
            Command::Resolve { city } => {
                let resolver = cfg.city_resolver()?;
                match resolver.resolve(&city.join(" ")) {
                    ResolutionResult::Resolved { id, display_name } => {
                        println!("{display_name} (id {id})");
                    }
                    ResolutionResult::Unresolved => println!("unresolved"),
                }
                Ok(())
            }
        }
    }
}

fn configure(mut cfg: Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let country_code = Text::new("Country code for free-text lookups:")
        .with_default(&cfg.country_code)
        .prompt()
        .context("Failed to read country code")?;

    cfg.set_api_key(api_key.trim().to_string());
    cfg.country_code = country_code.trim().to_uppercase();

    let path = cfg.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

async fn show(cfg: &Config, input: &str, json: bool) -> anyhow::Result<()> {
    let resolver = cfg.city_resolver()?;
    let dispatcher = cfg.dispatcher()?;

    let resolution = resolver.resolve(input);
    tracing::debug!(?resolution, "resolved city input");
    let outcome = dispatcher.dispatch(&resolution, input).await;

    if json {
        let rendered = serde_json::to_string_pretty(&outcome)
            .context("Failed to serialize weather outcome")?;
        println!("{rendered}");
        return Ok(());
    }

    match &outcome {
        WeatherOutcome::Success { temperature_c, description, display_name } => {
            let category = WeatherCategory::from_description(description);
            println!("{display_name}");
            println!("{temperature_c:.1}°C");
            println!("{}", category.emoji());
            println!("{}", capitalize(description));
            Ok(())
        }
        _ => bail!("{}", outcome.error_message().unwrap_or_default()),
    }
}

/// First letter upper-case, the rest lower-case.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalize_lowers_the_rest() {
        assert_eq!(capitalize("light rain"), "Light rain");
        assert_eq!(capitalize("OVERCAST Clouds"), "Overcast clouds");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn parses_multi_word_city() {
        let cli =
            Cli::try_parse_from(["weather", "show", "Meerut", "City", "--json"]).expect("parse");
        match cli.command {
            Command::Show { city, json } => {
                assert_eq!(city.join(" "), "Meerut City");
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn show_requires_a_city() {
        assert!(Cli::try_parse_from(["weather", "show"]).is_err());
    }

    #[test]
    fn global_gazetteer_flag() {
        let cli = Cli::try_parse_from(["weather", "resolve", "pune", "--gazetteer", "c.json"])
            .expect("parse");
        assert_eq!(cli.gazetteer, Some(PathBuf::from("c.json")));
    }
}
