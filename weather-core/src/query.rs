use anyhow::{Context, Result};
use url::Url;

use crate::{gazetteer::CityId, model::ResolutionResult};

pub const OPENWEATHER_CURRENT_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Base URL plus credentials for the current-weather endpoint.
#[derive(Clone)]
pub struct Endpoint {
    base_url: Url,
    api_key: String,
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl Endpoint {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid weather API base URL: {base_url}"))?;

        Ok(Self { base_url, api_key: api_key.into() })
    }
}

/// How the remote service is asked for a city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeatherQuery {
    ById(CityId),
    ByText { text: String, country_code: String },
}

impl WeatherQuery {
    /// Identifier lookup when resolved, free-text lookup otherwise.
    /// Returns `None` when there is neither an id nor any text to search for.
    pub fn for_resolution(
        resolution: &ResolutionResult,
        raw: &str,
        country_code: &str,
    ) -> Option<Self> {
        if let Some(id) = resolution.id() {
            return Some(WeatherQuery::ById(id.clone()));
        }

        let text = raw.trim();
        if text.is_empty() {
            return None;
        }

        Some(WeatherQuery::ByText {
            text: text.to_string(),
            country_code: country_code.to_string(),
        })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            WeatherQuery::ById(_) => "id",
            WeatherQuery::ByText { .. } => "text",
        }
    }

    /// Full request URL. Temperatures are always requested in Celsius.
    pub fn to_url(&self, endpoint: &Endpoint) -> Url {
        let mut url = endpoint.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            match self {
                WeatherQuery::ById(id) => {
                    pairs.append_pair("id", &id.to_string());
                }
                WeatherQuery::ByText { text, country_code } if country_code.is_empty() => {
                    pairs.append_pair("q", text);
                }
                WeatherQuery::ByText { text, country_code } => {
                    pairs.append_pair("q", &format!("{text},{country_code}"));
                }
            }
            pairs
                .append_pair("appid", &endpoint.api_key)
                .append_pair("units", "metric");
        }
        url
    }
}
