use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    model::{ResolutionResult, TransportErrorKind, WeatherOutcome},
    query::{Endpoint, WeatherQuery},
    transport::Transport,
};

/// Domain status code the service uses for a successful lookup.
const SUCCESS_CODE: i64 = 200;
const NO_CITY_MESSAGE: &str = "Please enter a city name";

/// Turns a resolution into a weather request and classifies whatever comes back.
#[derive(Debug)]
pub struct WeatherQueryDispatcher {
    endpoint: Endpoint,
    country_code: String,
    transport: Box<dyn Transport>,
}

impl WeatherQueryDispatcher {
    pub fn new(
        endpoint: Endpoint,
        country_code: impl Into<String>,
        transport: Box<dyn Transport>,
    ) -> Self {
        Self { endpoint, country_code: country_code.into(), transport }
    }

    /// Never fails: every error path ends up as a `WeatherOutcome` variant.
    pub async fn dispatch(&self, resolution: &ResolutionResult, raw: &str) -> WeatherOutcome {
        let Some(query) = WeatherQuery::for_resolution(resolution, raw, &self.country_code) else {
            return WeatherOutcome::DomainError { message: NO_CITY_MESSAGE.to_string() };
        };

        info!(
            kind = query.kind(),
            resolved = resolution.is_resolved(),
            "requesting current weather"
        );
        let url = query.to_url(&self.endpoint);

        match self.transport.fetch(&url).await {
            Ok(res) => {
                debug!(status = res.status, bytes = res.body.len(), "weather response received");
                classify_body(&res.body, resolution.display_name())
            }
            Err(failure) => WeatherOutcome::TransportError {
                category: failure.kind(),
                detail: failure.detail(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    cod: Option<Value>,
    message: Option<String>,
    name: Option<String>,
    main: Option<OwMain>,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

/// The service sends `cod` as a number on success and as a string on some errors.
fn domain_code(cod: Option<&Value>) -> i64 {
    match cod {
        Some(Value::Number(n)) => {
            n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)).unwrap_or(0)
        }
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Classify a body that arrived with a 2xx transport status.
pub fn classify_body(body: &str, resolved_name: Option<&str>) -> WeatherOutcome {
    let parsed: OwCurrentResponse = match serde_json::from_str(body) {
        Ok(p) => p,
        Err(e) => return malformed(format!("Failed to parse weather response: {e}")),
    };

    let code = domain_code(parsed.cod.as_ref());
    if code != SUCCESS_CODE {
        debug!(code, "service reported a domain error");
        return WeatherOutcome::DomainError {
            message: parsed.message.unwrap_or_else(|| "Unknown error".to_string()),
        };
    }

    let Some(temperature_c) = parsed.main.and_then(|m| m.temp) else {
        return malformed("Weather response is missing main.temp".to_string());
    };
    let Some(description) = parsed.weather.into_iter().next().and_then(|w| w.description) else {
        return malformed("Weather response is missing weather[0].description".to_string());
    };

    let display_name = resolved_name
        .map(str::to_string)
        .or(parsed.name)
        .unwrap_or_default();

    WeatherOutcome::Success { temperature_c, description, display_name }
}

fn malformed(detail: String) -> WeatherOutcome {
    tracing::warn!(%detail, "unusable weather response");
    WeatherOutcome::TransportError { category: TransportErrorKind::Other, detail }
}
