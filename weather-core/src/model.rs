use serde::Serialize;

use crate::gazetteer::CityId;

/// Result of mapping free text onto a gazetteer entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionResult {
    Resolved { id: CityId, display_name: String },
    Unresolved,
}

impl ResolutionResult {
    pub fn id(&self) -> Option<&CityId> {
        match self {
            ResolutionResult::Resolved { id, .. } => Some(id),
            ResolutionResult::Unresolved => None,
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        match self {
            ResolutionResult::Resolved { display_name, .. } => Some(display_name),
            ResolutionResult::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, ResolutionResult::Resolved { .. })
    }
}

/// Category of a failure that happened before a usable body was available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorKind {
    ConnectionFailed,
    TimedOut,
    TooManyRedirects,
    HttpStatus(u16),
    Other,
}

impl TransportErrorKind {
    /// Human-readable message shown to the user, `detail` is appended only where
    /// the category has no fixed wording.
    pub fn user_message(&self, detail: &str) -> String {
        let fixed = match self {
            TransportErrorKind::HttpStatus(400) => "Bad request:\nPlease check your input",
            TransportErrorKind::HttpStatus(401) => "Unauthorized:\nInvalid API key",
            TransportErrorKind::HttpStatus(403) => "Forbidden:\nAccess is denied",
            TransportErrorKind::HttpStatus(404) => "Not found:\nCity not found",
            TransportErrorKind::HttpStatus(500) => "Internal Server Error:\nPlease try again later",
            TransportErrorKind::HttpStatus(502) => "Bad Gateway:\nInvalid response from the server",
            TransportErrorKind::HttpStatus(503) => "Service Unavailable:\nServer is down",
            TransportErrorKind::HttpStatus(504) => "Gateway Timeout:\nNo response from the server",
            TransportErrorKind::HttpStatus(_) => return format!("HTTP error occurred:\n{detail}"),
            TransportErrorKind::ConnectionFailed => {
                "Connection Error:\nCheck your internet connection"
            }
            TransportErrorKind::TimedOut => "Timeout Error:\nThe request timed out",
            TransportErrorKind::TooManyRedirects => "Too many redirects:\nCheck the URL",
            TransportErrorKind::Other => return format!("Request Error:\n{detail}"),
        };

        fixed.to_string()
    }
}

/// What the presentation layer receives for one lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeatherOutcome {
    Success {
        temperature_c: f64,
        description: String,
        display_name: String,
    },
    DomainError {
        message: String,
    },
    TransportError {
        category: TransportErrorKind,
        detail: String,
    },
}

impl WeatherOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, WeatherOutcome::Success { .. })
    }

    /// Message to display for the error variants; `None` on success.
    pub fn error_message(&self) -> Option<String> {
        match self {
            WeatherOutcome::Success { .. } => None,
            WeatherOutcome::DomainError { message } => Some(message.clone()),
            WeatherOutcome::TransportError { category, detail } => {
                Some(category.user_message(detail))
            }
        }
    }
}

/// Coarse condition bucket picked from a free-text description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCategory {
    Cloud,
    Rain,
    Clear,
    Mist,
    Snow,
    Unknown,
}

impl WeatherCategory {
    /// Keyword tests run in priority order; the first hit wins.
    pub fn from_description(description: &str) -> Self {
        let d = description.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| d.contains(w));

        if has(&["cloud"]) {
            WeatherCategory::Cloud
        } else if has(&["rain", "drizzle", "thunder"]) {
            WeatherCategory::Rain
        } else if has(&["clear"]) {
            WeatherCategory::Clear
        } else if has(&["mist", "fog", "haze", "smoke"]) {
            WeatherCategory::Mist
        } else if has(&["snow"]) {
            WeatherCategory::Snow
        } else {
            WeatherCategory::Unknown
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            WeatherCategory::Cloud => "☁️",
            WeatherCategory::Rain => "🌧️",
            WeatherCategory::Clear => "☀️",
            WeatherCategory::Mist => "🌫️",
            WeatherCategory::Snow => "❄️",
            WeatherCategory::Unknown => "🌍",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_priority_prefers_cloud_over_rain() {
        assert_eq!(WeatherCategory::from_description("rain with clouds"), WeatherCategory::Cloud);
    }

    #[test]
    fn category_keywords() {
        assert_eq!(WeatherCategory::from_description("light rain"), WeatherCategory::Rain);
        assert_eq!(WeatherCategory::from_description("Thunderstorm"), WeatherCategory::Rain);
        assert_eq!(WeatherCategory::from_description("clear sky"), WeatherCategory::Clear);
        assert_eq!(WeatherCategory::from_description("haze"), WeatherCategory::Mist);
        assert_eq!(WeatherCategory::from_description("light snow"), WeatherCategory::Snow);
        assert_eq!(WeatherCategory::from_description("sand"), WeatherCategory::Unknown);
        assert_eq!(WeatherCategory::from_description(""), WeatherCategory::Unknown);
    }

    #[test]
    fn rain_emoji() {
        assert_eq!(WeatherCategory::Rain.emoji(), "🌧️");
    }

    #[test]
    fn http_status_messages() {
        assert_eq!(
            TransportErrorKind::HttpStatus(404).user_message("ignored"),
            "Not found:\nCity not found"
        );
        assert_eq!(
            TransportErrorKind::HttpStatus(401).user_message(""),
            "Unauthorized:\nInvalid API key"
        );
        assert_eq!(
            TransportErrorKind::HttpStatus(418).user_message("418 I'm a teapot"),
            "HTTP error occurred:\n418 I'm a teapot"
        );
    }

    #[test]
    fn every_fixed_message() {
        let cases = [
            (TransportErrorKind::HttpStatus(400), "Bad request:\nPlease check your input"),
            (TransportErrorKind::HttpStatus(401), "Unauthorized:\nInvalid API key"),
            (TransportErrorKind::HttpStatus(403), "Forbidden:\nAccess is denied"),
            (TransportErrorKind::HttpStatus(404), "Not found:\nCity not found"),
            (TransportErrorKind::HttpStatus(500), "Internal Server Error:\nPlease try again later"),
            (TransportErrorKind::HttpStatus(502), "Bad Gateway:\nInvalid response from the server"),
            (TransportErrorKind::HttpStatus(503), "Service Unavailable:\nServer is down"),
            (TransportErrorKind::HttpStatus(504), "Gateway Timeout:\nNo response from the server"),
            (
                TransportErrorKind::ConnectionFailed,
                "Connection Error:\nCheck your internet connection",
            ),
            (TransportErrorKind::TimedOut, "Timeout Error:\nThe request timed out"),
            (TransportErrorKind::TooManyRedirects, "Too many redirects:\nCheck the URL"),
        ];

        for (kind, expected) in cases {
            assert_eq!(kind.user_message("detail"), expected, "{kind:?}");
        }

        assert_eq!(
            TransportErrorKind::HttpStatus(429).user_message("429 Too Many Requests"),
            "HTTP error occurred:\n429 Too Many Requests"
        );
        assert_eq!(TransportErrorKind::Other.user_message("detail"), "Request Error:\ndetail");
    }

    #[test]
    fn non_status_messages() {
        assert_eq!(
            TransportErrorKind::TimedOut.user_message(""),
            "Timeout Error:\nThe request timed out"
        );
        assert_eq!(
            TransportErrorKind::Other.user_message("boom"),
            "Request Error:\nboom"
        );
    }

    #[test]
    fn outcome_error_message() {
        let ok = WeatherOutcome::Success {
            temperature_c: 1.0,
            description: "clear sky".into(),
            display_name: "Pune".into(),
        };
        assert!(ok.is_success());
        assert_eq!(ok.error_message(), None);

        let domain = WeatherOutcome::DomainError { message: "city not found".into() };
        assert_eq!(domain.error_message().as_deref(), Some("city not found"));
    }

    #[test]
    fn resolution_accessors() {
        let r = ResolutionResult::Resolved {
            id: CityId::Numeric(1),
            display_name: "Agra".into(),
        };
        assert!(r.is_resolved());
        assert_eq!(r.display_name(), Some("Agra"));
        assert_eq!(ResolutionResult::Unresolved.id(), None);
    }
}
