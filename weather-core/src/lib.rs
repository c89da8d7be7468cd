//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - City name resolution against a static gazetteer
//! - Weather query construction and response classification
//! - Configuration & credentials handling
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod dispatcher;
pub mod gazetteer;
pub mod model;
pub mod query;
pub mod resolver;
pub mod transport;

pub use config::Config;
pub use dispatcher::WeatherQueryDispatcher;
pub use gazetteer::{CityId, Gazetteer, GazetteerEntry};
pub use model::{ResolutionResult, TransportErrorKind, WeatherCategory, WeatherOutcome};
pub use query::{Endpoint, WeatherQuery};
pub use resolver::{AliasTable, CityResolver};
pub use transport::{HttpTransport, Transport, TransportFailure, TransportResponse};
