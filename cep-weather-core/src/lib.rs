//! Core library for the `cep-weather` service.
//!
//! This crate defines:
//! - Postal code validation and the lookup error taxonomy
//! - Clients for the address and weather collaborators
//! - Temperature conversions and the response model
//! - Configuration & credentials handling
//!
//! The HTTP surface lives in `cep-weather-server`; everything here can be
//! driven without a server through [`Lookup::handle_lookup`].

pub mod config;
pub mod error;
pub mod lookup;
pub mod model;
pub mod postal;
pub mod provider;

pub use config::Config;
pub use error::LookupError;
pub use lookup::Lookup;
pub use model::{LocalityLookupResult, WeatherReading, WeatherResponse, round1};
pub use postal::PostalCode;
pub use provider::{LocalityProvider, WeatherProvider};
