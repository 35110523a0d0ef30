use serde::{Deserialize, Serialize};

/// Outcome of resolving a postal code against the address service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalityLookupResult {
    pub locality: String,
    pub found: bool,
}

impl LocalityLookupResult {
    pub fn found(locality: impl Into<String>) -> Self {
        Self { locality: locality.into(), found: true }
    }

    pub fn not_found() -> Self {
        Self { locality: String::new(), found: false }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherReading {
    pub temperature_celsius: f64,
}

/// Body of a successful lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherResponse {
    #[serde(rename = "tempC")]
    pub temp_c: f64,
    #[serde(rename = "tempF")]
    pub temp_f: f64,
    #[serde(rename = "tempK")]
    pub temp_k: f64,
}

impl WeatherResponse {
    /// The Celsius reading is rounded first; Fahrenheit and Kelvin are derived
    /// from the rounded value and rounded again independently.
    pub fn from_celsius(celsius: f64) -> Self {
        let temp_c = round1(celsius);

        Self {
            temp_c,
            temp_f: round1(temp_c * 1.8 + 32.0),
            temp_k: round1(temp_c + 273.15),
        }
    }

    /// False when a reading was too large to convert, e.g. `1e308` overflowing to infinity.
    pub fn is_finite(&self) -> bool {
        self.temp_c.is_finite() && self.temp_f.is_finite() && self.temp_k.is_finite()
    }
}

/// Round half away from zero to one decimal place.
///
/// Ties are detected on the decimal value the float stands for, so `273.15`
/// (stored as 273.1499999...) still rounds up to `273.2`.
pub fn round1(value: f64) -> f64 {
    const TIE_EPSILON: f64 = 1e-9;

    let scaled = value * 10.0;
    let whole = scaled.trunc();
    let rounded = if ((scaled - whole).abs() - 0.5).abs() < TIE_EPSILON {
        whole + scaled.signum()
    } else {
        scaled.round()
    };

    // `+ 0.0` turns a negative zero into a positive one.
    rounded / 10.0 + 0.0
}
