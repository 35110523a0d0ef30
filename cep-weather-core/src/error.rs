use thiserror::Error;

/// Request-terminal failures of a postal code lookup.
///
/// The `Display` text is the exact message handed back to callers. Upstream
/// details are logged where the failure is collapsed into one of these
/// categories and never travel inside the error itself.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupError {
    #[error("invalid zipcode - format eg.: 00111222")]
    InvalidInput,

    #[error("can not find zipcode")]
    LocalityNotFound,

    #[error("can not find weather")]
    WeatherUnavailable,
}

impl LookupError {
    /// HTTP status code this failure maps to at the service boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            LookupError::InvalidInput => 422,
            LookupError::LocalityNotFound => 404,
            LookupError::WeatherUnavailable => 500,
        }
    }
}
