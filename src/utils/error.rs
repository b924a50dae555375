use thiserror::Error;

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("API request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Unknown location '{location}', known locations: {known:?}")]
    UnknownLocation { location: String, known: Vec<String> },

    #[error("Vendor response shape mismatch ({vendor}): {reason}")]
    ShapeMismatch { vendor: &'static str, reason: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required config field: {field}")]
    MissingConfigError { field: String },
}

pub type Result<T> = std::result::Result<T, AggregateError>;
