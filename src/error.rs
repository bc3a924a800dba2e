use thiserror::Error;

#[derive(Error, Debug)]
pub enum AccessError {
    #[error("Invalid {name}: must be an object")]
    NotObject { name: String },

    #[error("Unknown principal type: a users or roles condition needs a principal")]
    UnknownPrincipalType,

    #[error("Unknown origin type: an ips condition needs an origin")]
    UnknownOriginType,

    #[error("Unknown predicate: {0}")]
    UnknownPredicate(String),

    /// Raised by a custom predicate; passed through untouched.
    #[error(transparent)]
    Predicate(anyhow::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, AccessError>;
