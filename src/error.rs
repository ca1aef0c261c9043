use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("BSON encoding error: {0}")]
    BsonEncode(#[from] mongodb::bson::ser::Error),

    #[error("BSON decoding error: {0}")]
    BsonDecode(#[from] mongodb::bson::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A computation had not enough data, e.g. a tour without altitude
    #[error("Missing data: {0}")]
    MissingData(&'static str),
}
