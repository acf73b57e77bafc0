use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Station directory decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Daily data decode error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Invalid input! Please enter numeric latitude and longitude values.")]
    InvalidCoordinate,

    #[error("No weather stations found near the given coordinates! Please try again.")]
    NoStations,
}
