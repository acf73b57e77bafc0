pub mod app;
pub mod error;
pub mod meteostat;
pub mod report;
pub mod style;

pub use error::{Error, Result};
