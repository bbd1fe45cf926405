// SPDX-License-Identifier: GPL-3.0-or-later
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    /// An environment signal or color value carried out-of-range data.
    Validation(String),

    /// Local settings could not be read or written.
    Settings(String),

    /// The instance sync layer failed (connect, encode, timeout, ...).
    Sync(String),

    /// Generic I/O failure.
    Io(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Validation(e) => write!(f, "Validation Error: {}", e),
            Error::Settings(e) => write!(f, "Settings Error: {}", e),
            Error::Sync(e) => write!(f, "Sync Error: {}", e),
            Error::Io(e) => write!(f, "I/O Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Settings(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Settings(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Sync(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
