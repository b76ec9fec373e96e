//! Crate error type

/// Result alias that carries the crate [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building a level. The simulation tick itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A detector band does not fit the spectrum it will read from.
    #[error("{name} band {first}..={last} does not fit a spectrum of {len} bins")]
    InvalidBand {
        name: &'static str,
        first: usize,
        last: usize,
        len: usize,
    },
    /// A settings value is out of range.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    /// Settings JSON could not be parsed.
    #[error("failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn settings<T: Into<String>>(msg: T) -> Self {
        Self::InvalidSettings(msg.into())
    }
}
