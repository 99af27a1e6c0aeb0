use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Decode error at byte {position}: {message}")]
    Decode { position: usize, message: String },

    #[error("Invalid string marker {marker:#04x} at byte {position}")]
    InvalidStringMarker { marker: u8, position: usize },

    #[error("Config parse error: {0}")]
    ConfigParseError(String),

    #[error("A generation job is already running")]
    GeneratorBusy,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    pub(crate) fn decode(position: usize, message: impl Into<String>) -> Self {
        Error::Decode {
            position,
            message: message.into(),
        }
    }

    /// Whether the error came from a malformed or truncated binary stream.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            Error::Decode { .. } | Error::InvalidStringMarker { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_message() {
        let e = Error::decode(12, "unexpected end of stream");
        assert_eq!(
            e.to_string(),
            "Decode error at byte 12: unexpected end of stream"
        );
        assert!(e.is_decode());
    }

    #[test]
    fn test_io_error_is_not_decode() {
        let e: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "scores.db").into();
        assert!(!e.is_decode());
    }
}
