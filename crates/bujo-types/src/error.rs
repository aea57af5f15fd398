use std::fmt;

/// Result type for bujo-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Validation errors for configuration-supplied mapping tables
#[derive(Debug)]
pub enum Error {
    /// Signifier key is not a single character
    InvalidSignifierChar(String),

    /// Signifier name not recognized
    UnknownSignifier(String),

    /// Two characters mapped to the same signifier
    DuplicateSignifier { name: String, chars: (char, char) },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidSignifierChar(key) => {
                write!(f, "Signifier key '{}' must be a single character", key)
            }
            Error::UnknownSignifier(name) => write!(f, "Unknown signifier name '{}'", name),
            Error::DuplicateSignifier { name, chars } => write!(
                f,
                "Signifier '{}' mapped to both '{}' and '{}'",
                name, chars.0, chars.1
            ),
        }
    }
}

impl std::error::Error for Error {}
