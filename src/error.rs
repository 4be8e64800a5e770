use std::path::PathBuf;

/// Result type alias for the pipeline
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the pipeline
#[derive(Debug)]
pub enum Error {
    IoError(std::io::Error),
    MalformedRawSchema(String),
    Config { path: PathBuf, message: String },
    InvalidExampleBody {
        path: String,
        method: String,
        status: String,
        message: String,
    },
    IncompleteDocument(String),
    SerializationError(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "IO error: {}", e),
            Error::MalformedRawSchema(msg) => write!(f, "Malformed raw schema: {}", msg),
            Error::Config { path, message } => {
                write!(f, "Invalid configuration in {}: {}", path.display(), message)
            }
            Error::InvalidExampleBody {
                path,
                method,
                status,
                message,
            } => write!(
                f,
                "Captured {} {} ({}) declares JSON but the body does not parse: {}",
                method.to_uppercase(),
                path,
                status,
                message
            ),
            Error::IncompleteDocument(msg) => write!(f, "Incomplete document: {}", msg),
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(format!("JSON serialization error: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::SerializationError(format!("YAML serialization error: {}", err))
    }
}
