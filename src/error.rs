use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("No session specified. Either pass --url or set MYSQL_URL to connect to a database")]
    SessionUnavailable,

    #[error("Database error: {message}")]
    Database { code: Option<u16>, message: String },

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Unknown schema: {0}")]
    UnknownSchema(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn database(message: impl Into<String>) -> Self {
        Error::Database {
            code: None,
            message: message.into(),
        }
    }

    /// Server error code, when the failure came back from the server itself.
    pub fn server_code(&self) -> Option<u16> {
        match self {
            Error::Database { code, .. } => *code,
            _ => None,
        }
    }
}

impl From<mysql::Error> for Error {
    fn from(err: mysql::Error) -> Self {
        match err {
            mysql::Error::MySqlError(e) => Error::Database {
                code: Some(e.code),
                message: format!("{} ({}): {}", e.code, e.state, e.message),
            },
            other => Error::database(other.to_string()),
        }
    }
}

impl From<mysql::UrlError> for Error {
    fn from(err: mysql::UrlError) -> Self {
        Error::database(format!("invalid connection url: {err}"))
    }
}
