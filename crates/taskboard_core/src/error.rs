use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Unified error type for taskboard operations
#[derive(Debug, Error)]
pub enum BoardError {
    // Store outcomes that drive specific UI flows
    #[error("Board not found for customer '{0}'")]
    NotFound(String),

    #[error("Board for customer '{0}' was modified by someone else")]
    PreconditionFailed(String),

    #[error("Incorrect password for customer '{0}'")]
    IncorrectCredential(String),

    // Snapshot decoding errors
    #[error("Invalid board data: {0}")]
    MalformedData(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Board content is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    // Transport errors
    #[error("File store request failed during {operation}: {message}")]
    Transport {
        operation: StoreOperation,
        message: String,
    },

    // Config errors
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for taskboard operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Board store operation a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StoreOperation {
    List,
    Load,
    FetchLatest,
    Save,
    Delete,
}

impl StoreOperation {
    /// Message shown when the store fails during this operation.
    pub fn failure_message(self) -> &'static str {
        match self {
            StoreOperation::List => "Failed to load the customer list. Check configuration.",
            StoreOperation::Load => "Failed to load data. Check configuration.",
            StoreOperation::FetchLatest => "Failed to fetch current data from the store",
            StoreOperation::Save => "Failed to save data to the store",
            StoreOperation::Delete => "Failed to delete customer data from the store",
        }
    }
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StoreOperation::List => "list",
            StoreOperation::Load => "load",
            StoreOperation::FetchLatest => "fetch latest",
            StoreOperation::Save => "save",
            StoreOperation::Delete => "delete",
        })
    }
}

impl BoardError {
    /// Build a board error from a file-store failure on the board of `customer_id`.
    pub fn from_store(err: StoreError, customer_id: &str, operation: StoreOperation) -> Self {
        match err {
            StoreError::NotFound => BoardError::NotFound(customer_id.to_string()),
            StoreError::PreconditionFailed => {
                BoardError::PreconditionFailed(customer_id.to_string())
            }
            StoreError::Transport(message) => BoardError::Transport { operation, message },
        }
    }

    /// NotFound and PreconditionFailed are expected outcomes the caller handles
    /// with a dedicated flow (create a new board, show the conflict dialog).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BoardError::NotFound(_) | BoardError::PreconditionFailed(_)
        )
    }

    /// Human-readable message suitable for showing to the person at the board.
    pub fn user_message(&self) -> String {
        match self {
            BoardError::NotFound(_) => {
                "Account not found. Please check your username and try again.".to_string()
            }
            BoardError::PreconditionFailed(_) => {
                "Someone else has modified this data. Please review the changes.".to_string()
            }
            BoardError::IncorrectCredential(_) => "Incorrect password".to_string(),
            BoardError::Transport { operation, .. } => operation.failure_message().to_string(),
            BoardError::MalformedData(_)
            | BoardError::Json(_)
            | BoardError::Base64(_)
            | BoardError::Utf8(_) => "Failed to load data. Check configuration.".to_string(),
            other => other.to_string(),
        }
    }

    /// Convert to a serializable representation for IPC
    pub fn to_serializable(&self) -> SerializableError {
        SerializableError::from(self)
    }
}

/// A serializable representation of BoardError for the browser front end
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializableError {
    /// Error kind/variant name
    pub kind: String,
    /// Human-readable error message
    pub message: String,
    /// Customer the error relates to (if applicable)
    pub customer_id: Option<String>,
}

impl From<&BoardError> for SerializableError {
    fn from(err: &BoardError) -> Self {
        let kind = match err {
            BoardError::NotFound(_) => "NotFound",
            BoardError::PreconditionFailed(_) => "PreconditionFailed",
            BoardError::IncorrectCredential(_) => "IncorrectCredential",
            BoardError::MalformedData(_) => "MalformedData",
            BoardError::Json(_) => "Json",
            BoardError::Base64(_) => "Base64",
            BoardError::Utf8(_) => "Utf8",
            BoardError::Transport { .. } => "Transport",
            BoardError::ConfigParse(_) => "ConfigParse",
            BoardError::ConfigSerialize(_) => "ConfigSerialize",
            BoardError::NoConfigDir => "NoConfigDir",
            BoardError::Io(_) => "Io",
        }
        .to_string();

        let customer_id = match err {
            BoardError::NotFound(id)
            | BoardError::PreconditionFailed(id)
            | BoardError::IncorrectCredential(id)
                if !id.is_empty() =>
            {
                Some(id.clone())
            }
            _ => None,
        };

        Self {
            kind,
            message: err.user_message(),
            customer_id,
        }
    }
}

impl From<BoardError> for SerializableError {
    fn from(err: BoardError) -> Self {
        SerializableError::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_mapping() {
        let err = BoardError::from_store(StoreError::NotFound, "acme", StoreOperation::Load);
        assert!(matches!(err, BoardError::NotFound(ref id) if id == "acme"));
        assert!(err.is_recoverable());

        let err =
            BoardError::from_store(StoreError::PreconditionFailed, "acme", StoreOperation::Save);
        assert!(matches!(err, BoardError::PreconditionFailed(_)));
        assert!(err.is_recoverable());

        let err = BoardError::from_store(
            StoreError::Transport("boom".into()),
            "acme",
            StoreOperation::Save,
        );
        assert!(matches!(
            err,
            BoardError::Transport { operation: StoreOperation::Save, ref message } if message == "boom"
        ));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            BoardError::IncorrectCredential("acme".into()).user_message(),
            "Incorrect password"
        );
        assert_eq!(
            BoardError::MalformedData("no columns".into()).user_message(),
            "Failed to load data. Check configuration."
        );
    }

    #[test]
    fn test_transport_message_names_the_operation() {
        let failure = |operation| BoardError::Transport {
            operation,
            message: "503 Service Unavailable".into(),
        };

        assert_eq!(
            failure(StoreOperation::Load).user_message(),
            "Failed to load data. Check configuration."
        );
        assert_eq!(
            failure(StoreOperation::Save).user_message(),
            "Failed to save data to the store"
        );
        assert_eq!(
            failure(StoreOperation::Delete).user_message(),
            "Failed to delete customer data from the store"
        );
        assert_eq!(
            failure(StoreOperation::List).user_message(),
            "Failed to load the customer list. Check configuration."
        );
        assert!(failure(StoreOperation::FetchLatest)
            .to_string()
            .contains("during fetch latest"));
    }

    #[test]
    fn test_serializable_error() {
        let err = BoardError::NotFound("acme".into());
        let serializable = err.to_serializable();
        assert_eq!(serializable.kind, "NotFound");
        assert_eq!(serializable.customer_id.as_deref(), Some("acme"));

        let serializable = SerializableError::from(BoardError::Transport {
            operation: StoreOperation::List,
            message: "down".into(),
        });
        assert_eq!(serializable.kind, "Transport");
        assert!(serializable.customer_id.is_none());
    }
}
