// Error taxonomy shared by the service client, the dispatcher and the workflow

use crate::selection::SelectionField;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppError {
    /// The analysis service could not be reached or the connection broke.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-2xx response carrying the server's detail message.
    #[error("Service error ({status}): {detail}")]
    Service { status: u16, detail: String },

    /// 2xx response whose body reports a domain problem (`{"error": ...}`).
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("No dataset loaded")]
    NoDataset,

    #[error("Dataset has no columns")]
    EmptyDataset,

    #[error("Column '{column}' selected for {field} is not in the current dataset")]
    UnknownColumn { field: SelectionField, column: String },

    #[error("Unsupported file type: {0}")]
    UnsupportedFile(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Another request is still in flight")]
    Busy,
}

impl AppError {
    /// Text shown to the user. Server-supplied details win over transport wording.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Service { detail, .. } => detail.clone(),
            AppError::Validation(message) => message.clone(),
            AppError::Transport(message) => message.clone(),
            other => other.to_string(),
        }
    }

    /// True when the failure text came from the analysis service itself.
    pub fn is_service_reported(&self) -> bool {
        matches!(self, AppError::Service { .. } | AppError::Validation(_))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decode(err.to_string())
        } else {
            AppError::Transport(err.to_string())
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(err.to_string())
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_detail() {
        let err = AppError::Service {
            status: 400,
            detail: "Unsupported file type: .exe".to_string(),
        };
        assert_eq!(err.user_message(), "Unsupported file type: .exe");
        assert!(err.is_service_reported());

        let err = AppError::Transport("connection refused".to_string());
        assert_eq!(err.user_message(), "connection refused");
        assert!(!err.is_service_reported());
    }

    #[test]
    fn test_unknown_column_message() {
        let err = AppError::UnknownColumn {
            field: SelectionField::Sort,
            column: "price".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Column 'price' selected for sort column is not in the current dataset"
        );
    }
}
