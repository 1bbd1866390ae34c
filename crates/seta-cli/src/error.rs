use seta_core::{ClassifierError, DateError, HistoryError};

#[derive(Debug, thiserror::Error)]
pub enum SetaError {
    #[error("fetch {endpoint}: {message}")]
    Fetch { endpoint: String, message: String },
    #[error("decode {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
    #[error("config: {0}")]
    Config(String),
    #[error(transparent)]
    Date(#[from] DateError),
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

impl SetaError {
    pub(crate) fn fetch(endpoint: &str, message: impl ToString) -> Self {
        SetaError::Fetch {
            endpoint: endpoint.to_string(),
            message: message.to_string(),
        }
    }

    pub(crate) fn decode(endpoint: &str, message: impl ToString) -> Self {
        SetaError::Decode {
            endpoint: endpoint.to_string(),
            message: message.to_string(),
        }
    }
}
