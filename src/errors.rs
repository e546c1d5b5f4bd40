use thiserror::Error;

#[derive(Debug, Error)]
pub enum MixpanelError {
    #[error("invalid client configuration: {0}")]
    Configuration(String),

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Mixpanel server error: {body}")]
    RemoteRejection { body: String },

    #[error("failed to encode payload: {0}")]
    Encoding(#[from] serde_json::Error),
}
