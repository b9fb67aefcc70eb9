use thiserror::Error;

/// Plugin-level error categories. Only startup problems are fatal; every
/// runtime failure is logged and survived.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("missing required launch argument {0}")]
    MissingArgument(&'static str),

    #[error("invalid port value '{0}'")]
    InvalidPort(String),

    #[error(transparent)]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}
