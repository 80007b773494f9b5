use thiserror::Error;

/// Errors returned by premint operations.
#[derive(Debug, Error)]
pub enum PremintError {
    #[error("invalid premint config version: {0}")]
    InvalidVersion(String),

    #[error("unsupported mint type: {0}")]
    UnsupportedMintType(String),

    #[error("mint inactive: {0}")]
    InactiveMint(String),

    #[error("mint error: {0}")]
    MintError(String),

    #[error("signature error: {0}")]
    SignatureError(String),

    #[error("chain error: {0}")]
    ChainError(String),

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("cost overflow: {0}")]
    CostOverflow(String),

    #[error("serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}
