//! # Error Module
//!
//! Failure modes of the external collaborators (RPC node, object storage, price
//! API, wallet). The state store itself never fails, so nothing in here is ever
//! produced by a reducer transition.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("object {0} not found or has no content")]
    ObjectNotFound(String),

    #[error("malformed on-chain object: {0}")]
    MalformedObject(String),

    #[error("invalid blob id: {0}")]
    InvalidBlobId(String),

    #[error("blob {0} not found")]
    BlobNotFound(String),

    #[error("wallet not connected")]
    WalletNotConnected,

    #[error("transaction signing is not available for this wallet")]
    SigningUnavailable,

    #[error("deposit of {amount} is below the minimum of {minimum} base units")]
    DepositBelowMinimum { amount: u64, minimum: u64 },

    #[error("season {season} does not accept this operation while {status}")]
    SeasonClosed { season: u64, status: String },

    #[error("unknown vault: {0}")]
    UnknownVault(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, ArenaError>;
