//! Error type shared by every module of the library.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Value objects
    #[error("Invalid name '{value}': {reason}")]
    InvalidName { value: String, reason: &'static str },

    #[error("Invalid symbol '{0}'")]
    InvalidSymbol(String),

    #[error("Invalid asset '{0}'")]
    InvalidAsset(String),

    #[error("Invalid public key '{0}'")]
    InvalidPublicKey(String),

    #[error("Invalid private key")]
    InvalidPrivateKey,

    // Permissions
    #[error("Permission '{0}' is not one of owner/active")]
    UnknownPermission(String),

    #[error("The root permission cannot sign an action")]
    RootPermissionNotSignable,

    #[error("The root permission has no authority to update")]
    RootAuthorityNotUpdatable,

    #[error("Authority keys mix legacy EOS and PUB_K1_ formats")]
    MixedKeyFormats,

    #[error("Account response has no '{0}' permission")]
    MissingPermission(&'static str),

    // Multisig
    #[error("Proposal '{0}' is already {1}")]
    ProposalClosed(String, &'static str),

    // Table reads
    #[error("Table '{table}' in scope '{scope}' returned no rows")]
    EmptyTable { table: String, scope: String },

    // Chain and transport
    #[error("Rejected by chain: {0}")]
    ChainRejected(String),

    #[error("Decoding failed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}: {body}")]
    Http {
        url: String,
        status: u16,
        body: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
