//! Messages exchanged with the signing bridge that pushes transactions.

use crate::action::EncodedAction;
use crate::error::{Error, Result};
use crate::failure::extract_failure;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const EOS_TRANSACTION: &str = "eosTransaction";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRequest {
    pub name: &'static str,
    pub actions: Vec<EncodedAction>,
}

impl TransactionRequest {
    pub fn new(actions: Vec<EncodedAction>) -> Self {
        Self {
            name: EOS_TRANSACTION,
            actions,
        }
    }
}

/// What the bridge reports back once the transaction was pushed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BridgeResponse {
    Success {
        #[serde(rename = "transactionId")]
        transaction_id: String,
    },
    Failure {
        error: Value,
    },
}

impl BridgeResponse {
    /// The transaction id, or the chain's rejection reason.
    pub fn into_result(self) -> Result<String> {
        match self {
            BridgeResponse::Success { transaction_id } => Ok(transaction_id),
            // the bridge forwards the chain error either as text or as a document
            BridgeResponse::Failure { error } => {
                let raw = match error {
                    Value::String(text) => text,
                    document => document.to_string(),
                };
                Err(Error::ChainRejected(extract_failure(&raw)))
            }
        }
    }
}
