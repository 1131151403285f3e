//! Multisig proposals on `eosio.msig`.
//!
//! A proposal wraps a list of actions into a pseudo-transaction that only
//! runs once enough of the requested authorizations have approved it:
//!
//! ```text
//! Proposed -> (approve | unapprove)* -> Executed | Cancelled
//! ```
//!
//! Threshold and expiration rules are enforced by the contract, not here.

use crate::action::{AuthorizedAction, EncodedAction};
use crate::config::Contracts;
use crate::error::{Error, Result};
use crate::name::{Name, NAME_ALPHABET, MAX_NAME_LEN};
use crate::permission::Authorization;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

/// `time_point_sec` has whole-second precision.
pub const EXPIRATION_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn format_expiration(expiration: &DateTime<Utc>) -> String {
    expiration.format(EXPIRATION_FORMAT).to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Propose {
    pub proposer: Name,
    pub proposal_name: Name,
    pub requested: Vec<Authorization>,
    pub expiration: DateTime<Utc>,
    pub actions: Vec<AuthorizedAction>,
}

/// The transaction a proposal carries. Header fields are zero because the
/// contract fills them in at execution time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedTransaction {
    pub expiration: String,
    pub ref_block_num: u16,
    pub ref_block_prefix: u32,
    pub max_net_usage_words: u32,
    pub max_cpu_usage_ms: u8,
    pub delay_sec: u32,
    pub context_free_actions: Vec<EncodedAction>,
    pub actions: Vec<EncodedAction>,
    pub transaction_extensions: Vec<Value>,
}

impl ProposedTransaction {
    pub fn new(expiration: &DateTime<Utc>, actions: Vec<EncodedAction>) -> Self {
        Self {
            expiration: format_expiration(expiration),
            ref_block_num: 0,
            ref_block_prefix: 0,
            max_net_usage_words: 0,
            max_cpu_usage_ms: 0,
            delay_sec: 0,
            context_free_actions: Vec::new(),
            actions,
            transaction_extensions: Vec::new(),
        }
    }
}

impl Propose {
    pub fn transaction(&self, contracts: &Contracts) -> ProposedTransaction {
        let actions = self
            .actions
            .iter()
            .map(|action| action.encode(contracts))
            .collect();
        ProposedTransaction::new(&self.expiration, actions)
    }

    pub(crate) fn payload(&self, contracts: &Contracts) -> Value {
        json!({
            "proposer": self.proposer,
            "proposal_name": self.proposal_name,
            "requested": self.requested,
            "trx": self.transaction(contracts),
        })
    }
}

/// Payload shared by `approve` and `unapprove`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalVote {
    pub proposer: Name,
    pub proposal_name: Name,
    pub level: Authorization,
}

impl ProposalVote {
    pub(crate) fn payload(&self) -> Value {
        json!({
            "proposer": self.proposer,
            "proposal_name": self.proposal_name,
            "level": self.level,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Execute {
    pub proposer: Name,
    pub proposal_name: Name,
    pub executer: Name,
}

impl Execute {
    pub(crate) fn payload(&self) -> Value {
        json!({
            "proposer": self.proposer,
            "proposal_name": self.proposal_name,
            "executer": self.executer,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cancel {
    pub proposer: Name,
    pub proposal_name: Name,
    pub canceler: Name,
}

impl Cancel {
    pub(crate) fn payload(&self) -> Value {
        json!({
            "proposer": self.proposer,
            "proposal_name": self.proposal_name,
            "canceler": self.canceler,
        })
    }
}

/// Deterministic 12-character proposal name for `proposer` and `seed`.
///
/// The first character of the alphabet (`.`) is never used, so the result is
/// always a full-length valid name.
pub fn derive_proposal_name(proposer: &Name, seed: &[u8]) -> Name {
    let mut hasher = Sha256::new();
    hasher.update(proposer.as_str().as_bytes());
    hasher.update(seed);
    let digest = hasher.finalize();

    let usable = &NAME_ALPHABET[1..];
    let name: String = digest
        .iter()
        .take(MAX_NAME_LEN)
        .map(|byte| usable[usize::from(*byte) % usable.len()] as char)
        .collect();

    Name::new_unchecked(name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalStatus {
    Proposed,
    Executed,
    Cancelled,
}

impl ProposalStatus {
    fn as_str(&self) -> &'static str {
        match self {
            ProposalStatus::Proposed => "proposed",
            ProposalStatus::Executed => "executed",
            ProposalStatus::Cancelled => "cancelled",
        }
    }
}

/// Client-side view of a proposal's lifecycle.
#[derive(Debug, Clone)]
pub struct ProposalState {
    proposal_name: Name,
    status: ProposalStatus,
    approvals: BTreeSet<Authorization>,
}

impl ProposalState {
    pub fn new(proposal_name: Name) -> Self {
        Self {
            proposal_name,
            status: ProposalStatus::Proposed,
            approvals: BTreeSet::new(),
        }
    }

    /// Rebuilds the state of an open proposal from its `approvals2` row.
    pub fn from_approvals(row: &ProposalApprovals) -> Self {
        Self {
            proposal_name: row.proposal_name.clone(),
            status: ProposalStatus::Proposed,
            approvals: row.approvers().into_iter().collect(),
        }
    }

    pub fn proposal_name(&self) -> &Name {
        &self.proposal_name
    }

    pub fn status(&self) -> ProposalStatus {
        self.status
    }

    pub fn approvals(&self) -> Vec<Authorization> {
        self.approvals.iter().cloned().collect()
    }

    fn ensure_open(&self) -> Result<()> {
        match self.status {
            ProposalStatus::Proposed => Ok(()),
            closed => Err(Error::ProposalClosed(
                self.proposal_name.to_string(),
                closed.as_str(),
            )),
        }
    }

    pub fn approve(&mut self, level: Authorization) -> Result<()> {
        self.ensure_open()?;
        self.approvals.insert(level);
        Ok(())
    }

    pub fn unapprove(&mut self, level: &Authorization) -> Result<()> {
        self.ensure_open()?;
        self.approvals.remove(level);
        Ok(())
    }

    pub fn execute(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.status = ProposalStatus::Executed;
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.status = ProposalStatus::Cancelled;
        Ok(())
    }
}

/// Row of the `proposal` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRow {
    pub proposal_name: Name,
    pub packed_transaction: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    pub level: Authorization,
    pub time: String,
}

/// Row of the `approvals2` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalApprovals {
    #[serde(default)]
    pub version: u8,
    pub proposal_name: Name,
    pub requested_approvals: Vec<Approval>,
    pub provided_approvals: Vec<Approval>,
}

impl ProposalApprovals {
    pub fn approvers(&self) -> Vec<Authorization> {
        self.provided_approvals
            .iter()
            .map(|approval| approval.level.clone())
            .collect()
    }
}
