//! Typed actions and their encoding into the chain's action JSON.
//!
//! Encoding is total: every well-typed [`Action`] produces an
//! [`EncodedAction`]. Rejections only happen later, on chain.

use crate::config::Contracts;
use crate::error::{Error, Result};
use crate::multisig::{Cancel, Execute, ProposalVote, Propose};
use crate::name::{Asset, Name, Symbol};
use crate::permission::{AccountWeight, Authorization, KeyWeight, PermissionType};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Community(CommunityAction),
    MultiSig(MultiSigAction),
    Eos(EosAction),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunityAction {
    CreateObjective(CreateObjective),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiSigAction {
    Propose(Propose),
    Approve(ProposalVote),
    Unapprove(ProposalVote),
    Execute(Execute),
    Cancel(Cancel),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EosAction {
    UpdateAuth(UpdateAuth),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateObjective {
    pub symbol: Symbol,
    pub description: String,
    pub creator: Name,
}

/// Replaces the authority of one permission of `account`.
///
/// Only `owner` and `active` can be updated, and all keys must share one
/// text format so that sorting them by string matches the chain's order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateAuth {
    account: Name,
    permission: PermissionType,
    threshold: u32,
    accounts: Vec<AccountWeight>,
    keys: Vec<KeyWeight>,
}

#[derive(Deserialize)]
struct RawUpdateAuth {
    account: Name,
    permission: PermissionType,
    threshold: u32,
    accounts: Vec<AccountWeight>,
    #[serde(default)]
    keys: Vec<KeyWeight>,
}

impl UpdateAuth {
    pub fn new(
        account: Name,
        permission: PermissionType,
        threshold: u32,
        accounts: Vec<AccountWeight>,
        keys: Vec<KeyWeight>,
    ) -> Result<Self> {
        if permission == PermissionType::Root {
            return Err(Error::RootAuthorityNotUpdatable);
        }
        let legacy = keys.iter().filter(|entry| entry.key.is_legacy()).count();
        if legacy != 0 && legacy != keys.len() {
            return Err(Error::MixedKeyFormats);
        }

        Ok(Self {
            account,
            permission,
            threshold,
            accounts,
            keys,
        })
    }

    /// The chain rejects authorities whose lists are out of order.
    fn sorted_accounts(&self) -> Vec<AccountWeight> {
        let mut accounts = self.accounts.clone();
        accounts.sort_by(|a, b| {
            let a = &a.level;
            let b = &b.level;
            (a.actor.as_str(), a.permission.as_str()).cmp(&(b.actor.as_str(), b.permission.as_str()))
        });
        accounts
    }

    // Plain string order; `new` guarantees a single key format.
    fn sorted_keys(&self) -> Vec<KeyWeight> {
        let mut keys = self.keys.clone();
        keys.sort_by(|a, b| a.key.as_str().cmp(b.key.as_str()));
        keys
    }

    fn payload(&self) -> Value {
        let parent = self.permission.parent().unwrap_or(PermissionType::Root);
        json!({
            "account": self.account,
            "permission": self.permission,
            "parent": parent,
            "auth": {
                "threshold": self.threshold,
                "keys": self.sorted_keys(),
                "accounts": self.sorted_accounts(),
                "waits": [],
            },
        })
    }
}

impl<'de> Deserialize<'de> for UpdateAuth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = RawUpdateAuth::deserialize(deserializer)?;
        Self::new(raw.account, raw.permission, raw.threshold, raw.accounts, raw.keys)
            .map_err(serde::de::Error::custom)
    }
}

/// One action as the chain expects it inside a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedAction {
    pub account: Name,
    pub name: Name,
    pub authorization: Vec<Authorization>,
    pub data: Value,
}

/// An action paired with the authorization that signs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizedAction {
    pub action: Action,
    pub authorization: Authorization,
}

impl AuthorizedAction {
    pub fn new(action: Action, authorization: Authorization) -> Self {
        Self {
            action,
            authorization,
        }
    }

    pub fn encode(&self, contracts: &Contracts) -> EncodedAction {
        encode_action(&self.action, &self.authorization, contracts)
    }
}

impl Action {
    /// Contract account that implements this action.
    pub fn contract<'a>(&self, contracts: &'a Contracts) -> &'a Name {
        match self {
            Action::Community(_) => &contracts.community,
            Action::MultiSig(_) => &contracts.msig,
            Action::Eos(_) => &contracts.system,
        }
    }

    pub fn action_name(&self) -> &'static str {
        match self {
            Action::Community(CommunityAction::CreateObjective(_)) => "newobjective",
            Action::MultiSig(MultiSigAction::Propose(_)) => "propose",
            Action::MultiSig(MultiSigAction::Approve(_)) => "approve",
            Action::MultiSig(MultiSigAction::Unapprove(_)) => "unapprove",
            Action::MultiSig(MultiSigAction::Execute(_)) => "exec",
            Action::MultiSig(MultiSigAction::Cancel(_)) => "cancel",
            Action::Eos(EosAction::UpdateAuth(_)) => "updateauth",
        }
    }

    /// The action's `data` object, field for field as the contract ABI names it.
    pub fn payload(&self, contracts: &Contracts) -> Value {
        match self {
            Action::Community(CommunityAction::CreateObjective(objective)) => json!({
                // amount is ignored by the contract, only the symbol matters
                "cmm_asset": Asset::new(0.0, objective.symbol.clone()),
                "description": objective.description,
                "creator": objective.creator,
            }),
            Action::MultiSig(MultiSigAction::Propose(propose)) => propose.payload(contracts),
            Action::MultiSig(MultiSigAction::Approve(vote))
            | Action::MultiSig(MultiSigAction::Unapprove(vote)) => vote.payload(),
            Action::MultiSig(MultiSigAction::Execute(execute)) => execute.payload(),
            Action::MultiSig(MultiSigAction::Cancel(cancel)) => cancel.payload(),
            Action::Eos(EosAction::UpdateAuth(update)) => update.payload(),
        }
    }
}

pub fn encode_action(
    action: &Action,
    authorization: &Authorization,
    contracts: &Contracts,
) -> EncodedAction {
    let account = action.contract(contracts).clone();
    let name = Name::new_unchecked(action.action_name().to_string());
    debug!(contract = %account, action = %name, signer = %authorization, "encoding action");

    EncodedAction {
        data: action.payload(contracts),
        account,
        name,
        authorization: vec![authorization.clone()],
    }
}
