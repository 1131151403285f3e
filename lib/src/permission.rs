//! Permission hierarchy and account permission decoding.

use crate::error::{Error, Result};
use crate::name::{Name, PermissionName, PublicKey};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two signable permission levels plus the implicit root above them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PermissionType {
    Root,
    Owner,
    Active,
}

impl PermissionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionType::Root => "",
            PermissionType::Owner => "owner",
            PermissionType::Active => "active",
        }
    }

    pub fn parent(&self) -> Option<PermissionType> {
        match self {
            PermissionType::Root => None,
            PermissionType::Owner => Some(PermissionType::Root),
            PermissionType::Active => Some(PermissionType::Owner),
        }
    }

    /// True when a signature at this level also satisfies `required`,
    /// i.e. `self` is `required` or one of its ancestors.
    pub fn satisfies(&self, required: PermissionType) -> bool {
        let mut current = Some(required);
        while let Some(level) = current {
            if level == *self {
                return true;
            }
            current = level.parent();
        }
        false
    }
}

impl FromStr for PermissionType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "" => Ok(PermissionType::Root),
            "owner" => Ok(PermissionType::Owner),
            "active" => Ok(PermissionType::Active),
            other => Err(Error::UnknownPermission(other.to_string())),
        }
    }
}

impl TryFrom<String> for PermissionType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl TryFrom<&PermissionName> for PermissionType {
    type Error = Error;

    fn try_from(name: &PermissionName) -> Result<Self> {
        name.as_str().parse()
    }
}

impl From<PermissionType> for String {
    fn from(permission: PermissionType) -> Self {
        permission.as_str().to_string()
    }
}

impl fmt::Display for PermissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Deserialize)]
struct RawAuthorization {
    actor: Name,
    permission: PermissionType,
}

/// An `actor@permission` pair that signs an action.
///
/// Only `owner` and `active` are accepted; the root level has no keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Authorization {
    actor: Name,
    permission: PermissionType,
}

impl Authorization {
    pub fn new(actor: Name, permission: PermissionType) -> Result<Self> {
        if permission == PermissionType::Root {
            return Err(Error::RootPermissionNotSignable);
        }
        Ok(Self { actor, permission })
    }

    pub fn actor(&self) -> &Name {
        &self.actor
    }

    pub fn permission(&self) -> PermissionType {
        self.permission
    }
}

impl<'de> Deserialize<'de> for Authorization {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = RawAuthorization::deserialize(deserializer)?;
        Self::new(raw.actor, raw.permission).map_err(serde::de::Error::custom)
    }
}

/// Parses `actor@permission`; a bare actor means `actor@active`.
impl FromStr for Authorization {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let (actor, permission) = value.split_once('@').unwrap_or((value, "active"));
        Self::new(actor.parse()?, permission.parse()?)
    }
}

impl fmt::Display for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.actor, self.permission)
    }
}

/// `actor@permission` as listed inside an authority. Unlike
/// [`Authorization`] the permission can be any name, e.g. `eosio.code`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PermissionLevel {
    pub actor: Name,
    pub permission: PermissionName,
}

impl From<Authorization> for PermissionLevel {
    fn from(authorization: Authorization) -> Self {
        Self {
            permission: PermissionName::new_unchecked(authorization.permission.as_str().to_string()),
            actor: authorization.actor,
        }
    }
}

/// Parses `actor@permission`; a bare actor means `actor@active`.
impl FromStr for PermissionLevel {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let (actor, permission) = value.split_once('@').unwrap_or((value, "active"));
        Ok(Self {
            actor: actor.parse()?,
            permission: permission.parse()?,
        })
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.actor, self.permission)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountWeight {
    #[serde(rename = "permission")]
    pub level: PermissionLevel,
    pub weight: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyWeight {
    pub key: PublicKey,
    pub weight: u16,
}

/// Required authority of one permission level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub threshold: u32,
    pub accounts: Vec<AccountWeight>,
}

impl Permission {
    /// Summed weight of the listed accounts that `approvers` cover.
    /// Entries at custom levels such as `eosio.code` are never covered.
    pub fn approval_weight(&self, approvers: &[Authorization]) -> u32 {
        self.accounts
            .iter()
            .filter(|entry| {
                let Ok(required) = PermissionType::try_from(&entry.level.permission) else {
                    return false;
                };
                approvers.iter().any(|approver| {
                    approver.actor == entry.level.actor && approver.permission.satisfies(required)
                })
            })
            .map(|entry| u32::from(entry.weight))
            .sum()
    }

    /// Advisory check only; the chain decides whether a proposal executes.
    pub fn is_satisfied_by(&self, approvers: &[Authorization]) -> bool {
        self.approval_weight(approvers) >= self.threshold
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permissions {
    pub owner: Permission,
    pub active: Permission,
}

#[derive(Deserialize)]
struct AccountResponse {
    permissions: Vec<NamedPermission>,
}

#[derive(Deserialize)]
struct NamedPermission {
    perm_name: PermissionName,
    required_auth: RequiredAuth,
}

#[derive(Deserialize)]
struct RequiredAuth {
    threshold: u32,
    #[serde(default)]
    accounts: Vec<AccountWeight>,
}

impl Permissions {
    /// Decodes a `get_account` response. Both `owner` and `active` must be
    /// present; custom permissions are skipped.
    pub fn from_account_response(response: serde_json::Value) -> Result<Self> {
        let response: AccountResponse = serde_json::from_value(response)?;

        let mut owner = None;
        let mut active = None;
        for entry in response.permissions {
            let permission = Permission {
                threshold: entry.required_auth.threshold,
                accounts: entry.required_auth.accounts,
            };
            match PermissionType::try_from(&entry.perm_name) {
                Ok(PermissionType::Owner) => owner = Some(permission),
                Ok(PermissionType::Active) => active = Some(permission),
                _ => {}
            }
        }

        Ok(Self {
            owner: owner.ok_or(Error::MissingPermission("owner"))?,
            active: active.ok_or(Error::MissingPermission("active"))?,
        })
    }

    pub fn get(&self, permission: PermissionType) -> Option<&Permission> {
        match permission {
            PermissionType::Owner => Some(&self.owner),
            PermissionType::Active => Some(&self.active),
            PermissionType::Root => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn auth(actor: &str, permission: PermissionType) -> Authorization {
        Authorization::new(actor.parse().unwrap(), permission).unwrap()
    }

    fn account_response() -> serde_json::Value {
        json!({
            "account_name": "cambiatus",
            "permissions": [
                {
                    "perm_name": "active",
                    "parent": "owner",
                    "required_auth": {
                        "threshold": 2,
                        "keys": [],
                        "accounts": [
                            { "permission": { "actor": "alice", "permission": "active" }, "weight": 1 },
                            { "permission": { "actor": "bob", "permission": "active" }, "weight": 1 },
                            { "permission": { "actor": "carol", "permission": "owner" }, "weight": 2 },
                            { "permission": { "actor": "cambiatus.cm", "permission": "eosio.code" }, "weight": 1 }
                        ],
                        "waits": []
                    }
                },
                {
                    "perm_name": "owner",
                    "parent": "",
                    "required_auth": {
                        "threshold": 1,
                        "keys": [{ "key": "EOS6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5GDW5CV", "weight": 1 }],
                        "accounts": [],
                        "waits": []
                    }
                },
                {
                    "perm_name": "claim",
                    "parent": "active",
                    "required_auth": { "threshold": 1, "keys": [], "accounts": [], "waits": [] }
                }
            ]
        })
    }

    #[test]
    fn test_permission_hierarchy() {
        assert_eq!(PermissionType::Active.parent(), Some(PermissionType::Owner));
        assert_eq!(PermissionType::Owner.parent(), Some(PermissionType::Root));
        assert_eq!(PermissionType::Root.parent(), None);

        assert!(PermissionType::Owner.satisfies(PermissionType::Active));
        assert!(PermissionType::Active.satisfies(PermissionType::Active));
        assert!(!PermissionType::Active.satisfies(PermissionType::Owner));
    }

    #[test]
    fn test_root_serializes_as_empty_string() {
        assert_eq!(serde_json::to_string(&PermissionType::Root).unwrap(), "\"\"");
        assert_eq!(
            serde_json::from_str::<PermissionType>("\"active\"").unwrap(),
            PermissionType::Active
        );
    }

    #[test]
    fn test_root_cannot_sign() {
        let actor: Name = "alice".parse().unwrap();
        assert!(matches!(
            Authorization::new(actor, PermissionType::Root),
            Err(Error::RootPermissionNotSignable)
        ));

        let json = r#"{"actor":"alice","permission":""}"#;
        assert!(serde_json::from_str::<Authorization>(json).is_err());
    }

    #[test]
    fn test_authorization_from_str() {
        let parsed: Authorization = "alice@owner".parse().unwrap();
        assert_eq!(parsed, auth("alice", PermissionType::Owner));

        let bare: Authorization = "alice".parse().unwrap();
        assert_eq!(bare.permission(), PermissionType::Active);
        assert_eq!(bare.to_string(), "alice@active");

        assert!("alice@custom".parse::<Authorization>().is_err());
    }

    #[test]
    fn test_decode_account_permissions() {
        let permissions = Permissions::from_account_response(account_response()).unwrap();

        assert_eq!(permissions.active.threshold, 2);
        assert_eq!(permissions.active.accounts.len(), 4);
        assert_eq!(
            permissions.active.accounts[3].level.to_string(),
            "cambiatus.cm@eosio.code"
        );
        assert_eq!(permissions.owner.threshold, 1);
        assert!(permissions.owner.accounts.is_empty());
        assert!(permissions.get(PermissionType::Root).is_none());
    }

    #[test]
    fn test_missing_owner_is_invalid() {
        let mut response = account_response();
        response["permissions"]
            .as_array_mut()
            .unwrap()
            .retain(|entry| entry["perm_name"] != "owner");

        assert!(matches!(
            Permissions::from_account_response(response),
            Err(Error::MissingPermission("owner"))
        ));
    }

    #[test]
    fn test_missing_permissions_field_is_decode_error() {
        assert!(matches!(
            Permissions::from_account_response(json!({ "account_name": "x" })),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn test_permission_level_accepts_custom_names() {
        let level: PermissionLevel = "cambiatus.cm@eosio.code".parse().unwrap();
        assert_eq!(level.permission.as_str(), "eosio.code");

        let bare: PermissionLevel = "alice".parse().unwrap();
        assert_eq!(bare, PermissionLevel::from(auth("alice", PermissionType::Active)));
        assert!("alice@Bad".parse::<PermissionLevel>().is_err());
    }

    #[test]
    fn test_custom_level_is_never_approved() {
        let permissions = Permissions::from_account_response(account_response()).unwrap();
        let weight = permissions.active.approval_weight(&[
            auth("cambiatus.cm", PermissionType::Owner),
            auth("cambiatus.cm", PermissionType::Active),
        ]);
        assert_eq!(weight, 0);
    }

    #[test]
    fn test_approval_weight() {
        let permissions = Permissions::from_account_response(account_response()).unwrap();
        let active = &permissions.active;

        assert_eq!(active.approval_weight(&[]), 0);
        assert!(!active.is_satisfied_by(&[auth("alice", PermissionType::Active)]));
        assert!(active.is_satisfied_by(&[
            auth("alice", PermissionType::Active),
            auth("bob", PermissionType::Active),
        ]));

        // owner of alice covers alice@active, active of carol does not cover carol@owner
        assert_eq!(active.approval_weight(&[auth("alice", PermissionType::Owner)]), 1);
        assert_eq!(active.approval_weight(&[auth("carol", PermissionType::Active)]), 0);
        assert!(active.is_satisfied_by(&[auth("carol", PermissionType::Owner)]));
    }
}
