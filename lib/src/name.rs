//! Value objects for strings the chain gives meaning to.
//!
//! Every type here is validated at construction, so a `Name` that exists is
//! known to be representable on chain. Crate literals skip the check.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest name the chain's 64-bit name encoding can hold without the
/// restricted 13th character.
pub const MAX_NAME_LEN: usize = 12;

/// Shortest account name users can create.
pub const MIN_ACCOUNT_NAME_LEN: usize = 3;

pub const MAX_SYMBOL_PRECISION: u8 = 18;

const MAX_SYMBOL_CODE_LEN: usize = 7;

/// Characters allowed in a name, in the order the chain encodes them.
pub(crate) const NAME_ALPHABET: &[u8] = b".12345abcdefghijklmnopqrstuvwxyz";

fn check_name(value: &str, min_len: usize) -> Result<()> {
    let invalid = |reason| {
        Err(Error::InvalidName {
            value: value.to_string(),
            reason,
        })
    };

    if value.len() < min_len {
        return if min_len == 1 {
            invalid("must not be empty")
        } else {
            invalid("account names need at least 3 characters")
        };
    }
    if value.len() > MAX_NAME_LEN {
        return invalid("longer than 12 characters");
    }
    if !value.bytes().all(|b| NAME_ALPHABET.contains(&b)) {
        return invalid("only a-z, 1-5 and '.' are allowed");
    }
    if value.ends_with('.') {
        return invalid("must not end with '.'");
    }
    Ok(())
}

/// Account, contract, action or proposal name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name(String);

impl Name {
    /// Parses a name that must identify a user account.
    pub fn account(value: &str) -> Result<Self> {
        check_name(value, MIN_ACCOUNT_NAME_LEN)?;
        Ok(Self(value.to_string()))
    }

    /// For names built from crate literals or from `NAME_ALPHABET`.
    pub(crate) fn new_unchecked(value: String) -> Self {
        debug_assert!(check_name(&value, 1).is_ok(), "invalid name {}", value);
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Name {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        check_name(value, 1)?;
        Ok(Self(value.to_string()))
    }
}

impl TryFrom<String> for Name {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        check_name(&value, 1)?;
        Ok(Self(value))
    }
}

impl From<Name> for String {
    fn from(name: Name) -> Self {
        name.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Any permission name an account can define, including custom ones.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionName(String);

impl PermissionName {
    /// For crate literals such as `owner` and `active`.
    pub(crate) fn new_unchecked(value: String) -> Self {
        debug_assert!(value.is_empty() || check_name(&value, 1).is_ok());
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PermissionName {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        Self::try_from(value.to_string())
    }
}

impl TryFrom<String> for PermissionName {
    type Error = Error;

    // The root permission has no name of its own.
    fn try_from(value: String) -> Result<Self> {
        if !value.is_empty() {
            check_name(&value, 1)?;
        }
        Ok(Self(value))
    }
}

impl From<PermissionName> for String {
    fn from(name: PermissionName) -> Self {
        name.0
    }
}

impl fmt::Display for PermissionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const PUBLIC_KEY_LEGACY_PREFIX: &str = "EOS";
const PUBLIC_KEY_PREFIX: &str = "PUB_K1_";
const PRIVATE_KEY_PREFIX: &str = "PVT_K1_";
const LEGACY_PUBLIC_KEY_LEN: usize = 53;
const WIF_PRIVATE_KEY_LEN: usize = 51;

fn is_base58(value: &str) -> bool {
    value
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() && !matches!(b, b'0' | b'O' | b'I' | b'l'))
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PublicKey(String);

impl PublicKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the `EOS`-prefixed form.
    pub fn is_legacy(&self) -> bool {
        self.0.starts_with(PUBLIC_KEY_LEGACY_PREFIX)
    }
}

impl TryFrom<String> for PublicKey {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        let valid = if let Some(body) = value.strip_prefix(PUBLIC_KEY_PREFIX) {
            !body.is_empty() && is_base58(body)
        } else if let Some(body) = value.strip_prefix(PUBLIC_KEY_LEGACY_PREFIX) {
            value.len() == LEGACY_PUBLIC_KEY_LEN && is_base58(body)
        } else {
            false
        };

        if valid {
            Ok(Self(value))
        } else {
            Err(Error::InvalidPublicKey(value))
        }
    }
}

impl FromStr for PublicKey {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        Self::try_from(value.to_string())
    }
}

impl From<PublicKey> for String {
    fn from(key: PublicKey) -> Self {
        key.0
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Private key in WIF or `PVT_K1_` form. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey(String);

impl PrivateKey {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl FromStr for PrivateKey {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let valid = if let Some(body) = value.strip_prefix(PRIVATE_KEY_PREFIX) {
            !body.is_empty() && is_base58(body)
        } else {
            value.len() == WIF_PRIVATE_KEY_LEN && value.starts_with('5') && is_base58(value)
        };

        if valid {
            Ok(Self(value.to_string()))
        } else {
            Err(Error::InvalidPrivateKey)
        }
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// Token symbol: decimal precision plus a currency code such as `BES`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol {
    precision: u8,
    code: String,
}

impl Symbol {
    pub fn new(precision: u8, code: &str) -> Result<Self> {
        let valid_code = !code.is_empty()
            && code.len() <= MAX_SYMBOL_CODE_LEN
            && code.bytes().all(|b| b.is_ascii_uppercase());

        if precision > MAX_SYMBOL_PRECISION || !valid_code {
            return Err(Error::InvalidSymbol(format!("{},{}", precision, code)));
        }

        Ok(Self {
            precision,
            code: code.to_string(),
        })
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Currency code alone, as used for table scopes.
    pub fn symbol_code(&self) -> &str {
        &self.code
    }
}

impl FromStr for Symbol {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let (precision, code) = value
            .split_once(',')
            .ok_or_else(|| Error::InvalidSymbol(value.to_string()))?;
        let precision = precision
            .parse()
            .map_err(|_| Error::InvalidSymbol(value.to_string()))?;
        Self::new(precision, code)
    }
}

impl TryFrom<String> for Symbol {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.to_string()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.precision, self.code)
    }
}

/// Token amount. Serialised the way the chain expects, e.g. `"12.50 BES"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Asset {
    pub amount: f64,
    pub symbol: Symbol,
}

impl Asset {
    pub fn new(amount: f64, symbol: Symbol) -> Self {
        Self { amount, symbol }
    }
}

impl FromStr for Asset {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let invalid = || Error::InvalidAsset(value.to_string());

        let (amount, code) = value.split_once(' ').ok_or_else(invalid)?;
        let precision = match amount.split_once('.') {
            Some((_, decimals)) => u8::try_from(decimals.len()).map_err(|_| invalid())?,
            None => 0,
        };
        let amount: f64 = amount.parse().map_err(|_| invalid())?;
        let symbol = Symbol::new(precision, code).map_err(|_| invalid())?;

        Ok(Self { amount, symbol })
    }
}

impl TryFrom<String> for Asset {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Asset> for String {
    fn from(asset: Asset) -> Self {
        asset.to_string()
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.*} {}",
            usize::from(self.symbol.precision),
            self.amount,
            self.symbol.code
        )
    }
}
