//! Table selectors and `get_table_rows` request/response handling.

use crate::config::Contracts;
use crate::error::{Error, Result};
use crate::name::{Asset, Name, Symbol};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenTable {
    Accounts(Name),
    Stat(Symbol),
    ExpiryOpts,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultiSigTable {
    Proposal(Name),
    Approvals2(Name),
}

/// Which contract table to read, and for whom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Account {
    Token(TokenTable),
    MultiSig(MultiSigTable),
}

impl Account {
    pub fn contract<'a>(&self, contracts: &'a Contracts) -> &'a Name {
        match self {
            Account::Token(_) => &contracts.token,
            Account::MultiSig(_) => &contracts.msig,
        }
    }

    /// Table name and scope for this selector.
    pub fn table_and_scope(&self, contracts: &Contracts) -> (&'static str, String) {
        match self {
            Account::Token(TokenTable::Accounts(name)) => ("accounts", name.to_string()),
            Account::Token(TokenTable::Stat(symbol)) => {
                ("stat", symbol.symbol_code().to_string())
            }
            Account::Token(TokenTable::ExpiryOpts) => ("expiryopts", contracts.token.to_string()),
            Account::MultiSig(MultiSigTable::Proposal(proposer)) => {
                ("proposal", proposer.to_string())
            }
            Account::MultiSig(MultiSigTable::Approvals2(proposer)) => {
                ("approvals2", proposer.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// First row only.
    Single,
    List,
    /// Large reads that the caller filters row by row.
    Bulk,
}

impl QueryMode {
    pub fn limit(&self) -> u32 {
        match self {
            QueryMode::Single => 1,
            QueryMode::List => 100,
            QueryMode::Bulk => 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    pub contract: Name,
    pub table: String,
    pub scope: String,
    pub limit: u32,
}

impl TableQuery {
    pub fn new(account: &Account, mode: QueryMode, contracts: &Contracts) -> Self {
        let (table, scope) = account.table_and_scope(contracts);
        Self {
            contract: account.contract(contracts).clone(),
            table: table.to_string(),
            scope,
            limit: mode.limit(),
        }
    }

    pub fn request_body(&self) -> Value {
        json!({
            "code": self.contract,
            "scope": self.scope,
            "table": self.table,
            "limit": self.limit,
            "json": true,
        })
    }
}

#[derive(Deserialize)]
struct TableRows {
    rows: Vec<Value>,
}

pub fn decode_rows(response: Value) -> Result<Vec<Value>> {
    let TableRows { rows } = serde_json::from_value(response)?;
    Ok(rows)
}

pub fn decode_single<T: DeserializeOwned>(query: &TableQuery, response: Value) -> Result<T> {
    let row = decode_rows(response)?
        .into_iter()
        .next()
        .ok_or_else(|| Error::EmptyTable {
            table: query.table.clone(),
            scope: query.scope.clone(),
        })?;
    Ok(serde_json::from_value(row)?)
}

pub fn decode_list<T: DeserializeOwned>(response: Value) -> Result<Vec<T>> {
    decode_rows(response)?
        .into_iter()
        .map(|row| serde_json::from_value(row).map_err(Error::from))
        .collect()
}

/// Runs `decode` over every row, keeping the rows it maps to `Some`.
pub fn decode_bulk<T, F>(response: Value, decode: F) -> Result<Vec<T>>
where
    F: FnMut(Value) -> Option<T>,
{
    Ok(decode_rows(response)?.into_iter().filter_map(decode).collect())
}

/// Row of the token `accounts` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenBalance {
    pub balance: Asset,
}

/// Row of the token `stat` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenStat {
    pub supply: Asset,
    pub max_supply: Asset,
    pub min_balance: Asset,
    pub issuer: Name,
    #[serde(rename = "type")]
    pub token_type: String,
}

/// Row of the token `expiryopts` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpiryOptions {
    pub currency: Symbol,
    pub natural_expiration_period: u32,
    pub juridical_expiration_period: u32,
    pub renovation_amount: Asset,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multisig::ProposalApprovals;

    fn contracts() -> Contracts {
        Contracts {
            community: "bes.cmm".parse().unwrap(),
            token: "bes.token".parse().unwrap(),
            ..Contracts::default()
        }
    }

    fn name(value: &str) -> Name {
        value.parse().unwrap()
    }

    #[test]
    fn test_table_and_scope() {
        let contracts = contracts();
        let cases = [
            (Account::Token(TokenTable::Accounts(name("alice"))), "accounts", "alice"),
            (Account::Token(TokenTable::Stat("2,BES".parse().unwrap())), "stat", "BES"),
            (Account::Token(TokenTable::ExpiryOpts), "expiryopts", "bes.token"),
            (Account::MultiSig(MultiSigTable::Proposal(name("alice"))), "proposal", "alice"),
            (Account::MultiSig(MultiSigTable::Approvals2(name("bob"))), "approvals2", "bob"),
        ];

        for (account, table, scope) in cases {
            let resolved = account.table_and_scope(&contracts);
            assert_eq!(resolved, (table, scope.to_string()));
            // same selector, same answer
            assert_eq!(account.table_and_scope(&contracts), resolved);
        }
    }

    #[test]
    fn test_query_contracts() {
        let contracts = contracts();
        let token = Account::Token(TokenTable::ExpiryOpts);
        let msig = Account::MultiSig(MultiSigTable::Proposal(name("alice")));

        assert_eq!(token.contract(&contracts).as_str(), "bes.token");
        assert_eq!(msig.contract(&contracts).as_str(), "eosio.msig");
    }

    #[test]
    fn test_query_limits() {
        let contracts = contracts();
        let account = Account::Token(TokenTable::Accounts(name("alice")));

        for (mode, limit) in [
            (QueryMode::Single, 1),
            (QueryMode::List, 100),
            (QueryMode::Bulk, 1000),
        ] {
            let body = TableQuery::new(&account, mode, &contracts).request_body();
            assert_eq!(
                body,
                json!({
                    "code": "bes.token",
                    "scope": "alice",
                    "table": "accounts",
                    "limit": limit,
                    "json": true,
                })
            );
        }
    }

    #[test]
    fn test_decode_single() {
        let query = TableQuery::new(
            &Account::Token(TokenTable::Accounts(name("alice"))),
            QueryMode::Single,
            &contracts(),
        );
        let response = json!({ "rows": [{ "balance": "12.50 BES" }], "more": false });

        let row: TokenBalance = decode_single(&query, response).unwrap();
        assert_eq!(row.balance.to_string(), "12.50 BES");
    }

    #[test]
    fn test_decode_single_empty_table() {
        let query = TableQuery::new(
            &Account::Token(TokenTable::Accounts(name("alice"))),
            QueryMode::Single,
            &contracts(),
        );

        let result = decode_single::<TokenBalance>(&query, json!({ "rows": [] }));
        assert!(matches!(result, Err(Error::EmptyTable { .. })));
    }

    #[test]
    fn test_decode_missing_rows() {
        assert!(matches!(
            decode_list::<TokenBalance>(json!({ "error": "nope" })),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn test_decode_list() {
        let response = json!({
            "rows": [
                {
                    "supply": "100.00 BES",
                    "max_supply": "1000.00 BES",
                    "min_balance": "-10.00 BES",
                    "issuer": "alice",
                    "type": "mcc"
                }
            ]
        });

        let rows: Vec<TokenStat> = decode_list(response).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].min_balance.amount, -10.0);
        assert_eq!(rows[0].token_type, "mcc");
    }

    #[test]
    fn test_decode_bulk_filters() {
        let response = json!({
            "rows": [
                { "version": 1, "proposal_name": "first", "requested_approvals": [], "provided_approvals": [] },
                { "version": 1, "proposal_name": "second", "requested_approvals": [], "provided_approvals": [] },
                { "unexpected": true }
            ]
        });

        let names: Vec<String> = decode_bulk(response, |row| {
            serde_json::from_value::<ProposalApprovals>(row)
                .ok()
                .filter(|approvals| approvals.proposal_name.as_str() != "first")
                .map(|approvals| approvals.proposal_name.to_string())
        })
        .unwrap();

        assert_eq!(names, vec!["second".to_string()]);
    }

    #[test]
    fn test_decode_expiry_options() {
        let response = json!({
            "rows": [{
                "currency": "2,BES",
                "natural_expiration_period": 30,
                "juridical_expiration_period": 60,
                "renovation_amount": "5.00 BES"
            }]
        });

        let rows: Vec<ExpiryOptions> = decode_list(response).unwrap();
        assert_eq!(rows[0].currency.symbol_code(), "BES");
        assert_eq!(rows[0].renovation_amount.amount, 5.0);
    }
}
