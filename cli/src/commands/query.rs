use super::print_json;
use anyhow::{Context, Result};
use cambiatus_eos_lib::config::Config;
use cambiatus_eos_lib::multisig::{ProposalApprovals, ProposalRow};
use cambiatus_eos_lib::name::{Name, Symbol};
use cambiatus_eos_lib::rpc::ChainClient;
use cambiatus_eos_lib::table::{
    Account, ExpiryOptions, MultiSigTable, QueryMode, TableQuery, TokenBalance, TokenStat,
    TokenTable,
};
use clap::ValueEnum;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Copy, ValueEnum)]
pub enum Table {
    Accounts,
    Stat,
    Expiryopts,
    Proposal,
    Approvals2,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Mode {
    Single,
    List,
    Bulk,
}

impl From<Mode> for QueryMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Single => QueryMode::Single,
            Mode::List => QueryMode::List,
            Mode::Bulk => QueryMode::Bulk,
        }
    }
}

fn selector(table: Table, arg: Option<&str>) -> Result<Account> {
    let required = || arg.context("This table needs an account, symbol or proposer argument");
    let name = || -> Result<Name> {
        let value = required()?;
        value
            .parse()
            .with_context(|| format!("Invalid name '{}'", value))
    };

    Ok(match table {
        Table::Accounts => Account::Token(TokenTable::Accounts(name()?)),
        Table::Stat => {
            let value = required()?;
            let symbol: Symbol = value
                .parse()
                .with_context(|| format!("Invalid symbol '{}'", value))?;
            Account::Token(TokenTable::Stat(symbol))
        }
        Table::Expiryopts => Account::Token(TokenTable::ExpiryOpts),
        Table::Proposal => Account::MultiSig(MultiSigTable::Proposal(name()?)),
        Table::Approvals2 => Account::MultiSig(MultiSigTable::Approvals2(name()?)),
    })
}

fn fetch<T: DeserializeOwned + Serialize>(
    client: &ChainClient,
    account: &Account,
    mode: Mode,
) -> Result<Value> {
    let rows = match mode {
        Mode::Single => serde_json::to_value(client.query_single::<T>(account)?)?,
        Mode::List => serde_json::to_value(client.query_list::<T>(account)?)?,
        // rows that do not decode are skipped
        Mode::Bulk => serde_json::to_value(
            client.query_bulk(account, |row| serde_json::from_value::<T>(row).ok())?,
        )?,
    };
    Ok(rows)
}

pub fn run(config: &Config, table: Table, arg: Option<&str>, mode: Mode, send: bool) -> Result<()> {
    let account = selector(table, arg)?;

    if !send {
        let query = TableQuery::new(&account, mode.into(), &config.contracts);
        return print_json(&query.request_body());
    }

    let client = ChainClient::new(config);
    let rows = match table {
        Table::Accounts => fetch::<TokenBalance>(&client, &account, mode)?,
        Table::Stat => fetch::<TokenStat>(&client, &account, mode)?,
        Table::Expiryopts => fetch::<ExpiryOptions>(&client, &account, mode)?,
        Table::Proposal => fetch::<ProposalRow>(&client, &account, mode)?,
        Table::Approvals2 => fetch::<ProposalApprovals>(&client, &account, mode)?,
    };

    print_json(&rows)
}
