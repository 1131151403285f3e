//! Blocking client for the chain's JSON RPC.
//!
//! One request per call; nothing is retried. Error responses that carry a
//! chain error document become [`Error::ChainRejected`], any other non-2xx
//! status is reported as [`Error::Http`].

use crate::config::{Config, Contracts};
use crate::error::{Error, Result};
use crate::failure::chain_error_message;
use crate::name::Name;
use crate::permission::Permissions;
use crate::table::{self, Account, QueryMode, TableQuery};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};

const GET_TABLE_ROWS: &str = "/v1/chain/get_table_rows";
const GET_ACCOUNT: &str = "/v1/chain/get_account";

pub struct ChainClient {
    http: Client,
    rpc_url: String,
    contracts: Contracts,
}

impl ChainClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            rpc_url: config.rpc_url.trim_end_matches('/').to_string(),
            contracts: config.contracts.clone(),
        }
    }

    pub fn contracts(&self) -> &Contracts {
        &self.contracts
    }

    fn post(&self, path: &str, body: &Value) -> Result<Value> {
        let url = format!("{}{}", self.rpc_url, path);
        debug!(%url, %body, "rpc request");

        let response = self.http.post(&url).json(body).send()?;
        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            return Err(match chain_error_message(&text) {
                Some(reason) => {
                    warn!(%url, status = status.as_u16(), %reason, "rpc request rejected by chain");
                    Error::ChainRejected(reason)
                }
                None => {
                    warn!(%url, status = status.as_u16(), "rpc request failed");
                    Error::Http {
                        url,
                        status: status.as_u16(),
                        body: text,
                    }
                }
            });
        }

        Ok(serde_json::from_str(&text)?)
    }

    pub fn get_table_rows(&self, query: &TableQuery) -> Result<Value> {
        self.post(GET_TABLE_ROWS, &query.request_body())
    }

    fn query(&self, account: &Account, mode: QueryMode) -> Result<(TableQuery, Value)> {
        let query = TableQuery::new(account, mode, &self.contracts);
        let response = self.get_table_rows(&query)?;
        Ok((query, response))
    }

    /// First row of the table; fails on an empty table.
    pub fn query_single<T: DeserializeOwned>(&self, account: &Account) -> Result<T> {
        let (query, response) = self.query(account, QueryMode::Single)?;
        table::decode_single(&query, response)
    }

    pub fn query_list<T: DeserializeOwned>(&self, account: &Account) -> Result<Vec<T>> {
        let (_, response) = self.query(account, QueryMode::List)?;
        table::decode_list(response)
    }

    pub fn query_bulk<T, F>(&self, account: &Account, decode: F) -> Result<Vec<T>>
    where
        F: FnMut(Value) -> Option<T>,
    {
        let (_, response) = self.query(account, QueryMode::Bulk)?;
        table::decode_bulk(response, decode)
    }

    pub fn get_account_permissions(&self, account: &Name) -> Result<Permissions> {
        let response = self.post(GET_ACCOUNT, &json!({ "account_name": account }))?;
        Permissions::from_account_response(response)
    }
}
