use super::print_json;
use anyhow::{Context, Result};
use cambiatus_eos_lib::config::Config;
use cambiatus_eos_lib::name::Name;
use cambiatus_eos_lib::rpc::ChainClient;
use serde_json::json;

pub fn run(config: &Config, account: &str) -> Result<()> {
    let account = Name::account(account).with_context(|| format!("Invalid account '{}'", account))?;

    let client = ChainClient::new(config);
    let permissions = client.get_account_permissions(&account)?;

    print_json(&json!({
        "owner": permissions.owner,
        "active": permissions.active,
    }))
}
