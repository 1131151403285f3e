use super::{print_json, read_json};
use anyhow::{Context, Result};
use cambiatus_eos_lib::action::{encode_action, Action};
use cambiatus_eos_lib::config::Config;
use cambiatus_eos_lib::permission::Authorization;
use cambiatus_eos_lib::transaction::TransactionRequest;
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum ActionInput {
    One(Action),
    Many(Vec<Action>),
}

pub fn run(config: &Config, file: &Path, signer: &str) -> Result<()> {
    let authorization: Authorization = signer
        .parse()
        .with_context(|| format!("Invalid signer '{}'", signer))?;

    let input: ActionInput = read_json(file)?;
    let actions = match input {
        ActionInput::One(action) => vec![action],
        ActionInput::Many(actions) => actions,
    };
    if actions.is_empty() {
        anyhow::bail!("No actions in {}", file.display());
    }

    let encoded = actions
        .iter()
        .map(|action| encode_action(action, &authorization, &config.contracts))
        .collect();

    print_json(&TransactionRequest::new(encoded))
}
