use super::{print_json, read_json};
use anyhow::{Context, Result};
use cambiatus_eos_lib::action::{encode_action, Action, AuthorizedAction, MultiSigAction};
use cambiatus_eos_lib::config::Config;
use cambiatus_eos_lib::multisig::{derive_proposal_name, format_expiration, Propose};
use cambiatus_eos_lib::name::Name;
use cambiatus_eos_lib::permission::Authorization;
use cambiatus_eos_lib::transaction::TransactionRequest;
use chrono::{Duration, Utc};
use std::path::Path;
use tracing::info;

pub fn run(
    config: &Config,
    file: &Path,
    signer: &str,
    requested: &[String],
    name: Option<&str>,
    expires_in_hours: u32,
) -> Result<()> {
    let signer: Authorization = signer
        .parse()
        .with_context(|| format!("Invalid signer '{}'", signer))?;

    let actions: Vec<AuthorizedAction> = read_json(file)?;
    if actions.is_empty() {
        anyhow::bail!("No actions to propose in {}", file.display());
    }

    let requested = requested
        .iter()
        .map(|level| {
            level
                .parse::<Authorization>()
                .with_context(|| format!("Invalid requested authorization '{}'", level))
        })
        .collect::<Result<Vec<_>>>()?;

    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(i64::from(expires_in_hours)))
        .context("Expiration is out of range")?;

    let proposal_name = match name {
        Some(name) => name
            .parse::<Name>()
            .with_context(|| format!("Invalid proposal name '{}'", name))?,
        None => {
            let mut seed = serde_json::to_vec(&actions)?;
            seed.extend_from_slice(format_expiration(&expiration).as_bytes());
            derive_proposal_name(signer.actor(), &seed)
        }
    };

    info!(
        proposal = %proposal_name,
        actions = actions.len(),
        expiration = %format_expiration(&expiration),
        "assembled proposal"
    );

    let propose = Action::MultiSig(MultiSigAction::Propose(Propose {
        proposer: signer.actor().clone(),
        proposal_name,
        requested,
        expiration,
        actions,
    }));
    let encoded = encode_action(&propose, &signer, &config.contracts);

    print_json(&TransactionRequest::new(vec![encoded]))
}
