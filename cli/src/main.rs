use anyhow::Result;
use cambiatus_eos_lib::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::query::{Mode, Table};

#[derive(Parser)]
#[command(name = "cambiatus-eos")]
#[command(about = "Encode Cambiatus EOS actions, multisig proposals and table queries")]
struct Cli {
    /// TOML file with rpc_url and contract accounts
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log requests and encoded actions
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode actions from a JSON file into a bridge transaction message
    Encode {
        /// JSON file with one action or a list of actions
        file: PathBuf,

        /// Signing authorization, e.g. alice@active
        #[arg(long)]
        signer: String,
    },
    /// Wrap authorized actions into a multisig proposal
    Propose {
        /// JSON file with a list of {action, authorization} objects
        file: PathBuf,

        /// Proposer authorization, e.g. alice@active
        #[arg(long)]
        signer: String,

        /// Authorizations whose approval is requested (repeatable)
        #[arg(long, required = true)]
        requested: Vec<String>,

        /// Proposal name; derived from the proposal contents when omitted
        #[arg(long)]
        name: Option<String>,

        /// Hours until the proposal expires
        #[arg(long, default_value_t = 72)]
        expires_in: u32,
    },
    /// Build or run a get_table_rows query
    Query {
        #[arg(value_enum)]
        table: Table,

        /// Account, symbol (e.g. 2,BES) or proposer, depending on the table
        arg: Option<String>,

        #[arg(long, value_enum, default_value = "list")]
        mode: Mode,

        /// Send the query instead of printing the request body
        #[arg(long)]
        send: bool,
    },
    /// Fetch the owner and active permissions of an account
    Permissions {
        account: String,
    },
    /// Extract the relevant message from a chain error document
    ExplainError {
        /// Error JSON, or a file containing it
        input: String,

        /// Translation key namespace
        #[arg(long, default_value = "error.contracts.")]
        namespace: String,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Encode { file, signer } => commands::encode::run(&config, &file, &signer),
        Commands::Propose {
            file,
            signer,
            requested,
            name,
            expires_in,
        } => commands::propose::run(
            &config,
            &file,
            &signer,
            &requested,
            name.as_deref(),
            expires_in,
        ),
        Commands::Query {
            table,
            arg,
            mode,
            send,
        } => commands::query::run(&config, table, arg.as_deref(), mode, send),
        Commands::Permissions { account } => commands::permissions::run(&config, &account),
        Commands::ExplainError { input, namespace } => {
            commands::explain::run(&input, &namespace)
        }
    }
}
