//! sealnet-keys: Command-line tool for entity keys and sealed envelopes.
//!
//! Keys live in `<keys-dir>/<name>/`; `--keys-dir` defaults to
//! `SEALNET_KEYS_BASE_DIR` (or `keys`).

use clap::{Parser, Subcommand};
use sealnet_core::{init_tracing, SealnetConfig};
use sealnet_crypto::{envelope, generate_access_key, Envelope, KeyStore};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "sealnet-keys")]
#[command(author, version, about = "Key stores and hybrid envelopes for sealnet agents")]
#[command(propagate_version = true)]
struct Cli {
    /// Base directory holding one key directory per entity
    #[arg(short, long, global = true)]
    keys_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load or generate an entity's keypair
    Provision {
        /// Entity name
        #[arg(short, long)]
        name: String,
    },

    /// Print an entity's public key as PEM
    PublicKey {
        /// Entity name
        #[arg(short, long)]
        name: String,
    },

    /// Seal a JSON document for a recipient
    Seal {
        /// Sending entity name
        #[arg(short, long)]
        name: String,

        /// Recipient public key PEM file
        #[arg(short, long)]
        recipient: PathBuf,

        /// JSON input file (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Open a sealed envelope addressed to an entity
    Open {
        /// Receiving entity name
        #[arg(short, long)]
        name: String,

        /// Envelope file (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Generate a new access key
    AccessKey,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing("sealnet_crypto=info,sealnet_keys=info");

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let keys_dir = cli
        .keys_dir
        .unwrap_or_else(|| SealnetConfig::from_env().keys_base_dir);

    match cli.command {
        Commands::Provision { name } => cmd_provision(&keys_dir, &name)?,
        Commands::PublicKey { name } => {
            let store = KeyStore::open_in_base(&keys_dir, name)?;
            print!("{}", store.public_key_pem());
        }
        Commands::Seal {
            name,
            recipient,
            input,
        } => cmd_seal(&keys_dir, &name, &recipient, input.as_deref())?,
        Commands::Open { name, input } => cmd_open(&keys_dir, &name, input.as_deref())?,
        Commands::AccessKey => println!("{}", generate_access_key()),
    }

    Ok(())
}

fn read_input(input: Option<&Path>) -> std::io::Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn cmd_provision(keys_dir: &Path, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = KeyStore::open_in_base(keys_dir, name)?;

    // Output JSON for tooling consumption
    let output = serde_json::json!({
        "entity": store.name(),
        "fingerprint": store.fingerprint(),
        "public_key": store.public_key_pem(),
        "private_key_path": store.identity().private_key_path().to_string_lossy(),
        "public_key_path": store.identity().public_key_path().to_string_lossy(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn cmd_seal(
    keys_dir: &Path,
    name: &str,
    recipient_path: &Path,
    input: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = KeyStore::open_in_base(keys_dir, name)?;
    let recipient_pem = std::fs::read_to_string(recipient_path)?;

    let data: serde_json::Value = serde_json::from_str(&read_input(input)?)?;
    let sealed = envelope::seal(&data, &recipient_pem, &store)?;

    println!("{}", serde_json::to_string_pretty(&sealed)?);

    Ok(())
}

fn cmd_open(
    keys_dir: &Path,
    name: &str,
    input: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = KeyStore::open_in_base(keys_dir, name)?;

    let envelope: Envelope = serde_json::from_str(&read_input(input)?)?;
    let data = envelope::open(&envelope, &store)?;

    println!("{}", serde_json::to_string_pretty(&data)?);

    Ok(())
}
