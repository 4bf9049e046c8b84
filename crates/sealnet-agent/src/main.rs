//! Document verification server speaking line-delimited JSON on stdio.

use std::sync::Arc;

use anyhow::Context;
use sealnet_agent::{handle_line, ToolServer};
use sealnet_core::{init_tracing, SealnetConfig};
use sealnet_crypto::{AccessPolicy, KeyStore};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing("sealnet_agent=info,sealnet_crypto=info");

    let config = SealnetConfig::from_env();
    config.validate().context("invalid configuration")?;

    let base_dir = config.keys_base_dir.clone();
    let server_id = config.server_id.clone();
    let store = tokio::task::spawn_blocking(move || KeyStore::open_in_base(&base_dir, server_id))
        .await
        .context("key store task panicked")?
        .context("failed to open server key store")?;

    info!(
        server_id = %config.server_id,
        key_fingerprint = %store.fingerprint(),
        key_dir = %store.key_dir().display(),
        "Server identity ready"
    );

    let server = Arc::new(
        ToolServer::new(Arc::new(store), AccessPolicy::new(&config.valid_access_keys))
            .with_server_id(config.server_id.clone()),
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }

        let server = Arc::clone(&server);
        let response = match tokio::task::spawn_blocking(move || handle_line(&server, &line)).await
        {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Request handler panicked");
                continue;
            }
        };

        let mut out = serde_json::to_vec(&response)?;
        out.push(b'\n');
        stdout.write_all(&out).await?;
        stdout.flush().await?;
    }

    info!("Input closed, shutting down");
    Ok(())
}
