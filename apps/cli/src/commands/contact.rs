use crate::args::ContactArgs;
use agency::domain::config::ClientConfig;
use agency::features::contact::ContactData;
use agency::features::contact::client::ApiClient;
use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Submits one message; Ctrl+C cancels the in-flight request.
pub async fn run(cfg: &ClientConfig, args: ContactArgs) -> Result<()> {
    let mut cfg = cfg.clone();
    if let Some(api_url) = args.api_url {
        cfg.api_url = api_url;
    }

    let client = ApiClient::from_config(&cfg).context("Failed to build API client")?;
    debug!(base_url = client.base_url(), "Submitting contact message");

    let canceller = client.clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling request");
            canceller.cancel_all_requests();
        }
    });

    let data = ContactData::new(args.name, args.email, args.message);
    let result = client.submit_contact(&data).await;
    interrupt.abort();

    let response = result?;
    println!("{}", response.message);
    println!("Reference: #{}", response.data.id);
    if response.email_sent {
        println!("The team has been notified by email.");
    }
    Ok(())
}
