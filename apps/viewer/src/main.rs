use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    HtmlFileTarget, PodStatusClient, RenderTarget, StdoutTarget, DEFAULT_EVENTS_PATH,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Subscribes to the pod event stream and renders pod container icons.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "http://localhost:8000")]
    server_url: String,
    #[arg(long, default_value = DEFAULT_EVENTS_PATH)]
    events_path: String,
    /// Rewrite this HTML file on every update instead of printing fragments.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    match args.output {
        Some(path) => {
            info!(path = %path.display(), "rendering to file");
            let target = HtmlFileTarget::new(path).with_base_href(args.server_url.as_str());
            watch(&args.server_url, &args.events_path, target).await
        }
        None => watch(&args.server_url, &args.events_path, StdoutTarget).await,
    }
}

async fn watch<T: RenderTarget>(server_url: &str, events_path: &str, target: T) -> Result<()> {
    let mut client = PodStatusClient::new(server_url, events_path, target)
        .with_context(|| format!("invalid server url '{server_url}'"))?;
    client.run().await.context("pod event stream failed")?;
    info!(pods = client.table().len(), "stream ended");
    Ok(())
}
