use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use pod_watcher::{
    NotificationSink, PodWatcher, PodWatcherConfig, ReflectorPublisher, DEFAULT_REFLECTOR_URL,
};
use shared::{
    domain::{ContainerState, ContainerStates},
    protocol::PodEvent,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = DEFAULT_REFLECTOR_URL)]
    reflector_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Post a single pod notification.
    Send {
        #[arg(long)]
        pod: String,
        /// `name=state`, repeatable.
        #[arg(long = "container", value_parser = parse_container)]
        containers: Vec<(String, ContainerState)>,
    },
    /// Watch pods and post a notification for every change.
    Watch {
        #[arg(long)]
        namespace: Option<String>,
        #[arg(long)]
        selector: Option<String>,
    },
}

fn parse_container(raw: &str) -> Result<(String, ContainerState)> {
    let (name, state) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected name=state, got '{raw}'"))?;
    if name.is_empty() {
        return Err(anyhow!("container name is empty in '{raw}'"));
    }
    Ok((name.to_string(), ContainerState::from(state)))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let cli = Cli::parse();
    let publisher = ReflectorPublisher::new(cli.reflector_url);

    match cli.command {
        Command::Send { pod, containers } => {
            let states: ContainerStates = containers.into_iter().collect();
            publisher.publish(&PodEvent::new(pod, states)).await?;
        }
        Command::Watch {
            namespace,
            selector,
        } => {
            let mut config = PodWatcherConfig::default();
            if let Some(namespace) = namespace {
                config = config.namespace(namespace);
            }
            if let Some(selector) = selector {
                config = config.labels(selector);
            }
            PodWatcher::try_default(config, publisher)
                .await?
                .run()
                .await?;
        }
    }

    Ok(())
}
