//! podlink - pod to AI engine bridge
//!
//! CLI entry point for seeding pods, pushing interpretations, and
//! bootstrapping data connectors.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info, warn};

use podlink::cli::{Cli, Command};
use podlink::config::{Config, PodConfig};
use podlink::domain::Pod;
use podlink::engine::{EngineSender, HttpEngineClient};
use podlink::{import_interpretations, init_data_connectors};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("podlink")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level).map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    let log_file = fs::File::create(log_dir.join("podlink.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(
        "podlink loaded config: engine={}, pods={}",
        config.engine.base_url,
        config.pods.len()
    );

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Health => cmd_health(&config).await,
        Command::Import { pod } => cmd_import(&config, &pod),
        Command::Push { pod } => cmd_push(&config, &pod).await,
        Command::Start => cmd_start(&config).await,
    }
}

/// Build the shared sender; the HTTP client doubles as the health probe
fn build_sender(config: &Config) -> Result<Arc<EngineSender>> {
    let client = Arc::new(HttpEngineClient::from_config(&config.engine).context("Failed to create engine client")?);
    Ok(Arc::new(EngineSender::from_config(
        client.clone(),
        client,
        &config.engine,
    )))
}

fn pod_config<'a>(config: &'a Config, name: &str) -> Result<&'a PodConfig> {
    config
        .pod(name)
        .ok_or_else(|| eyre::eyre!("Unknown pod '{}'. Configured: {}", name, pod_names(config)))
}

fn pod_names(config: &Config) -> String {
    if config.pods.is_empty() {
        return "(none)".to_string();
    }
    config.pods.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", ")
}

/// Build a pod and seed its store from disk
fn load_pod(pod_config: &PodConfig) -> Result<Pod> {
    let mut pod = Pod::from_config(pod_config)?;
    let path = pod.interpretations_path().to_path_buf();
    import_interpretations(&mut pod, &path)?;
    Ok(pod)
}

async fn cmd_health(config: &Config) -> Result<()> {
    let sender = build_sender(config)?;
    match sender.check_health().await {
        Ok(()) => {
            println!("{} {}", "healthy".green(), config.engine.base_url);
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "unhealthy".red(), config.engine.base_url);
            Err(e.into())
        }
    }
}

fn cmd_import(config: &Config, name: &str) -> Result<()> {
    let pod = load_pod(pod_config(config, name)?)?;
    println!(
        "Imported {} interpretations for pod {} from {}",
        pod.interpretations().len(),
        pod.name().bold(),
        pod.interpretations_path().display()
    );
    Ok(())
}

async fn cmd_push(config: &Config, name: &str) -> Result<()> {
    let sender = build_sender(config)?;
    let pod = load_pod(pod_config(config, name)?)?;
    let indexed = pod.interpretations().indexed();

    sender.send_interpretations(&pod, &indexed).await?;
    println!("Sent {} interpretations for pod {}", indexed.len(), pod.name().bold());
    Ok(())
}

async fn cmd_start(config: &Config) -> Result<()> {
    let sender = build_sender(config)?;

    // A pod that fails to build or seed is skipped; the rest still start
    let mut pods = Vec::new();
    for pod_config in &config.pods {
        let pod = match load_pod(pod_config) {
            Ok(pod) => pod,
            Err(e) => {
                warn!(pod = %pod_config.name, error = %e, "Skipping pod");
                println!("{} {}: {}", "skipped".yellow(), pod_config.name, e);
                continue;
            }
        };

        if let Err(e) = sender
            .send_interpretations(&pod, &pod.interpretations().indexed())
            .await
        {
            warn!(pod = %pod.name(), error = %e, "Failed to send interpretations");
            println!("{} {}: {}", "warning".yellow(), pod.name(), e);
        }
        pods.push(Arc::new(pod));
    }

    init_data_connectors(&pods, sender)
        .await
        .context("Failed to initialize data connectors")?;
    println!("{} {} pods started", "ok".green(), pods.len());
    Ok(())
}
