mod config;
mod render;

use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    presentation::{quota_lines, ServerCard},
    HttpTransport, NotificationSink, QuotaMonitor, StageOutcome, Transport, UploadFile,
    WorkflowEvent, WorkflowOrchestrator,
};
use shared::domain::ServerId;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{info, warn};

use crate::config::{load_settings, Settings};

#[derive(Parser, Debug)]
#[command(about = "Server migration assessment client")]
struct Cli {
    /// Base URL of the assessment service.
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    /// Settings file; defaults to ./assessor.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lists discovered servers.
    Servers,
    /// Analyzes one server and estimates its migration cost.
    Analyze { server_id: String },
    /// Generates a migration roadmap over every discovered server.
    Roadmap,
    /// Uploads a JSON test-data file that replaces the server list.
    Upload { file: PathBuf },
    /// Polls the usage quota endpoint.
    WatchQuota {
        #[arg(long, default_value_t = 1)]
        ticks: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(url) = cli.server_url {
        settings.server_url = url;
    }
    if let Some(secs) = cli.timeout_secs {
        settings.request_timeout_secs = secs;
    }
    info!(server_url = %settings.server_url, "starting assessor");

    let transport: Arc<dyn Transport> = Arc::new(
        HttpTransport::with_timeout(&settings.server_url, settings.request_timeout())
            .context("invalid server url")?,
    );
    let orchestrator = WorkflowOrchestrator::with_notifications(
        Arc::clone(&transport),
        NotificationSink::new(settings.notification_ttl()),
    );

    run(cli.command, &orchestrator, transport, &settings).await
}

async fn run(
    command: Command,
    orchestrator: &WorkflowOrchestrator,
    transport: Arc<dyn Transport>,
    settings: &Settings,
) -> Result<()> {
    let mut events = orchestrator.subscribe();

    match command {
        Command::Servers => {
            discover(orchestrator, &mut events).await?;
            print_servers(orchestrator).await;
        }
        Command::Analyze { server_id } => {
            discover(orchestrator, &mut events).await?;
            let outcome = orchestrator
                .select_and_analyze(&ServerId::new(server_id))
                .await;
            drain_events(&mut events);
            ensure_applied("analysis", outcome.analysis)?;
            if let Some(estimate) = outcome.estimate {
                ensure_applied("cost estimate", estimate)?;
            }
        }
        Command::Roadmap => {
            discover(orchestrator, &mut events).await?;
            let outcome = orchestrator.generate_roadmap().await;
            drain_events(&mut events);
            ensure_applied("roadmap", outcome)?;
        }
        Command::Upload { file } => {
            // Uploading does not depend on discovery succeeding.
            orchestrator.check_configuration().await;
            drain_events(&mut events);

            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("failed to read '{}'", file.display()))?;
            let file_name = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let outcome = orchestrator
                .upload_test_data(Some(UploadFile::new(file_name, bytes)))
                .await;
            drain_events(&mut events);
            ensure_applied("upload", outcome)?;
            print_servers(orchestrator).await;
        }
        Command::WatchQuota { ticks } => watch_quota(transport, settings, ticks).await?,
    }

    Ok(())
}

async fn discover(
    orchestrator: &WorkflowOrchestrator,
    events: &mut broadcast::Receiver<WorkflowEvent>,
) -> Result<()> {
    let outcome = orchestrator.initialize().await;
    drain_events(events);
    ensure_applied("server discovery", outcome)
}

async fn print_servers(orchestrator: &WorkflowOrchestrator) {
    let view = orchestrator.snapshot().await;
    if view.servers.is_empty() {
        println!("no servers discovered");
    }
    for server in &view.servers {
        println!("{}\n", render::server_card(&ServerCard::from_server(server)));
    }
}

fn drain_events(events: &mut broadcast::Receiver<WorkflowEvent>) {
    loop {
        match events.try_recv() {
            Ok(WorkflowEvent::Notification(entry)) => {
                eprintln!("{}", render::notification(&entry))
            }
            Ok(WorkflowEvent::AnalysisApplied { server_id, view }) => {
                println!("Analysis for {server_id}\n{}\n", render::analysis(&view))
            }
            Ok(WorkflowEvent::EstimateApplied { server_id, view }) => {
                println!("Cost estimate for {server_id}\n{}\n", render::estimate(&view))
            }
            Ok(WorkflowEvent::RoadmapApplied(view)) => println!("{}", render::roadmap(&view)),
            Ok(WorkflowEvent::SlotChanged { .. } | WorkflowEvent::ServersReplaced { .. }) => {}
            Err(TryRecvError::Lagged(skipped)) => {
                warn!(skipped, "workflow events dropped");
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
}

fn ensure_applied(stage: &str, outcome: StageOutcome) -> Result<()> {
    match outcome {
        StageOutcome::Applied => Ok(()),
        StageOutcome::Superseded => Err(anyhow!("{stage} was superseded")),
        StageOutcome::Failed(err) => Err(anyhow!(err).context(format!("{stage} failed"))),
    }
}

async fn watch_quota(transport: Arc<dyn Transport>, settings: &Settings, ticks: u32) -> Result<()> {
    let monitor = QuotaMonitor::spawn(transport, settings.quota_interval());
    let mut updates = monitor.subscribe();
    let patience = settings.quota_interval() + settings.request_timeout();

    for _ in 0..ticks {
        match tokio::time::timeout(patience, updates.changed()).await {
            Ok(Ok(())) => {
                let snapshot = updates.borrow_and_update().clone();
                if let Some(snapshot) = snapshot {
                    println!("{}\n", render::quota(&quota_lines(&snapshot)));
                }
            }
            Ok(Err(_)) => return Err(anyhow!("quota monitor stopped")),
            Err(_) => warn!("no quota update within {:?}", patience),
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
