//! PackSense Daemon - Main entry point
//!
//! Runs the perception pipeline against the configured spatial backend.

mod config;
mod state;
mod store;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tokio::time::{interval, Duration};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use packsense_pipeline::PerceptionEvent;

#[derive(Parser, Debug)]
#[command(name = "packsense")]
#[command(about = "Spatial perception daemon for the PackSense packing assistant")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "packsense.toml")]
    config: PathBuf,

    /// Gesture sensitivity override (0.0 to 1.0)
    #[arg(short, long)]
    sensitivity: Option<f64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Run a single scene scan and exit
    #[arg(long)]
    scan_once: bool,

    /// Print the scan-once snapshot as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("PackSense v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = config::load_config(&args.config)?;

    // Override sensitivity if specified
    if let Some(sensitivity) = args.sensitivity {
        config.tracking.sensitivity = sensitivity;
    }

    info!(
        backend = ?config.backend.mode,
        cadence_ms = config.tracking.cadence_ms,
        sensitivity = config.tracking.sensitivity,
        "Configuration loaded"
    );

    // Create application state
    let state = state::AppState::new(config.clone()).await?;

    if args.scan_once {
        // Single scan mode
        info!("Running single scene scan");
        state.passthrough.activate().await?;
        let snapshot = state.scene.scan().await?;
        state.passthrough.deactivate().await?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            return Ok(());
        }
        println!(
            "Scene: {} planes, {} volumes",
            snapshot.planes.len(),
            snapshot.volumes.len()
        );
        for plane in &snapshot.planes {
            println!("  - plane {} ({:?}, confidence {:.2})", plane.id, plane.label, plane.confidence);
        }
        for volume in &snapshot.volumes {
            println!("  - volume {} ({:?}, confidence {:.2})", volume.id, volume.label, volume.confidence);
        }
        println!(
            "Container detected: {}",
            state.scene.container_detected()
        );
    } else {
        // Daemon mode - passthrough, tracking loop, and periodic rescans
        run(state).await?;
    }

    Ok(())
}

/// Run the pipeline until interrupted
async fn run(state: std::sync::Arc<state::AppState>) -> Result<()> {
    state.start().await?;
    info!("Perception pipeline running, press Ctrl-C to stop");

    let mut events = state.subscribe();
    let mut rescan = interval(Duration::from_secs(state.config.scene.scan_interval_secs));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
            _ = rescan.tick() => {
                if let Err(e) = state.scene.scan().await {
                    warn!(error = %e, "Periodic scene scan failed");
                }
            }
            event = events.recv() => {
                if let Ok(event) = event {
                    log_event(&event);
                }
            }
        }
    }

    state.stop().await?;
    Ok(())
}

fn log_event(event: &PerceptionEvent) {
    match event {
        PerceptionEvent::GestureDetected(gesture) => info!(
            kind = %gesture.kind,
            hand = %gesture.hand_type,
            confidence = gesture.confidence,
            "Gesture detected"
        ),
        PerceptionEvent::ContainerDetected(detected) => {
            info!(detected, "Container state changed")
        }
        PerceptionEvent::ScanCompleted { planes, volumes } => {
            info!(planes, volumes, "Scene scan completed")
        }
        PerceptionEvent::ScanFailed => warn!("Scene scan failed"),
        PerceptionEvent::ScanStarted
        | PerceptionEvent::PassthroughStarted
        | PerceptionEvent::PassthroughStopped => {}
    }
}
