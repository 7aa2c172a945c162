//! # MK-Lottery Context
//!
//! Runs one control surface and one display surface over a shared record
//! file. Start several processes against the same `MK_DATA_FILE` to get
//! several contexts contending for the lease. They exchange events through
//! an append-only log next to the record file (`MK_EVENT_LOG`).
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry
//! 2. Load `RuntimeConfig` from the environment
//! 3. Open the file-backed store and the event log, start tailing the log
//! 4. Merge-load the record
//! 5. Start the display task
//! 6. Read commands until `quit`, EOF or Ctrl+C

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

use lottery_runtime::commands::HELP;
use lottery_runtime::console::{describe_action, describe_report};
use lottery_runtime::{Command, RuntimeConfig};
use lottery_telemetry::{encode_metrics, init_telemetry, TelemetryConfig};
use mk_01_state_store::{FileBackedKVStore, LoadReport, SharedStore};
use mk_02_lease_lock::SystemTimeSource;
use mk_03_draw_engine::ThreadRandomSource;
use mk_04_display_gatekeeper::DisplaySurface;
use mk_05_control_surface::ControlSurface;
use shared_bus::FileEventLog;

/// Run one operator command. Returns `false` when the operator asked to quit.
async fn dispatch(control: &mut ControlSurface, command: Command) -> Result<bool> {
    match command {
        Command::SubmitDeck { mode, text } => match control.submit_deck(&text, mode).await {
            Ok(normalized) => println!(
                "deck saved ({} items, {mode}): {}",
                normalized.lines().count(),
                normalized.replace('\n', " | ")
            ),
            Err(e) => println!("{e}"),
        },
        Command::Draw(player) => match control.trigger_draw(player).await {
            Ok(report) => println!("{}", describe_report(player, &report)),
            Err(e) => println!("{e}"),
        },
        Command::Reset { confirm } => match control.reset_game(confirm).await {
            Ok(()) => println!("game reset"),
            Err(e) => println!("{e} (use `reset confirm`)"),
        },
        Command::Layout { x, y, scale } => match control.update_layout(x, y, scale).await {
            Ok(layout) => println!("layout x={} y={} scale={}", layout.x, layout.y, layout.scale),
            Err(e) => println!("{e}"),
        },
        Command::Reload => control.reload_display().await,
        Command::SelectMode(mode) => {
            control.select_mode(mode);
            println!("mode: {mode}");
        }
        Command::Status => println!("{}", control.status()),
        Command::Metrics => print!("{}", encode_metrics().context("failed to encode metrics")?),
        Command::Help => println!("{HELP}"),
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry =
        init_telemetry(TelemetryConfig::from_env()).context("failed to initialize telemetry")?;
    let config = RuntimeConfig::from_env().context("invalid runtime configuration")?;

    let store: SharedStore = Arc::new(
        FileBackedKVStore::new(&config.data_file)
            .with_context(|| format!("failed to open {}", config.data_file.display()))?,
    );
    let event_log = config.event_log_path();
    let bus = Arc::new(
        FileEventLog::open(&event_log)
            .with_context(|| format!("failed to open {}", event_log.display()))?,
    );
    let _tail = bus.spawn_tail();

    let mut control = ControlSurface::new(
        config.control_config(),
        store,
        bus.clone(),
        Arc::new(SystemTimeSource),
        Arc::new(ThreadRandomSource),
    );
    let mut incoming = bus.subscribe(control.filter());

    match control.open().context("failed to load the shared record")? {
        LoadReport::Corrupt { reason } => {
            warn!(reason = %reason, "Shared record unreadable, starting from memory");
        }
        LoadReport::Missing => info!("No shared record yet, submit a deck to start"),
        LoadReport::Loaded(_) => {}
    }

    let (actions_tx, mut actions_rx) = mpsc::channel(64);
    let display = DisplaySurface::new(config.remote_reset_policy);
    tokio::spawn(display.run(bus.subscribe(DisplaySurface::filter()), actions_tx));
    tokio::spawn(async move {
        while let Some(action) = actions_rx.recv().await {
            println!("{}", describe_action(&action));
        }
    });

    info!(
        context = %control.context_id(),
        data_file = %config.data_file.display(),
        event_log = %event_log.display(),
        "MK-Lottery context running. Type `help` for commands."
    );
    println!("{}", control.status());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(command) => {
                        if !dispatch(&mut control, command).await? {
                            break;
                        }
                    }
                    Err(e) => println!("{e}"),
                }
            }
            Some(envelope) = incoming.recv() => {
                if let Err(e) = control.handle_event(&envelope) {
                    warn!(error = %e, kind = envelope.event.kind(), "Failed to apply event");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    Ok(())
}
