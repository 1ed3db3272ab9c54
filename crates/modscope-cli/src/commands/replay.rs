//! Replay a recorded lifecycle trace through the tracker.
//!
//! A trace is a JSON file describing a scripted runtime (modules with
//! their resource roots and satisfied requirements) plus the lifecycle
//! events to deliver, in order. Replaying one produces the same CSV
//! report set a live run would.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;

use modscope::prelude::*;
use modscope_core::{event, state};
use modscope_report::DEFAULT_REPORT_DIR;

use crate::OutputFormat;

/// Arguments for the replay command.
#[derive(Args)]
pub struct ReplayArgs {
    /// The trace file to replay (JSON)
    pub trace: PathBuf,

    /// Directory to write the CSV report set into
    #[arg(short, long, default_value = DEFAULT_REPORT_DIR)]
    pub out: PathBuf,

    /// Also print the K slowest-resolving modules
    #[arg(long, value_name = "K")]
    pub slowest: Option<usize>,
}

/// A full trace: the scripted runtime plus the events to deliver.
#[derive(Debug, Deserialize)]
struct TraceFile {
    /// Modules known to the scripted host.
    #[serde(default)]
    modules: Vec<TraceModule>,
    /// Lifecycle events, in delivery order.
    #[serde(default)]
    events: Vec<TraceEvent>,
}

#[derive(Debug, Deserialize)]
struct TraceModule {
    name: String,
    version: String,
    #[serde(default)]
    roots: Vec<PathBuf>,
    #[serde(default)]
    requires: Vec<WiringRequirement>,
}

#[derive(Debug, Deserialize)]
struct TraceEvent {
    name: String,
    version: String,
    event: TraceEventKind,
}

/// Event vocabulary accepted in traces.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum TraceEventKind {
    Installed,
    Resolved,
    Started,
    Starting,
    Stopping,
    Stopped,
    Unresolved,
    Updated,
    Uninstalled,
    LazyActivation,
}

impl TraceEventKind {
    /// The raw event code and the module state code after it.
    fn codes(self) -> (u32, u32) {
        match self {
            TraceEventKind::Installed => (event::codes::INSTALLED, state::codes::INSTALLED),
            TraceEventKind::Resolved => (event::codes::RESOLVED, state::codes::RESOLVED),
            TraceEventKind::Started => (event::codes::STARTED, state::codes::ACTIVE),
            TraceEventKind::Starting => (event::codes::STARTING, state::codes::STARTING),
            TraceEventKind::Stopping => (event::codes::STOPPING, state::codes::STOPPING),
            TraceEventKind::Stopped => (event::codes::STOPPED, state::codes::RESOLVED),
            TraceEventKind::Unresolved => (event::codes::UNRESOLVED, state::codes::INSTALLED),
            TraceEventKind::Updated => (event::codes::UPDATED, state::codes::INSTALLED),
            TraceEventKind::Uninstalled => {
                (event::codes::UNINSTALLED, state::codes::UNINSTALLED)
            }
            TraceEventKind::LazyActivation => {
                (event::codes::LAZY_ACTIVATION, state::codes::STARTING)
            }
        }
    }
}

/// Execute the replay command.
pub fn execute(
    args: ReplayArgs,
    config_path: Option<PathBuf>,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let config = load_config(config_path)?;

    let raw = std::fs::read_to_string(&args.trace)
        .with_context(|| format!("reading trace {}", args.trace.display()))?;
    let trace: TraceFile = serde_json::from_str(&raw)
        .with_context(|| format!("parsing trace {}", args.trace.display()))?;

    tracing::info!(
        modules = trace.modules.len(),
        events = trace.events.len(),
        "replaying trace"
    );

    let host = SimHost::new();
    for module in &trace.modules {
        host.register(
            ModuleKey::new(&module.name, &module.version),
            module.roots.clone(),
            module.requires.clone(),
        );
    }

    let session = Modscope::builder(Arc::new(host)).with_config(config).build();
    for event in &trace.events {
        let (event_code, state_code) = event.event.codes();
        session.on_event(&RawModuleEvent::new(
            ModuleKey::new(&event.name, &event.version),
            event_code,
            state_code,
        ));
    }

    let set = session.assemble();
    let mut sink = CsvDirSink::new(&args.out);
    set.write_to(&mut sink)?;

    let slowest = args
        .slowest
        .map(|k| session.slowest(k))
        .unwrap_or_default();

    if quiet {
        return Ok(());
    }

    match format {
        OutputFormat::Human => {
            println!(
                "Replayed {} events over {} modules",
                trace.events.len(),
                session.snapshot().len()
            );
            println!("Report {} written to {}", set.run_id, args.out.display());
            for (rank, (key, latency)) in slowest.iter().enumerate() {
                println!("  #{} {} resolved in {:?}", rank + 1, key, latency);
            }
        }
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "run_id": set.run_id,
                "out": args.out,
                "events": trace.events.len(),
                "modules": session.snapshot().len(),
                "slowest": slowest
                    .iter()
                    .map(|(key, latency)| {
                        serde_json::json!({
                            "module": key.to_string(),
                            "latency_ns": latency.as_nanos() as u64,
                        })
                    })
                    .collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<TrackerConfig> {
    let Some(path) = path else {
        return Ok(TrackerConfig::default());
    };
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use modscope_report::names;

    const TRACE: &str = r#"{
        "modules": [
            { "name": "provider", "version": "2.0.0" },
            {
                "name": "consumer",
                "version": "1.0.0",
                "requires": [
                    {
                        "kind": "package",
                        "provider": { "name": "provider", "version": "2.0.0" },
                        "package": "provider.api"
                    }
                ]
            }
        ],
        "events": [
            { "name": "provider", "version": "2.0.0", "event": "installed" },
            { "name": "consumer", "version": "1.0.0", "event": "installed" },
            { "name": "provider", "version": "2.0.0", "event": "resolved" },
            { "name": "consumer", "version": "1.0.0", "event": "resolved" },
            { "name": "consumer", "version": "1.0.0", "event": "started" }
        ]
    }"#;

    #[test]
    fn test_trace_parses() {
        let trace: TraceFile = serde_json::from_str(TRACE).unwrap();
        assert_eq!(trace.modules.len(), 2);
        assert_eq!(trace.events.len(), 5);
        assert_eq!(trace.modules[1].requires.len(), 1);
    }

    #[test]
    fn test_event_kind_codes() {
        let (event_code, state_code) = TraceEventKind::Resolved.codes();
        assert_eq!(event_code, event::codes::RESOLVED);
        assert_eq!(state_code, state::codes::RESOLVED);

        let (event_code, state_code) = TraceEventKind::Stopped.codes();
        assert_eq!(event_code, event::codes::STOPPED);
        // A stopped module is still resolved.
        assert_eq!(state_code, state::codes::RESOLVED);
    }

    #[test]
    fn test_replay_writes_the_report_set() {
        let dir = tempfile::tempdir().unwrap();
        let trace_path = dir.path().join("trace.json");
        std::fs::write(&trace_path, TRACE).unwrap();
        let out = dir.path().join("framework-metadata");

        let args = ReplayArgs {
            trace: trace_path,
            out: out.clone(),
            slowest: Some(1),
        };
        execute(args, None, OutputFormat::Human, true).unwrap();

        let states =
            std::fs::read_to_string(out.join(format!("{}.csv", names::MODULE_STATES))).unwrap();
        assert!(states.starts_with("Bundle,State\n"));
        assert!(states.contains("consumer_1.0.0,ACTIVE"));
        assert!(states.contains("provider_2.0.0,RESOLVED"));

        let wirings =
            std::fs::read_to_string(out.join(format!("{}.csv", names::WIRINGS))).unwrap();
        assert!(wirings.contains("consumer_1.0.0,package,provider_2.0.0,provider.api"));
    }

    #[test]
    fn test_malformed_trace_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let trace_path = dir.path().join("trace.json");
        std::fs::write(&trace_path, "{ not json").unwrap();

        let args = ReplayArgs {
            trace: trace_path,
            out: dir.path().join("out"),
            slowest: None,
        };
        assert!(execute(args, None, OutputFormat::Human, true).is_err());
    }
}
