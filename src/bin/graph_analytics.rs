//! Graph Analytics command line
//!
//! Works on graph files in the versioned JSON format of
//! [`JsonGraphPersistence`].
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: Log level filter (default: graph_analytics=info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: pretty)
//!
//! Logs go to stderr; reports go to stdout unless `--output` is given.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --features cli -- merge merged.json app.json lib.json
//! cargo run --features cli -- analyze merged.json analyzed.json
//! cargo run --features cli -- validate --rules rules.json --vertex :app analyzed.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use graph_analytics::{
    compare_graphs, inspect, validate_graphs, AnalysisPipeline, AnalyticsGraph,
    InspectionOptions, JsonGraphPersistence, SharedPersistence, ValidationConfig,
};

#[derive(Debug, Parser)]
#[command(name = "graph-analytics", version, about = "Module dependency graph analytics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Merge contributed graphs into one graph (later inputs win)
    Merge {
        /// Where to write the merged graph
        output: PathBuf,
        /// Graphs to merge, in order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Annotate a graph with degree, network expansion and height metrics
    Analyze {
        /// Graph to analyze
        input: PathBuf,
        /// Where to write the annotated graph
        output: PathBuf,
    },
    /// Compare two snapshots of the same graph
    Compare {
        /// Original graph
        before: PathBuf,
        /// Changed graph
        after: PathBuf,
        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Inspect cycles, heaviest dependencies and the dependency tree of a vertex
    Inspect {
        /// Graph to inspect
        graph: PathBuf,
        /// Path of the vertex to inspect
        #[arg(long)]
        vertex: String,
        /// Cycle detection budget in seconds
        #[arg(long, default_value_t = 300)]
        max_traversal_secs: u64,
        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a vertex against a rule configuration
    Validate {
        /// JSON rule configuration
        #[arg(long, env = "GRAPH_ANALYTICS_RULES")]
        rules: PathBuf,
        /// Path of the vertex to validate
        #[arg(long)]
        vertex: String,
        /// Graphs to validate the vertex in
        #[arg(required = true)]
        graphs: Vec<PathBuf>,
        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "graph_analytics=info".into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .flatten_event(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
    }
}

fn write_report(report: &str, output: Option<&Path>) -> std::io::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, report)?;
            info!(path = %path.display(), "report written");
            Ok(())
        }
        None => {
            print!("{}", report);
            Ok(())
        }
    }
}

fn run(command: Command) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let store = SharedPersistence::new(JsonGraphPersistence::new());

    match command {
        Command::Merge { output, inputs } => {
            let graphs = inputs
                .iter()
                .map(|path| store.load(path))
                .collect::<Result<Vec<_>, _>>()?;
            let merged = AnalyticsGraph::merge_all(graphs.iter().map(|g| g.as_ref()))?;
            store.save(&merged, &output)?;
            info!(
                inputs = inputs.len(),
                vertices = merged.vertex_count(),
                edges = merged.edge_count(),
                fingerprint = %merged.fingerprint()?,
                "graphs merged"
            );
        }
        Command::Analyze { input, output } => {
            let mut graph = store.load(&input)?.as_ref().clone();
            AnalysisPipeline::standard().run(&mut graph)?;
            store.save(&graph, &output)?;
        }
        Command::Compare { before, after, output } => {
            let before = store.load(&before)?;
            let after = store.load(&after)?;
            write_report(&compare_graphs(&before, &after).render(), output.as_deref())?;
        }
        Command::Inspect {
            graph,
            vertex,
            max_traversal_secs,
            output,
        } => {
            let graph = store.load(&graph)?;
            let options = InspectionOptions {
                max_traversal: std::time::Duration::from_secs(max_traversal_secs),
                ..Default::default()
            };
            write_report(&inspect(&graph, &vertex, &options)?, output.as_deref())?;
        }
        Command::Validate {
            rules,
            vertex,
            graphs,
            output,
        } => {
            let config = ValidationConfig::from_json(&fs::read_to_string(&rules)?)?;
            let loaded = graphs
                .iter()
                .map(|path| Ok((path.display().to_string(), store.load(path)?)))
                .collect::<Result<Vec<_>, graph_analytics::PersistenceError>>()?;

            let run = validate_graphs(
                loaded.iter().map(|(id, graph)| (id.clone(), graph.as_ref())),
                &vertex,
                &config,
            );
            write_report(&run.report, output.as_deref())?;
            if !run.is_success() {
                error!(errors = run.error_count, "graph validation failed");
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
