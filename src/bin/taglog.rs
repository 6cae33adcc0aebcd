//! TagLog CLI — drive the extraction/merge engine over chunk files.
//!
//! Usage:
//!   taglog analyze --mode graph chunk1.xml chunk2.xml [--out master.json]
//!   taglog repair broken.xml

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use taglog::{AnalysisMode, AnalysisSession, RunOutput};

#[derive(Parser)]
#[command(
    name = "taglog",
    version,
    about = "Tolerant extraction, repair, and merge engine for TagLog output"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a sequence of chunk files and merge them into one result
    Analyze {
        /// Analysis mode (dashboard, graph, timeline, subtext)
        #[arg(long)]
        mode: String,
        /// Drop edges with unknown endpoints instead of stubbing them
        #[arg(long)]
        no_stub: bool,
        /// Write the merged result as JSON to this file (stdout otherwise)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Write the accumulated cleaned TagLog text to this file
        #[arg(long)]
        raw_log: Option<PathBuf>,
        /// Chunk files in order; chunk ids are 1-based file positions
        #[arg(required = true)]
        chunks: Vec<PathBuf>,
    },
    /// Repair known tag mistakes in one file and print the result
    Repair {
        /// File containing raw TagLog text
        file: PathBuf,
    },
}

fn cmd_analyze(
    mode: &str,
    no_stub: bool,
    out: Option<&Path>,
    raw_log: Option<&Path>,
    chunks: &[PathBuf],
) -> i32 {
    let mode: AnalysisMode = match mode.parse() {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("Error: {} (expected dashboard, graph, timeline, or subtext)", e);
            return 1;
        }
    };

    let mut session = AnalysisSession::new(mode).with_auto_stub(!no_stub);
    for (i, path) in chunks.iter().enumerate() {
        let chunk_id = (i + 1) as u32;
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("Error: cannot read '{}': {}", path.display(), e);
                return 1;
            }
        };
        let report = session.ingest(&text, chunk_id);
        eprintln!(
            "chunk {}: {} repairs, {} dropped, {} stubs",
            chunk_id,
            report.repairs,
            report.total_dropped(),
            report.stub_nodes_created
        );
    }

    let output = session.finish();
    print_summary(&output);

    if let Some(path) = raw_log {
        if let Err(e) = std::fs::write(path, &output.raw_log) {
            eprintln!("Error: cannot write '{}': {}", path.display(), e);
            return 1;
        }
    }

    let json = match serde_json::to_string_pretty(&output) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error: cannot serialize result: {}", e);
            return 1;
        }
    };
    match out {
        Some(path) => {
            if let Err(e) = std::fs::write(path, json) {
                eprintln!("Error: cannot write '{}': {}", path.display(), e);
                return 1;
            }
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    0
}

fn print_summary(output: &RunOutput) {
    let report = &output.report;
    eprintln!(
        "run {} ({}): {} chunks",
        output.run_id, output.mode, output.chunks_processed
    );
    eprintln!("  repairs:        {}", report.repairs);
    eprintln!(
        "  nodes:          {} raw, {} kept, {} dropped (no id)",
        report.nodes_raw, report.nodes_kept, report.nodes_dropped_empty_id
    );
    eprintln!(
        "  edges:          {} raw, {} kept, {} dropped (endpoint), {} dropped (relation), {} dropped (unknown endpoint)",
        report.edges_raw,
        report.edges_kept,
        report.edges_dropped_missing_endpoint,
        report.edges_dropped_missing_relation,
        report.edges_dropped_nonexistent_endpoint
    );
    eprintln!("  stubs created:  {}", report.stub_nodes_created);
}

fn cmd_repair(file: &Path) -> i32 {
    let text = match std::fs::read_to_string(file) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: cannot read '{}': {}", file.display(), e);
            return 1;
        }
    };
    let outcome = taglog::repair::repair(&text);
    eprintln!("{} repairs", outcome.repairs);
    println!("{}", outcome.text);
    0
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Analyze {
            mode,
            no_stub,
            out,
            raw_log,
            chunks,
        } => cmd_analyze(&mode, no_stub, out.as_deref(), raw_log.as_deref(), &chunks),
        Commands::Repair { file } => cmd_repair(&file),
    };
    std::process::exit(code);
}
