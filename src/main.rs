use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

mod cfg;
mod core;
mod export;
mod parsers;

use crate::core::batch::BatchOrchestrator;
use crate::core::persist;
use crate::core::pipeline::{FilePipeline, PipelineOptions};
use crate::core::DEFAULT_WORKERS;
use crate::export::ExportMode;

#[derive(Debug, Parser)]
#[command(
    name = "pdgraph",
    version = "0.1.0",
    author = "pdgraph developers",
    about = "Program dependence graph generation for JavaScript sources"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze one JavaScript file
    File {
        /// Path of the file to analyze
        input: PathBuf,

        /// Directory to store the graph artifact in
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Only check variable declarations; print undeclared names
        #[arg(long)]
        check: bool,

        /// Export the AST stage (no value: display; with value: write DOT file)
        #[arg(long, value_name = "PATH", num_args = 0..=1)]
        export_ast: Option<Option<PathBuf>>,

        /// Export the CFG stage (no value: display; with value: write DOT file)
        #[arg(long, value_name = "PATH", num_args = 0..=1)]
        export_cfg: Option<Option<PathBuf>>,

        /// Export the PDG stage (no value: display; with value: write DOT file)
        #[arg(long, value_name = "PATH", num_args = 0..=1)]
        export_pdg: Option<Option<PathBuf>>,
    },

    /// Analyze every .js file under a directory
    Dir {
        /// Root directory to traverse
        input: PathBuf,

        /// Directory to store graph artifacts in
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Number of parallel workers
        #[arg(short = 'j', long, default_value_t = DEFAULT_WORKERS)]
        workers: usize,
    },

    /// Child half of crash-isolated persistence (internal)
    #[command(hide = true)]
    Persist {
        /// Artifact path to write
        artifact: PathBuf,
    },
}

fn export_mode(flag: Option<Option<PathBuf>>) -> ExportMode {
    match flag {
        None => ExportMode::Off,
        Some(None) => ExportMode::Display,
        Some(Some(path)) => ExportMode::Path(path),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Command::Persist { artifact } = &cli.command {
        // No subscriber in the child: it is disposable and mute.
        return persist::run_persist_child(artifact);
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match cli.command {
        Command::File {
            input,
            output,
            check,
            export_ast,
            export_cfg,
            export_pdg,
        } => {
            let options = PipelineOptions {
                output_dir: output,
                export_ast: export_mode(export_ast),
                export_cfg: export_mode(export_cfg),
                export_pdg: export_mode(export_pdg),
                ..PipelineOptions::default()
            };
            let pipeline = FilePipeline::new(options);
            let base = input.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
            let file = PathBuf::from(input.file_name().unwrap_or(input.as_os_str()));

            if check {
                let unresolved = pipeline.check(&base, &file)?;
                if unresolved.is_empty() {
                    println!("All variables resolved.");
                } else {
                    for name in unresolved {
                        println!("undeclared: {name}");
                    }
                }
            } else {
                let analysis = pipeline.analyze(&base, &file)?;
                println!(
                    "{}: {} nodes, {} control edges, {} data edges, {} unresolved",
                    input.display(),
                    analysis.pdg.len(),
                    analysis.pdg.control_edge_count(),
                    analysis.pdg.data_edge_count(),
                    analysis.unresolved.len()
                );
            }
        }
        Command::Dir {
            input,
            output,
            workers,
        } => {
            let start = Instant::now();
            let orchestrator = BatchOrchestrator::new().with_workers(workers);
            let produced = orchestrator.run(&input, output.as_deref())?;
            println!(
                "Produced {} graph(s) in {:.2}s",
                produced.len(),
                start.elapsed().as_secs_f64()
            );
        }
        Command::Persist { .. } => unreachable!("handled above"),
    }

    Ok(())
}
