use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, warn};

use super::dataflow::{DataFlowResolver, DEFAULT_DEADLINE};
use super::error::AnalysisError;
use super::node::GraphArena;
use super::persist;
use crate::cfg;
use crate::export::{export_graph, ExportMode, Stage};
use crate::parsers;

/// Suffix of eligible source files.
pub const SOURCE_EXTENSION: &str = "js";
/// Suffix of persisted graph artifacts.
pub const ARTIFACT_EXTENSION: &str = "pdg";

/// Where the artifact for `relative_path` lives under `output_dir`: same
/// relative path, source extension replaced by the artifact extension.
pub fn artifact_path(output_dir: &Path, relative_path: &Path) -> PathBuf {
    output_dir.join(relative_path.with_extension(ARTIFACT_EXTENSION))
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Persist artifacts under this directory when set.
    pub output_dir: Option<PathBuf>,
    /// Wall-clock budget for the data-flow resolver.
    pub deadline: Duration,
    pub export_ast: ExportMode,
    pub export_cfg: ExportMode,
    pub export_pdg: ExportMode,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            output_dir: None,
            deadline: DEFAULT_DEADLINE,
            export_ast: ExportMode::Off,
            export_cfg: ExportMode::Off,
            export_pdg: ExportMode::Off,
        }
    }
}

/// Successful analysis of one file.
#[derive(Debug)]
pub struct FileAnalysis {
    pub relative_path: PathBuf,
    pub pdg: GraphArena,
    /// Names of identifier uses with no reachable declaration. Non-fatal:
    /// the PDG is still produced and persisted.
    pub unresolved: Vec<String>,
}

/// AST -> CFG -> PDG for a single file, with optional stage exports and
/// crash-isolated persistence. Every failure is contained to the file.
#[derive(Debug, Clone, Default)]
pub struct FilePipeline {
    options: PipelineOptions,
}

impl FilePipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self { options }
    }

    /// Produces the PDG for `base_dir/relative_path`. Parse failures and
    /// timeouts are logged here and surface as errors; no partial result
    /// ever escapes (the whole arena is dropped on the timeout path).
    pub fn analyze(&self, base_dir: &Path, relative_path: &Path) -> Result<FileAnalysis> {
        let input = base_dir.join(relative_path);

        let mut arena = match parsers::parse_file(&input) {
            Ok(arena) => arena,
            Err(err) => {
                warn!(file = %input.display(), error = %err, "skipping unparseable file");
                return Err(err);
            }
        };
        export_graph(&arena, Stage::Ast, &self.options.export_ast)?;

        let entry = cfg::build_cfg(&mut arena)?;
        export_graph(&arena, Stage::Cfg, &self.options.export_cfg)?;

        let report = match DataFlowResolver::resolve(&mut arena, entry, self.options.deadline) {
            Ok(report) => report,
            Err(AnalysisError::Timeout) => {
                error!(file = %input.display(), "timed out while resolving data flow");
                return Err(AnalysisError::Timeout.into());
            }
            Err(err) => return Err(err.into()),
        };
        export_graph(&arena, Stage::Pdg, &self.options.export_pdg)?;

        for unresolved in &report.unresolved {
            warn!(
                variable = %unresolved.name,
                file = %input.display(),
                "variable is not declared"
            );
        }

        if let Some(output_dir) = &self.options.output_dir {
            let artifact = artifact_path(output_dir, relative_path);
            // A crashed persistence child was already logged; the analysis
            // itself still counts and the worker moves on.
            if persist::persist_in_child(&arena, &artifact).is_ok() {
                debug!(artifact = %artifact.display(), "stored graph artifact");
            }
        }

        Ok(FileAnalysis {
            relative_path: relative_path.to_path_buf(),
            pdg: arena,
            unresolved: report.unresolved.into_iter().map(|u| u.name).collect(),
        })
    }

    /// Check-only mode: same resolution semantics, but only the unresolved
    /// names come back and nothing is exported or persisted.
    pub fn check(&self, base_dir: &Path, relative_path: &Path) -> Result<Vec<String>> {
        let input = base_dir.join(relative_path);
        let mut arena = parsers::parse_file(&input)?;
        let entry = cfg::build_cfg(&mut arena)?;
        let report = DataFlowResolver::check_variables(&mut arena, entry, self.options.deadline)?;
        Ok(report.unresolved.into_iter().map(|u| u.name).collect())
    }
}
