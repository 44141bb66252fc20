use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{error, info};
use walkdir::WalkDir;

use super::error::AnalysisError;
use super::node::GraphArena;
use super::pipeline::{artifact_path, FilePipeline, PipelineOptions, SOURCE_EXTENSION};
use super::queue::JobQueue;

/// Fixed size of the worker pool unless overridden.
pub const DEFAULT_WORKERS: usize = 4;

/// Bounded wait on the work queue; a worker that pops nothing within this
/// window treats the queue as exhausted and exits.
pub const QUEUE_WAIT: Duration = Duration::from_secs(2);

/// One unit of work, owned by the work queue until a single worker claims it.
#[derive(Debug, Clone)]
pub struct AnalysisTask {
    pub base_dir: PathBuf,
    pub relative_path: PathBuf,
    pub output_dir: Option<PathBuf>,
}

/// Directory-level driver: deterministic discovery, a fixed worker pool fed
/// by a shared work queue, and a result queue drained after all workers
/// finish. Workers share nothing but the two queues.
#[derive(Debug)]
pub struct BatchOrchestrator {
    workers: usize,
    deadline: Duration,
}

impl Default for BatchOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchOrchestrator {
    pub fn new() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            deadline: super::dataflow::DEFAULT_DEADLINE,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Analyzes every eligible file under `input_dir`, skipping files whose
    /// artifact already exists, and returns the (relative path, PDG) pairs
    /// newly produced in this run. A missing input directory is the only
    /// fatal error; everything else is contained to its file.
    pub fn run(
        &self,
        input_dir: &Path,
        output_dir: Option<&Path>,
    ) -> Result<Vec<(PathBuf, GraphArena)>> {
        if !input_dir.is_dir() {
            error!(path = %input_dir.display(), "input directory does not exist");
            return Err(AnalysisError::MissingInput(input_dir.to_path_buf()).into());
        }
        if let Some(out) = output_dir {
            fs::create_dir_all(out)?;
        }

        let started = Instant::now();
        let rss_before = resident_memory_kb();

        let tasks: JobQueue<AnalysisTask> = JobQueue::new();
        let results: JobQueue<(PathBuf, GraphArena)> = JobQueue::new();

        let mut scheduled = 0usize;
        let mut skipped = 0usize;
        for file in find_source_files(input_dir) {
            let relative = match file.strip_prefix(input_dir) {
                Ok(rel) => rel.to_path_buf(),
                Err(_) => continue,
            };
            if let Some(out) = output_dir {
                if artifact_path(out, &relative).is_file() {
                    skipped += 1;
                    continue;
                }
            }
            tasks.push(AnalysisTask {
                base_dir: input_dir.to_path_buf(),
                relative_path: relative,
                output_dir: output_dir.map(Path::to_path_buf),
            });
            scheduled += 1;
        }
        info!(scheduled, skipped, "scheduled batch work");

        let deadline = self.deadline;
        thread::scope(|scope| {
            for _ in 0..self.workers {
                scope.spawn(|| worker_loop(&tasks, &results, deadline));
            }
        });

        let produced = results.drain();
        info!(
            produced = produced.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            rss_delta_kb = rss_delta(rss_before),
            "batch complete"
        );
        Ok(produced)
    }
}

/// Worker body: claim one task at a time, run the per-file pipeline, push
/// successes. Failed, timed-out or unparseable files produce no entry.
fn worker_loop(
    tasks: &JobQueue<AnalysisTask>,
    results: &JobQueue<(PathBuf, GraphArena)>,
    deadline: Duration,
) {
    while let Some(task) = tasks.pop_timeout(QUEUE_WAIT) {
        let pipeline = FilePipeline::new(PipelineOptions {
            output_dir: task.output_dir.clone(),
            deadline,
            ..PipelineOptions::default()
        });
        if let Ok(analysis) = pipeline.analyze(&task.base_dir, &task.relative_path) {
            results.push((analysis.relative_path, analysis.pdg));
        }
    }
}

/// Deterministic traversal: within each directory, files in sorted name
/// order first, then depth-first recursion into subdirectories in sorted
/// name order, independent of filesystem enumeration order.
pub fn find_source_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by(|a, b| {
            (a.file_type().is_dir(), a.file_name().to_owned())
                .cmp(&(b.file_type().is_dir(), b.file_name().to_owned()))
        })
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == SOURCE_EXTENSION)
        })
        .collect()
}

#[cfg(target_os = "linux")]
fn resident_memory_kb() -> Option<u64> {
    let status = fs::read_to_string("/proc/self/status").ok()?;
    let line = status.lines().find(|l| l.starts_with("VmRSS:"))?;
    line.split_whitespace().nth(1)?.parse().ok()
}

#[cfg(not(target_os = "linux"))]
fn resident_memory_kb() -> Option<u64> {
    None
}

fn rss_delta(before: Option<u64>) -> i64 {
    match (before, resident_memory_kb()) {
        (Some(b), Some(a)) => a as i64 - b as i64,
        _ => 0,
    }
}
