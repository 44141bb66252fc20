use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::error;

use super::node::GraphArena;

/// Environment override for the executable spawned as the persistence
/// child. Defaults to the current executable; tests point it at the built
/// binary because their own process has no `persist` subcommand.
pub const PERSIST_EXE_ENV: &str = "PDGRAPH_PERSIST_EXE";

/// Binary encoding of one graph artifact. This is the call that has been
/// observed to bring a process down on pathological graphs, which is why it
/// only ever runs inside the disposable child.
pub fn write_artifact(arena: &GraphArena, path: &Path) -> Result<()> {
    let data = bincode::serialize(arena)?;
    fs::write(path, data)?;
    Ok(())
}

/// Reads a persisted artifact back into memory.
pub fn read_artifact(path: &Path) -> Result<GraphArena> {
    let data = fs::read(path)?;
    let arena = bincode::deserialize(&data)?;
    Ok(arena)
}

/// Persists the graph through a short-lived child process.
///
/// The child is this same executable invoked with the hidden `persist`
/// subcommand; the graph travels over its stdin as JSON and the child does
/// the risky binary encoding and the file write. A crashing child takes
/// nothing down with it: the parent logs the failure, removes a zero-byte
/// leftover, and keeps working on its queue.
pub fn persist_in_child(arena: &GraphArena, artifact_path: &Path) -> Result<()> {
    if let Some(parent) = artifact_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut child = Command::new(persist_executable()?)
        .arg("persist")
        .arg(artifact_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("failed to spawn persistence child")?;

    {
        let mut stdin = child
            .stdin
            .take()
            .context("persistence child has no stdin")?;
        // The child may die mid-write; a broken pipe here is just another
        // child failure and is reported through the exit status below.
        let payload = serde_json::to_vec(arena)?;
        let _ = stdin.write_all(&payload);
    }

    let status = child.wait()?;
    if !status.success() {
        error!(
            artifact = %artifact_path.display(),
            "persistence child failed, artifact not written"
        );
        remove_empty_artifact(artifact_path);
        bail!("persistence child exited with {status}");
    }
    Ok(())
}

/// Child half: decode the graph from stdin and write the artifact.
pub fn run_persist_child(artifact_path: &Path) -> Result<()> {
    let stdin = std::io::stdin();
    let arena: GraphArena = serde_json::from_reader(BufReader::new(stdin.lock()))?;
    write_artifact(&arena, artifact_path)
}

/// Never leave a truncated or empty artifact behind a crashed child.
fn remove_empty_artifact(path: &Path) {
    if let Ok(metadata) = fs::metadata(path) {
        if metadata.is_file() && metadata.len() == 0 {
            let _ = fs::remove_file(path);
        }
    }
}

fn persist_executable() -> Result<PathBuf> {
    match env::var_os(PERSIST_EXE_ENV) {
        Some(exe) => Ok(PathBuf::from(exe)),
        None => env::current_exe().context("cannot locate current executable"),
    }
}
