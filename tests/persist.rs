use pdgraph::core::persist::{persist_in_child, read_artifact, write_artifact, PERSIST_EXE_ENV};
use pdgraph::parsers::parse_source;
use std::fs;
use std::path::Path;

#[test]
fn artifact_round_trips_through_binary_encoding() {
    let dir = tempfile::TempDir::new().unwrap();
    let arena = parse_source("var x = 1;\nx;\n", Path::new("t.js")).unwrap();

    let path = dir.path().join("t.pdg");
    write_artifact(&arena, &path).unwrap();
    let restored = read_artifact(&path).unwrap();
    assert_eq!(restored.len(), arena.len());
}

// This test owns the whole test binary's persistence override, so it lives
// in its own integration-test file: a failing child must not leak into the
// other suites.
#[test]
fn crashed_child_removes_empty_artifact_and_reports_failure() {
    std::env::set_var(PERSIST_EXE_ENV, "/bin/false");
    let dir = tempfile::TempDir::new().unwrap();
    let arena = parse_source("var x = 1;\n", Path::new("t.js")).unwrap();

    let artifact = dir.path().join("broken.pdg");
    // Simulate the truncated leftover of a crashed serializer.
    fs::write(&artifact, b"").unwrap();

    let result = persist_in_child(&arena, &artifact);
    assert!(result.is_err());
    assert!(!artifact.exists(), "empty artifact must be cleaned up");
}
