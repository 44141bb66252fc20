use pdgraph::core::batch::{find_source_files, BatchOrchestrator};
use pdgraph::core::persist::PERSIST_EXE_ENV;
use std::fs;
use std::path::Path;
use std::time::Duration;

fn use_built_binary_for_persistence() {
    std::env::set_var(PERSIST_EXE_ENV, env!("CARGO_BIN_EXE_pdgraph"));
}

#[test]
fn traversal_is_deterministic_files_before_subdirectories() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("lib")).unwrap();
    fs::create_dir_all(root.join("app")).unwrap();
    fs::write(root.join("z.js"), "var z = 1;\n").unwrap();
    fs::write(root.join("a.js"), "var a = 1;\n").unwrap();
    fs::write(root.join("lib/util.js"), "var u = 1;\n").unwrap();
    fs::write(root.join("app/main.js"), "var m = 1;\n").unwrap();
    fs::write(root.join("notes.txt"), "ignored").unwrap();

    let files = find_source_files(root);
    let relative: Vec<_> = files
        .iter()
        .map(|f| f.strip_prefix(root).unwrap().to_path_buf())
        .collect();

    // Files in sorted order first, then sorted subdirectories, depth first.
    assert_eq!(
        relative,
        vec![
            Path::new("a.js").to_path_buf(),
            Path::new("z.js").to_path_buf(),
            Path::new("app/main.js").to_path_buf(),
            Path::new("lib/util.js").to_path_buf(),
        ]
    );

    // Unmodified tree, identical order on a second walk.
    assert_eq!(find_source_files(root), files);
}

#[test]
fn missing_input_directory_is_fatal_and_does_no_work() {
    let result = BatchOrchestrator::new().run(Path::new("/nonexistent/input"), None);
    assert!(result.is_err());
}

#[test]
fn batch_analyzes_declared_and_undeclared_files() {
    use_built_binary_for_persistence();
    let dir = tempfile::TempDir::new().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    fs::create_dir_all(&input).unwrap();
    fs::write(input.join("a.js"), "var x = 1;\nx;\n").unwrap();
    fs::write(input.join("b.js"), "y;\n").unwrap();

    let orchestrator = BatchOrchestrator::new().with_workers(2);
    let mut produced = orchestrator.run(&input, Some(&output)).unwrap();
    produced.sort_by(|a, b| a.0.cmp(&b.0));

    // Unresolved variables are non-fatal: both files yield a PDG.
    assert_eq!(produced.len(), 2);
    assert_eq!(produced[0].0, Path::new("a.js"));
    assert_eq!(produced[1].0, Path::new("b.js"));
    assert_eq!(produced[0].1.data_edge_count(), 1);
    assert_eq!(produced[1].1.data_edge_count(), 0);

    assert!(output.join("a.pdg").is_file());
    assert!(output.join("b.pdg").is_file());
}

#[test]
fn rerun_skips_existing_artifacts() {
    use_built_binary_for_persistence();
    let dir = tempfile::TempDir::new().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    fs::create_dir_all(&input).unwrap();
    fs::write(input.join("one.js"), "var v = 1;\nv;\n").unwrap();

    let orchestrator = BatchOrchestrator::new().with_workers(1);
    let first = orchestrator.run(&input, Some(&output)).unwrap();
    assert_eq!(first.len(), 1);

    // Second run: the artifact exists, the file is skipped entirely.
    let second = orchestrator.run(&input, Some(&output)).unwrap();
    assert!(second.is_empty());
}

#[test]
fn timed_out_file_does_not_stop_the_batch() {
    let dir = tempfile::TempDir::new().unwrap();
    let input = dir.path().join("in");
    fs::create_dir_all(&input).unwrap();
    fs::write(input.join("a.js"), "var x = 1;\nx;\n").unwrap();

    // A zero deadline forces every resolver call to time out; the batch
    // still completes and simply produces nothing.
    let orchestrator = BatchOrchestrator::new()
        .with_workers(1)
        .with_deadline(Duration::ZERO);
    let produced = orchestrator.run(&input, None).unwrap();
    assert!(produced.is_empty());
}

#[test]
fn nested_directories_produce_nested_artifacts() {
    use_built_binary_for_persistence();
    let dir = tempfile::TempDir::new().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    fs::create_dir_all(input.join("pkg")).unwrap();
    fs::write(input.join("pkg/mod.js"), "var k = 1;\nk;\n").unwrap();

    let produced = BatchOrchestrator::new()
        .with_workers(2)
        .run(&input, Some(&output))
        .unwrap();

    assert_eq!(produced.len(), 1);
    assert_eq!(produced[0].0, Path::new("pkg/mod.js"));
    assert!(output.join("pkg/mod.pdg").is_file());
}
