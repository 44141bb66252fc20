use pdgraph::parsers::{companion_path, parse_file, parse_source};
use std::fs;
use std::path::Path;

#[test]
fn parse_source_builds_rooted_tree_with_attributes() {
    let arena = parse_source("var answer = 42;\n", Path::new("t.js")).unwrap();
    let root = arena.root().unwrap();
    assert_eq!(arena.node(root).kind, "program");
    assert!(arena.node(root).parent.is_none());

    let (ident_id, ident) = arena
        .iter()
        .find(|(_, n)| n.kind == "identifier")
        .expect("identifier node");
    assert_eq!(ident.name(), Some("answer"));
    assert!(ident.parent.is_some());

    // Parent/child links agree.
    let parent = ident.parent.unwrap();
    assert!(arena.node(parent).children.contains(&ident_id));

    let (_, literal) = arena
        .iter()
        .find(|(_, n)| n.kind == "number")
        .expect("number literal");
    assert_eq!(literal.attributes.get("value").map(String::as_str), Some("42"));
}

#[test]
fn fresh_arena_has_no_edges() {
    let arena = parse_source("var a = 1;\na;\n", Path::new("t.js")).unwrap();
    assert_eq!(arena.control_edge_count(), 0);
    assert_eq!(arena.data_edge_count(), 0);
}

#[test]
fn companion_tree_is_used_instead_of_reparsing() {
    let dir = tempfile::TempDir::new().unwrap();
    let source_path = dir.path().join("app.js");
    fs::write(&source_path, "var real = 1;\n").unwrap();

    // The companion holds a different tree; loading it proves it won.
    let companion = parse_source("var cached = 1;\ncached;\n", Path::new("app.js")).unwrap();
    let companion_file = companion_path(&source_path);
    assert_eq!(companion_file, dir.path().join("app.ast.json"));
    fs::write(&companion_file, serde_json::to_vec(&companion).unwrap()).unwrap();

    let arena = parse_file(&source_path).unwrap();
    assert_eq!(arena.len(), companion.len());
    assert!(arena
        .iter()
        .any(|(_, n)| n.kind == "identifier" && n.name() == Some("cached")));
}

#[test]
fn missing_file_is_a_parse_failure() {
    assert!(parse_file(Path::new("/nonexistent/nowhere.js")).is_err());
}
