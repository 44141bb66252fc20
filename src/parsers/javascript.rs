use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tree_sitter::Node as TSNode;

use super::common::{extract_text, TreeSitterParser};
use crate::core::{GraphArena, NodeId};

/// Literal kinds whose source text is kept as a `value` attribute.
const LITERAL_KINDS: &[&str] = &["string", "number", "regex", "true", "false", "null", "undefined"];

/// Kinds that name something and get a `name` attribute.
const NAMED_KINDS: &[&str] = &[
    "identifier",
    "property_identifier",
    "shorthand_property_identifier",
    "shorthand_property_identifier_pattern",
    "statement_identifier",
];

/// Parses one JavaScript file into the internal node arena.
///
/// When a cached-parse companion (`foo.js` -> `foo.ast.json`) exists next to
/// the input, it is loaded instead of re-parsing, mirroring the cached
/// parse-tree path the front end accepts.
pub fn parse_file(file_path: &Path) -> Result<GraphArena> {
    let companion = companion_path(file_path);
    if companion.is_file() {
        return load_companion(&companion)
            .with_context(|| format!("invalid companion tree {}", companion.display()));
    }

    let source = TreeSitterParser::read_source(file_path)
        .with_context(|| format!("cannot read {}", file_path.display()))?;
    parse_source(&source, file_path)
}

/// Parses JavaScript source text into the internal node arena.
pub fn parse_source(source: &str, file_path: &Path) -> Result<GraphArena> {
    let mut parser = TreeSitterParser::new(tree_sitter_javascript::language())?;
    let tree = parser.parse_source(source, file_path)?;

    let mut arena = GraphArena::new();
    lower(&tree.root_node(), source.as_bytes(), None, &mut arena);
    Ok(arena)
}

/// Sibling path of the serialized-AST companion for `file_path`.
pub fn companion_path(file_path: &Path) -> PathBuf {
    file_path.with_extension("ast.json")
}

/// Loads a previously serialized arena from its JSON companion.
pub fn load_companion(companion: &Path) -> Result<GraphArena> {
    let reader = BufReader::new(File::open(companion)?);
    let arena = serde_json::from_reader(reader)?;
    Ok(arena)
}

/// Recursive lowering of the named tree-sitter nodes into arena nodes,
/// setting parent back references and `name`/`value` attributes.
fn lower(ts_node: &TSNode, source: &[u8], parent: Option<NodeId>, arena: &mut GraphArena) -> NodeId {
    let kind = ts_node.kind();
    let id = arena.add_node(kind, parent);

    if NAMED_KINDS.contains(&kind) {
        let text = extract_text(ts_node, source).to_owned();
        arena
            .node_mut(id)
            .attributes
            .insert("name".to_owned(), text);
    } else if LITERAL_KINDS.contains(&kind) {
        let text = extract_text(ts_node, source).to_owned();
        arena
            .node_mut(id)
            .attributes
            .insert("value".to_owned(), text);
    }

    let mut cursor = ts_node.walk();
    for child in ts_node.named_children(&mut cursor) {
        lower(&child, source, Some(id), arena);
    }
    id
}
