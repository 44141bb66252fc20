use anyhow::Result;
use petgraph::dot::Dot;
use petgraph::graph::NodeIndex;
use petgraph::{Directed, Graph};
use std::fs;
use std::path::PathBuf;

use crate::core::GraphArena;

/// Which edge layers to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Tree structure only.
    Ast,
    /// Tree plus control edges.
    Cfg,
    /// Tree plus control and data edges.
    Pdg,
}

/// What to do with a rendered graph: nothing, show it, or write it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExportMode {
    #[default]
    Off,
    Display,
    Path(PathBuf),
}

/// Renders the arena as a Graphviz DOT digraph for the requested stage.
pub fn render_dot(arena: &GraphArena, stage: Stage) -> String {
    let mut graph: Graph<String, String, Directed> = Graph::new();
    let mut indexes: Vec<NodeIndex> = Vec::with_capacity(arena.len());

    for (_, node) in arena.iter() {
        let label = match node.name() {
            Some(name) => format!("{} ({name})", node.kind),
            None => node.kind.clone(),
        };
        indexes.push(graph.add_node(label));
    }

    for (id, node) in arena.iter() {
        let from = indexes[id.index()];
        for &child in &node.children {
            graph.add_edge(from, indexes[child.index()], "child".to_owned());
        }
        if matches!(stage, Stage::Cfg | Stage::Pdg) {
            for &succ in &node.control_edges {
                graph.add_edge(from, indexes[succ.index()], "control".to_owned());
            }
        }
        if matches!(stage, Stage::Pdg) {
            for &use_site in &node.data_edges {
                graph.add_edge(from, indexes[use_site.index()], "data".to_owned());
            }
        }
    }

    format!("{}", Dot::new(&graph))
}

/// Applies the export mode: no-op, print to stdout, or write a `.dot` file.
pub fn export_graph(arena: &GraphArena, stage: Stage, mode: &ExportMode) -> Result<()> {
    match mode {
        ExportMode::Off => Ok(()),
        ExportMode::Display => {
            println!("{}", render_dot(arena, stage));
            Ok(())
        }
        ExportMode::Path(path) => {
            fs::write(path, render_dot(arena, stage))?;
            Ok(())
        }
    }
}
