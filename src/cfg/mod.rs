//! Control-flow construction over the node arena.
//!
//! Statement-level nodes become the vertices of the control layer: containers
//! point at their first statement, siblings are chained in execution order,
//! branches point at each branch entry, and loops get a back edge from the
//! body tail to the loop header. Everything is added in place as
//! `control_edges`; the AST root is the CFG root.

use anyhow::{Context, Result};

use crate::core::{GraphArena, NodeId};

/// Adds control edges to every statement reachable from the root and
/// returns the root, now serving as CFG entry.
pub fn build_cfg(arena: &mut GraphArena) -> Result<NodeId> {
    let root = arena
        .root()
        .context("cannot build a control-flow graph over an empty tree")?;
    wire(arena, root);
    Ok(root)
}

fn wire(arena: &mut GraphArena, id: NodeId) {
    let kind = arena.node(id).kind.clone();
    match kind.as_str() {
        "program" | "statement_block" => chain_statements(arena, id),
        "if_statement" => wire_branch(arena, id),
        "while_statement" | "for_statement" | "for_in_statement" | "do_statement" => {
            wire_loop(arena, id);
        }
        "function_declaration" | "generator_function_declaration" | "function"
        | "function_expression" | "generator_function" | "arrow_function"
        | "method_definition" => {
            if let Some(body) = find_child_kind(arena, id, "statement_block") {
                arena.add_control_edge(id, body);
            }
        }
        "class_declaration" => wire_class(arena, id),
        "try_statement" => wire_try(arena, id),
        "switch_statement" => wire_switch(arena, id),
        "labeled_statement" => {
            if let Some(stmt) = first_statement_child(arena, id) {
                arena.add_control_edge(id, stmt);
            }
        }
        _ => {}
    }

    for child in arena.node(id).children.clone() {
        wire(arena, child);
    }
}

/// Container -> first statement, then sibling sequencing edges.
fn chain_statements(arena: &mut GraphArena, container: NodeId) {
    let stmts = statement_children(arena, container);
    if let Some(&first) = stmts.first() {
        arena.add_control_edge(container, first);
    }
    for pair in stmts.windows(2) {
        arena.add_control_edge(pair[0], pair[1]);
    }
}

/// Branch targets: the consequence entry and, when present, the alternative.
fn wire_branch(arena: &mut GraphArena, id: NodeId) {
    if let Some(consequence) = first_statement_child(arena, id) {
        arena.add_control_edge(id, consequence);
    }
    if let Some(else_clause) = find_child_kind(arena, id, "else_clause") {
        if let Some(alternative) = first_statement_child(arena, else_clause) {
            arena.add_control_edge(id, alternative);
        }
    }
}

/// Loop header -> body entry plus the body-tail back edge.
fn wire_loop(arena: &mut GraphArena, id: NodeId) {
    let Some(body) = last_statement_child(arena, id) else {
        return;
    };
    arena.add_control_edge(id, body);
    let tail = if arena.node(body).kind == "statement_block" {
        last_statement_child(arena, body).unwrap_or(body)
    } else {
        body
    };
    arena.add_control_edge(tail, id);
}

fn wire_class(arena: &mut GraphArena, id: NodeId) {
    if let Some(body) = find_child_kind(arena, id, "class_body") {
        for child in arena.node(body).children.clone() {
            if arena.node(child).kind == "method_definition" {
                arena.add_control_edge(id, child);
            }
        }
    }
}

fn wire_try(arena: &mut GraphArena, id: NodeId) {
    if let Some(body) = find_child_kind(arena, id, "statement_block") {
        arena.add_control_edge(id, body);
    }
    for clause in ["catch_clause", "finally_clause"] {
        if let Some(clause_id) = find_child_kind(arena, id, clause) {
            if let Some(block) = find_child_kind(arena, clause_id, "statement_block") {
                arena.add_control_edge(id, block);
            }
        }
    }
}

fn wire_switch(arena: &mut GraphArena, id: NodeId) {
    let Some(body) = find_child_kind(arena, id, "switch_body") else {
        return;
    };
    for case in arena.node(body).children.clone() {
        let case_kind = arena.node(case).kind.clone();
        if case_kind == "switch_case" || case_kind == "switch_default" {
            let stmts = statement_children(arena, case);
            if let Some(&first) = stmts.first() {
                arena.add_control_edge(id, first);
            }
            for pair in stmts.windows(2) {
                arena.add_control_edge(pair[0], pair[1]);
            }
        }
    }
}

fn statement_children(arena: &GraphArena, id: NodeId) -> Vec<NodeId> {
    arena
        .node(id)
        .children
        .iter()
        .copied()
        .filter(|&c| arena.node(c).is_statement())
        .collect()
}

fn find_child_kind(arena: &GraphArena, id: NodeId, kind: &str) -> Option<NodeId> {
    arena
        .node(id)
        .children
        .iter()
        .copied()
        .find(|&c| arena.node(c).kind == kind)
}

fn first_statement_child(arena: &GraphArena, id: NodeId) -> Option<NodeId> {
    arena
        .node(id)
        .children
        .iter()
        .copied()
        .find(|&c| arena.node(c).is_statement())
}

fn last_statement_child(arena: &GraphArena, id: NodeId) -> Option<NodeId> {
    arena
        .node(id)
        .children
        .iter()
        .copied()
        .filter(|&c| arena.node(c).is_statement())
        .last()
}
