use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Index of a node inside its [`GraphArena`].
///
/// All cross references between nodes (parent links, control edges, data
/// edges) are plain indices, so cyclic control flow never creates an
/// ownership cycle: the arena's vector is the only owner of every node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One syntactic construct, later enriched with control and data edges.
///
/// `kind` is the tree-sitter grammar kind ("program", "identifier",
/// "if_statement", ...). `attributes` carries construct-specific data such as
/// the `name` of an identifier or the `value` of a literal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub kind: String,
    pub attributes: HashMap<String, String>,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    /// Execution-order successors, added by the CFG builder.
    pub control_edges: Vec<NodeId>,
    /// Definition -> use targets, added by the data-flow resolver. This node
    /// is the definition side. Kept duplicate-free by `add_data_edge`.
    pub data_edges: Vec<NodeId>,
}

impl Node {
    fn new(kind: impl Into<String>, parent: Option<NodeId>) -> Self {
        Self {
            kind: kind.into(),
            attributes: HashMap::new(),
            children: Vec::new(),
            parent,
            control_edges: Vec::new(),
            data_edges: Vec::new(),
        }
    }

    /// Identifier name, when this node carries one.
    pub fn name(&self) -> Option<&str> {
        self.attributes.get("name").map(String::as_str)
    }

    /// Statement-level constructs are the vertices of the control-flow
    /// layer; expression scanning stops at them because they are reached
    /// through their own control edges instead.
    pub fn is_statement(&self) -> bool {
        matches!(
            self.kind.as_str(),
            "expression_statement"
                | "variable_declaration"
                | "lexical_declaration"
                | "if_statement"
                | "while_statement"
                | "do_statement"
                | "for_statement"
                | "for_in_statement"
                | "return_statement"
                | "break_statement"
                | "continue_statement"
                | "throw_statement"
                | "try_statement"
                | "switch_statement"
                | "labeled_statement"
                | "function_declaration"
                | "generator_function_declaration"
                | "class_declaration"
                | "statement_block"
                | "empty_statement"
                | "debugger_statement"
        )
    }

    /// Constructs that introduce a fresh lexical frame.
    pub fn is_scope_root(&self) -> bool {
        self.is_function() || self.kind == "statement_block"
    }

    /// Function-like constructs, declarations and expressions alike.
    pub fn is_function(&self) -> bool {
        matches!(
            self.kind.as_str(),
            "function_declaration"
                | "generator_function_declaration"
                | "function"
                | "function_expression"
                | "generator_function"
                | "arrow_function"
                | "method_definition"
        )
    }
}

/// Owning container for one file's graph. The AST parent/child relation is
/// the sole ownership relation; CFG and PDG layers only add index edges on
/// top of it, so drop order follows the vector and never the cycles.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct GraphArena {
    nodes: Vec<Node>,
}

impl GraphArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node, linking it under `parent` when given.
    pub fn add_node(&mut self, kind: impl Into<String>, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(kind, parent));
        if let Some(parent) = parent {
            self.nodes[parent.index()].children.push(id);
        }
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// The first inserted node. The front end always inserts the program
    /// node first, so this is the AST, CFG and PDG root alike.
    pub fn root(&self) -> Option<NodeId> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(NodeId(0))
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }

    pub fn add_control_edge(&mut self, from: NodeId, to: NodeId) {
        let edges = &mut self.nodes[from.index()].control_edges;
        if !edges.contains(&to) {
            edges.push(to);
        }
    }

    /// Records a definition -> use edge. Returns false when the edge was
    /// already present (re-visits along other control paths are no-ops).
    pub fn add_data_edge(&mut self, definition: NodeId, use_site: NodeId) -> bool {
        let edges = &mut self.nodes[definition.index()].data_edges;
        if edges.contains(&use_site) {
            false
        } else {
            edges.push(use_site);
            true
        }
    }

    pub fn data_edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.data_edges.len()).sum()
    }

    pub fn control_edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.control_edges.len()).sum()
    }

    /// True when `descendant` sits inside the subtree rooted at `ancestor`.
    /// Used by the resolver to tell body-entry control edges apart from
    /// sibling sequencing edges.
    pub fn is_descendant(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.node(descendant).parent;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).parent;
        }
        false
    }
}
