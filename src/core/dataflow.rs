use std::collections::HashSet;
use std::time::{Duration, Instant};

use super::error::AnalysisError;
use super::node::{GraphArena, NodeId};
use super::scope::ScopeEnv;

/// Wall-clock budget for resolving one file, measured from resolver entry.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(60);

/// An identifier use for which no binding was reachable.
#[derive(Debug, Clone)]
pub struct UnresolvedVariable {
    pub node: NodeId,
    pub name: String,
}

/// Side output of one resolver run: the ordered unresolved-use list.
#[derive(Debug, Default)]
pub struct DataFlowReport {
    pub unresolved: Vec<UnresolvedVariable>,
}

/// Scope-aware data-flow resolution over a control-flow graph.
///
/// The traversal follows control edges rather than raw tree order, so a
/// definition before a branch reaches uses after it the way execution would.
/// Scope frames are pushed on entering functions and blocks and popped on
/// every exit path, including the timeout path. On success the arena passed
/// in carries the definition -> use edges; the CFG root is the PDG root. On
/// timeout the caller must discard the arena, no partial PDG escapes.
pub struct DataFlowResolver<'a> {
    arena: &'a mut GraphArena,
    env: ScopeEnv,
    visited: HashSet<NodeId>,
    declared: HashSet<NodeId>,
    unresolved: Vec<UnresolvedVariable>,
    unresolved_seen: HashSet<NodeId>,
    deadline: Instant,
    check_only: bool,
}

impl<'a> DataFlowResolver<'a> {
    /// Builds the PDG in place, entering the control-flow graph at `entry`.
    pub fn resolve(
        arena: &'a mut GraphArena,
        entry: NodeId,
        deadline: Duration,
    ) -> Result<DataFlowReport, AnalysisError> {
        Self::resolve_with(arena, entry, ScopeEnv::new(), deadline, false)
    }

    /// Resolution with unchanged semantics but without materializing data
    /// edges: callers that only want declaration soundness get the
    /// unresolved list faster.
    pub fn check_variables(
        arena: &'a mut GraphArena,
        entry: NodeId,
        deadline: Duration,
    ) -> Result<DataFlowReport, AnalysisError> {
        Self::resolve_with(arena, entry, ScopeEnv::new(), deadline, true)
    }

    /// Full-control entry point: caller supplies the initial environments.
    pub fn resolve_with(
        arena: &'a mut GraphArena,
        entry: NodeId,
        env: ScopeEnv,
        deadline: Duration,
        check_only: bool,
    ) -> Result<DataFlowReport, AnalysisError> {
        let mut resolver = Self {
            arena,
            env,
            visited: HashSet::new(),
            declared: HashSet::new(),
            unresolved: Vec::new(),
            unresolved_seen: HashSet::new(),
            deadline: Instant::now() + deadline,
            check_only,
        };
        resolver.visit(entry)?;
        Ok(DataFlowReport {
            unresolved: resolver.unresolved,
        })
    }

    fn check_deadline(&self) -> Result<(), AnalysisError> {
        if Instant::now() >= self.deadline {
            Err(AnalysisError::Timeout)
        } else {
            Ok(())
        }
    }

    fn visit(&mut self, id: NodeId) -> Result<(), AnalysisError> {
        self.check_deadline()?;
        if !self.visited.insert(id) {
            return Ok(());
        }

        let node = self.arena.node(id);
        let scoped = node.is_scope_root();
        let function = node.is_function();
        let declared_function = matches!(
            node.kind.as_str(),
            "function_declaration" | "generator_function_declaration"
        );

        // Successors inside the node's own subtree are body entries and
        // belong to its scope; the rest are sibling sequencing edges and
        // must be walked after the frame is popped.
        let (inner, outer): (Vec<NodeId>, Vec<NodeId>) = node
            .control_edges
            .clone()
            .into_iter()
            .partition(|&succ| self.arena.is_descendant(succ, id));

        // A declared function's name binds in the enclosing scope, before
        // the function's own frame opens.
        if declared_function {
            if let Some(name_node) = self.find_child_kind(id, "identifier") {
                self.declare_binding(name_node);
            }
        }

        if scoped {
            self.env.push_scope();
        }
        let interior = self.visit_interior(id, function, &inner);
        if scoped {
            self.env.pop_scope();
        }
        interior?;

        for succ in outer {
            self.visit(succ)?;
        }
        Ok(())
    }

    fn visit_interior(
        &mut self,
        id: NodeId,
        function: bool,
        inner: &[NodeId],
    ) -> Result<(), AnalysisError> {
        if function {
            self.declare_parameters(id);
        }
        self.scan_node(id)?;
        for &succ in inner {
            self.visit(succ)?;
        }
        Ok(())
    }

    /// Processes the declarations and identifier uses carried directly by
    /// one control-flow vertex. Descent stops at nested statements, which
    /// arrive through their own control edges.
    fn scan_node(&mut self, id: NodeId) -> Result<(), AnalysisError> {
        let kind = self.arena.node(id).kind.clone();
        match kind.as_str() {
            "variable_declaration" | "lexical_declaration" => {
                for child in self.arena.node(id).children.clone() {
                    if self.arena.node(child).kind == "variable_declarator" {
                        self.scan_declarator(child)?;
                    }
                }
            }
            // Loop headers own their init/condition/update expressions; the
            // init declaration is not part of any statement chain, so it is
            // handled here rather than through control edges.
            "for_statement" | "for_in_statement" => {
                for child in self.arena.node(id).children.clone() {
                    let child_kind = self.arena.node(child).kind.clone();
                    match child_kind.as_str() {
                        "variable_declaration" | "lexical_declaration" => {
                            self.scan_node(child)?;
                        }
                        _ => {
                            if !self.arena.node(child).is_statement() {
                                self.scan_uses(child)?;
                            }
                        }
                    }
                }
            }
            "class_declaration" => {
                if let Some(name_node) = self.find_child_kind(id, "identifier") {
                    self.declare_binding(name_node);
                }
                for child in self.arena.node(id).children.clone() {
                    let n = self.arena.node(child);
                    if n.kind != "class_body" && n.kind != "identifier" && !n.is_statement() {
                        self.scan_uses(child)?;
                    }
                }
            }
            k if self.is_function_kind(k) => {
                // Name and parameters were bound by `visit`; what is left is
                // an arrow function's bare expression body.
                for child in self.arena.node(id).children.clone() {
                    let n = self.arena.node(child);
                    if n.kind != "formal_parameters"
                        && n.kind != "identifier"
                        && !n.is_statement()
                    {
                        self.scan_uses(child)?;
                    }
                }
            }
            _ => {
                for child in self.arena.node(id).children.clone() {
                    self.scan_uses(child)?;
                }
            }
        }
        Ok(())
    }

    /// Expression descent: records identifier uses, binds catch parameters,
    /// and hands function expressions back to `visit` so they get their own
    /// frame.
    fn scan_uses(&mut self, id: NodeId) -> Result<(), AnalysisError> {
        self.check_deadline()?;
        let kind = self.arena.node(id).kind.clone();
        match kind.as_str() {
            "identifier" | "shorthand_property_identifier" => {
                self.record_use(id);
            }
            // Member property names are not variable references.
            "property_identifier" | "shorthand_property_identifier_pattern" => {}
            "catch_clause" => {
                if let Some(param) = self.find_child_kind(id, "identifier") {
                    self.declare_binding(param);
                }
                // The handler body is reached through control edges.
            }
            k if self.is_function_kind(k) => {
                self.visit(id)?;
            }
            _ => {
                if self.arena.node(id).is_statement() {
                    return Ok(());
                }
                for child in self.arena.node(id).children.clone() {
                    self.scan_uses(child)?;
                }
            }
        }
        Ok(())
    }

    /// One declarator: the first identifier is the binding, everything else
    /// is the initializer expression.
    fn scan_declarator(&mut self, id: NodeId) -> Result<(), AnalysisError> {
        let mut bound = false;
        for child in self.arena.node(id).children.clone() {
            if !bound && self.arena.node(child).kind == "identifier" {
                self.declare_binding(child);
                bound = true;
            } else {
                self.scan_uses(child)?;
            }
        }
        Ok(())
    }

    fn declare_parameters(&mut self, function: NodeId) {
        if let Some(params) = self.find_child_kind(function, "formal_parameters") {
            for child in self.arena.node(params).children.clone() {
                if self.arena.node(child).kind == "identifier" {
                    self.declare_binding(child);
                }
            }
        }
        // `x => x + 1` carries its single parameter as a bare identifier.
        if self.arena.node(function).kind == "arrow_function" {
            if let Some(param) = self.find_child_kind(function, "identifier") {
                self.declare_binding(param);
            }
        }
    }

    /// Binds the identifier node once per binding occurrence, no matter how
    /// many control paths reach it.
    fn declare_binding(&mut self, id: NodeId) {
        if !self.declared.insert(id) {
            return;
        }
        if let Some(name) = self.arena.node(id).name().map(str::to_owned) {
            self.env.declare(name, id);
        }
    }

    fn record_use(&mut self, id: NodeId) {
        let Some(name) = self.arena.node(id).name().map(str::to_owned) else {
            return;
        };
        match self.env.resolve(&name) {
            Some(definition) => {
                if !self.check_only {
                    self.arena.add_data_edge(definition, id);
                }
            }
            None => {
                if self.unresolved_seen.insert(id) {
                    self.unresolved.push(UnresolvedVariable { node: id, name });
                }
            }
        }
    }

    fn is_function_kind(&self, kind: &str) -> bool {
        matches!(
            kind,
            "function_declaration"
                | "generator_function_declaration"
                | "function"
                | "function_expression"
                | "generator_function"
                | "arrow_function"
                | "method_definition"
        )
    }

    fn find_child_kind(&self, id: NodeId, kind: &str) -> Option<NodeId> {
        self.arena
            .node(id)
            .children
            .iter()
            .copied()
            .find(|&c| self.arena.node(c).kind == kind)
    }
}
