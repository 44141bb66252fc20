use indexmap::IndexMap;

use super::node::NodeId;

/// Variable bindings visible at one point of the traversal.
///
/// `local` is a stack of insertion-ordered frames, innermost last; `global`
/// is one map shared across the whole file. Lookup walks the local frames
/// innermost to outermost and falls back to the global map; a miss in both
/// means the reference is unresolved.
#[derive(Debug, Default)]
pub struct ScopeEnv {
    local: Vec<IndexMap<String, NodeId>>,
    global: IndexMap<String, NodeId>,
}

impl ScopeEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a fresh innermost frame. Every push must be paired with a pop
    /// on all exit paths of the construct that introduced it.
    pub fn push_scope(&mut self) {
        self.local.push(IndexMap::new());
    }

    /// Discards the innermost frame.
    pub fn pop_scope(&mut self) {
        self.local.pop();
    }

    pub fn depth(&self) -> usize {
        self.local.len()
    }

    /// Binds `name` in the innermost frame, or globally when no local frame
    /// is active (top-level declarations). Redeclaring within the same frame
    /// overwrites; shadowing an outer frame is legal and leaves the outer
    /// binding untouched.
    pub fn declare(&mut self, name: impl Into<String>, node: NodeId) {
        let name = name.into();
        match self.local.last_mut() {
            Some(frame) => {
                frame.insert(name, node);
            }
            None => {
                self.global.insert(name, node);
            }
        }
    }

    /// Binds `name` in the file-wide global map regardless of frame depth.
    pub fn declare_global(&mut self, name: impl Into<String>, node: NodeId) {
        self.global.insert(name.into(), node);
    }

    /// Innermost-to-outermost lookup, then global.
    pub fn resolve(&self, name: &str) -> Option<NodeId> {
        for frame in self.local.iter().rev() {
            if let Some(&node) = frame.get(name) {
                return Some(node);
            }
        }
        self.global.get(name).copied()
    }
}
