use pdgraph::core::{NodeId, ScopeEnv};

#[test]
fn global_fallback_when_no_local_frame() {
    let mut env = ScopeEnv::new();
    env.declare("x", NodeId(1));
    assert_eq!(env.resolve("x"), Some(NodeId(1)));
    assert_eq!(env.resolve("y"), None);
}

#[test]
fn innermost_frame_wins() {
    let mut env = ScopeEnv::new();
    env.declare("x", NodeId(1)); // global
    env.push_scope();
    env.declare("x", NodeId(2));
    env.push_scope();
    env.declare("x", NodeId(3));

    assert_eq!(env.resolve("x"), Some(NodeId(3)));
    env.pop_scope();
    assert_eq!(env.resolve("x"), Some(NodeId(2)));
    env.pop_scope();
    assert_eq!(env.resolve("x"), Some(NodeId(1)));
}

#[test]
fn shadowing_leaves_outer_binding_untouched() {
    let mut env = ScopeEnv::new();
    env.push_scope();
    env.declare("v", NodeId(10));
    env.push_scope();
    env.declare("v", NodeId(20));
    env.pop_scope();

    // Outer declaration survives the inner frame.
    assert_eq!(env.resolve("v"), Some(NodeId(10)));
}

#[test]
fn redeclaration_overwrites_within_one_frame() {
    let mut env = ScopeEnv::new();
    env.push_scope();
    env.declare("a", NodeId(1));
    env.declare("a", NodeId(2));
    assert_eq!(env.resolve("a"), Some(NodeId(2)));
}

#[test]
fn local_lookup_falls_back_to_global() {
    let mut env = ScopeEnv::new();
    env.declare_global("g", NodeId(7));
    env.push_scope();
    env.push_scope();
    assert_eq!(env.resolve("g"), Some(NodeId(7)));
    assert_eq!(env.depth(), 2);
}
