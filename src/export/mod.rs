//! Graph exporters: Graphviz DOT renderings of the AST, CFG and PDG layers.
//! The core never inspects the rendered output; it only hands it to stdout
//! or a file according to the requested [`ExportMode`].

mod dot;

pub use dot::{export_graph, render_dot, ExportMode, Stage};
