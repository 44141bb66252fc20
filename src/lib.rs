//! # PDGRAPH
//!
//! Program dependence graph generation for JavaScript static analysis.
//!
//! PDGRAPH parses JavaScript sources into a node arena, layers control-flow
//! edges over the tree, then runs a scope-aware data-flow resolution that
//! adds definition-to-use edges and reports undeclared identifiers. Batches
//! of files are processed by a fixed worker pool with crash-isolated
//! artifact persistence, so one pathological file never takes the run down.
//!
//! ## Layers
//!
//! - **AST**: the syntax tree, one arena per file
//! - **CFG**: execution-order edges added in place
//! - **PDG**: definition -> use data edges added by the resolver

pub mod cfg;
pub mod core;
pub mod export;
pub mod parsers;
