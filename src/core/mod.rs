pub mod batch;
pub mod dataflow;
pub mod error;
pub mod node;
pub mod persist;
pub mod pipeline;
pub mod queue;
pub mod scope;

pub use batch::{AnalysisTask, BatchOrchestrator, DEFAULT_WORKERS};
pub use dataflow::{DataFlowReport, DataFlowResolver, UnresolvedVariable, DEFAULT_DEADLINE};
pub use error::AnalysisError;
pub use node::{GraphArena, Node, NodeId};
pub use pipeline::{FileAnalysis, FilePipeline, PipelineOptions};
pub use queue::JobQueue;
pub use scope::ScopeEnv;
