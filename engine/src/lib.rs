//! Reactive dataflow engine: typed node ports wired into a DAG, and an
//! incremental scheduler that recomputes only what changed.

#[cfg(test)]
#[macro_use]
mod test_macros;

pub mod compute_graph;
pub mod config;
pub mod error;
pub mod handle;
pub mod node;
pub mod port;
mod scheduler;
pub mod wiring;

pub use compute_graph::{ComputeGraph, NodeSnapshot};
pub use config::EngineConfig;
pub use error::GraphError;
pub use handle::{Command, EngineHandle};
pub use node::NodeStatus;
pub use port::{InputId, NodeId, OutputId};
