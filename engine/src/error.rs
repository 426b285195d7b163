use super::port::{InputId, NodeId, OutputId};
use huegraph_shared::error::{ImageError, NodeError, RegistryError};
use huegraph_shared::node_value::{NodeValueType, ParamType};
use thiserror::Error;

/// Everything that can go wrong while editing or running a compute graph. A
/// failed operation leaves the rest of the graph in its last valid state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("node {0:?} does not exist")]
    UnknownNode(NodeId),

    #[error("input port {0:?} does not exist")]
    UnknownInput(InputId),

    #[error("output port {0:?} does not exist")]
    UnknownOutput(OutputId),

    #[error("node {node:?} has no port named {name}")]
    UnknownPort { node: NodeId, name: String },

    #[error("cannot connect a {found} output to a {expected} input")]
    TypeMismatch {
        expected: NodeValueType,
        found: NodeValueType,
    },

    #[error("connecting these ports would create a cycle")]
    CycleDetected,

    #[error("node {node:?} returned {found} values for {expected} outputs")]
    ArityMismatch {
        node: NodeId,
        expected: usize,
        found: usize,
    },

    #[error("node {node:?} published a {found} on {expected} output {index}")]
    OutputTypeMismatch {
        node: NodeId,
        index: usize,
        expected: NodeValueType,
        found: NodeValueType,
    },

    #[error("node {node:?} has no parameter named {name}")]
    UnknownParam { node: NodeId, name: String },

    #[error("parameter {name} takes a {expected}, not a {found}")]
    ParamTypeMismatch {
        name: String,
        expected: ParamType,
        found: ParamType,
    },

    #[error("{value} is not an option of parameter {name}")]
    InvalidParam { name: String, value: String },

    #[error("the engine behind this handle has been dropped")]
    Disconnected,

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("node {node:?} failed: {source}")]
    Compute { node: NodeId, source: NodeError },
}
