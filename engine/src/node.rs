use super::error::GraphError;
use super::port::{InputId, OutputId};
use huegraph_shared::error::NodeError;
use huegraph_shared::node_def::*;
use huegraph_shared::node_value::NodeValue;
use std::sync::Arc;
use strum_macros::Display;

/// How a node runs, resolved from its NodeDef when the node is created.
enum NodeRunner {
    Function(fn(&NodeArgs) -> Result<NodeOutputs, NodeError>),
    Executor(Box<dyn NodeExecutor>),
    OutputDevice(fn(&NodeArgs) -> Result<Option<NodeValue>, NodeError>),
}

/// What one compute produced.
#[derive(Debug)]
pub(crate) enum Evaluation {
    /// One value per declared output.
    Outputs(NodeOutputs),
    /// The value an output device should present.
    Presented(Option<NodeValue>),
}

/// Coarse state of a node, for UI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum NodeStatus {
    /// Up to date with its inputs.
    Ready,
    /// Some required input has no value.
    Waiting,
    /// Waiting for an upstream recompute.
    Dirty,
    /// Its own recompute is queued.
    Busy,
    /// The last compute failed.
    Failed,
}

/// Instance of a NodeDef placed in a compute graph. The graph owns the node's
/// ports; the node only keeps their ids, in NodeDef order.
pub struct Node {
    pub(crate) type_name: String,
    pub(crate) def: Arc<NodeDef>,
    pub(crate) inputs: Vec<InputId>,
    pub(crate) outputs: Vec<OutputId>,
    pub(crate) params: NodeParams,
    runner: NodeRunner,

    /// Bumped whenever a compute is scheduled or the node is cleared. A compute
    /// task carrying an older version is stale.
    pub(crate) version: u64,
    pub(crate) dirty: bool,
    pub(crate) busy: bool,
    /// Inputs of the most recently scheduled compute. `None` forces the next one.
    pub(crate) last_inputs: Option<Vec<Option<NodeValue>>>,
    pub(crate) last_error: Option<GraphError>,
    pub(crate) presented: Option<NodeValue>,
}

impl Node {
    pub(crate) fn new(type_name: &str, def: Arc<NodeDef>, setup: &ExecutorSetup) -> Node {
        let runner = match &def.runner {
            NodeDefRunner::Function(func) => NodeRunner::Function(*func),
            NodeDefRunner::Executor(factory) => NodeRunner::Executor(factory(setup)),
            NodeDefRunner::OutputDevice(od) => NodeRunner::OutputDevice(od.run),
        };
        Node {
            type_name: type_name.to_string(),
            params: def.default_params(),
            def,
            inputs: Vec::new(),
            outputs: Vec::new(),
            runner,
            version: 0,
            dirty: false,
            busy: false,
            last_inputs: None,
            last_error: None,
            presented: None,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn def(&self) -> &Arc<NodeDef> {
        &self.def
    }

    pub fn params(&self) -> &NodeParams {
        &self.params
    }

    pub fn is_output_device(&self) -> bool {
        matches!(self.runner, NodeRunner::OutputDevice(_))
    }

    /// Runs the compute function once on `inputs` and the current parameters.
    pub(crate) fn evaluate(&mut self, inputs: &[Option<NodeValue>]) -> Result<Evaluation, NodeError> {
        let args = NodeArgs {
            inputs: inputs.iter().map(|value| value.as_ref()).collect(),
            params: &self.params,
        };
        match &mut self.runner {
            NodeRunner::Function(func) => func(&args).map(Evaluation::Outputs),
            NodeRunner::Executor(executor) => executor.execute(&args).map(Evaluation::Outputs),
            NodeRunner::OutputDevice(run) => run(&args).map(Evaluation::Presented),
        }
    }
}
