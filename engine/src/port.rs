use huegraph_shared::node_def::{NodeInputDef, NodeOutputDef};
use huegraph_shared::node_value::{NodeValue, NodeValueType};
use slotmap::new_key_type;

new_key_type! {
    /// Stable handle to a node in a `ComputeGraph`.
    pub struct NodeId;
    /// Stable handle to one input port.
    pub struct InputId;
    /// Stable handle to one output port.
    pub struct OutputId;
}

/// Receiving end of a wire. Holds a copy of whatever its upstream output last
/// published, and mirrors that output's dirty flag.
#[derive(Debug, Clone)]
pub struct InputPort {
    pub name: String,
    pub value_type: NodeValueType,
    pub node: NodeId,
    pub value: Option<NodeValue>,
    pub dirty: bool,
}

impl InputPort {
    pub(crate) fn new(node: NodeId, def: &NodeInputDef) -> InputPort {
        InputPort {
            name: def.desc.name.clone(),
            value_type: def.value_type,
            node,
            value: None,
            dirty: false,
        }
    }

    /// Without a value, so the owning node cannot run.
    pub fn is_unmet(&self) -> bool {
        self.value.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct OutputPort {
    pub name: String,
    pub value_type: NodeValueType,
    pub node: NodeId,
    pub value: Option<NodeValue>,
    /// Set while the owning node has a recompute outstanding.
    pub dirty: bool,
}

impl OutputPort {
    pub(crate) fn new(node: NodeId, def: &NodeOutputDef) -> OutputPort {
        OutputPort {
            name: def.desc.name.clone(),
            value_type: def.output_type,
            node,
            value: None,
            dirty: false,
        }
    }
}
