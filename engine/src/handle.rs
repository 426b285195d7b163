use super::error::GraphError;
use super::port::NodeId;
use crossbeam_channel::Sender;
use huegraph_shared::image::PixelBuffer;
use huegraph_shared::node_value::ParamValue;

/// Change requested from outside the engine, applied at the start of the next
/// `ComputeGraph::run_until_idle`.
#[derive(Debug)]
pub enum Command {
    IngestImage { node: NodeId, buffer: PixelBuffer },
    SetParameter {
        node: NodeId,
        name: String,
        value: ParamValue,
    },
}

/// Cloneable sender for `Command`s. May be moved to other threads, such as the
/// one decoding an image file.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    sender: Sender<Command>,
}

impl EngineHandle {
    pub(crate) fn new(sender: Sender<Command>) -> EngineHandle {
        EngineHandle { sender }
    }

    pub fn send(&self, command: Command) -> Result<(), GraphError> {
        self.sender
            .send(command)
            .map_err(|_| GraphError::Disconnected)
    }

    pub fn ingest_image(&self, node: NodeId, buffer: PixelBuffer) -> Result<(), GraphError> {
        self.send(Command::IngestImage { node, buffer })
    }

    pub fn set_parameter(&self, node: NodeId, name: &str, value: ParamValue) -> Result<(), GraphError> {
        self.send(Command::SetParameter {
            node,
            name: name.to_string(),
            value,
        })
    }
}
