use super::config::EngineConfig;
use super::error::GraphError;
use super::handle::{Command, EngineHandle};
use super::node::{Evaluation, Node, NodeStatus};
use super::port::{InputId, InputPort, NodeId, OutputId, OutputPort};
use super::scheduler::{Task, TaskQueue};
use super::wiring::Wiring;
use crossbeam_channel::{unbounded, Receiver};
use huegraph_shared::catalog;
use huegraph_shared::image::{Image, PixelBuffer};
use huegraph_shared::node_def_registry::NodeDefRegistry;
use huegraph_shared::node_value::{same_values, NodeValue, NodeValueType, ParamValue};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use slotmap::SlotMap;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Read-only view of one node, for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSnapshot {
    pub type_name: String,
    pub status: NodeStatus,
    /// Output names and current values, in declaration order.
    pub outputs: Vec<(String, Option<NodeValue>)>,
    /// What an output device currently presents.
    pub presented: Option<NodeValue>,
    pub last_error: Option<GraphError>,
}

/// A ComputeGraph is a set of nodes wired output-to-input into a directed acyclic
/// graph. Editing the graph (adding nodes, rewiring, changing parameters) only
/// queues work; `run_until_idle` then recomputes exactly the nodes whose inputs
/// or parameters changed, in dependency order.
pub struct ComputeGraph {
    registry: Arc<NodeDefRegistry>,
    config: EngineConfig,
    seeds: StdRng,

    nodes: SlotMap<NodeId, Node>,
    inputs: SlotMap<InputId, InputPort>,
    outputs: SlotMap<OutputId, OutputPort>,
    wiring: Wiring,

    queue: TaskQueue,
    handle: EngineHandle,
    commands: Receiver<Command>,
}

impl ComputeGraph {
    /// Creates an empty graph that instantiates nodes from `registry`.
    pub fn new(registry: Arc<NodeDefRegistry>, config: EngineConfig) -> ComputeGraph {
        let (sender, commands) = unbounded();
        ComputeGraph {
            registry,
            seeds: config.seed_source(),
            config,
            nodes: SlotMap::with_key(),
            inputs: SlotMap::with_key(),
            outputs: SlotMap::with_key(),
            wiring: Wiring::new(),
            queue: TaskQueue::new(),
            handle: EngineHandle::new(sender),
            commands,
        }
    }

    /// Creates an empty graph backed by a fresh registry of the built-in nodes.
    pub fn with_builtins(config: EngineConfig) -> Result<ComputeGraph, GraphError> {
        let registry = catalog::builtin_registry()?;
        Ok(ComputeGraph::new(Arc::new(registry), config))
    }

    pub fn registry(&self) -> &Arc<NodeDefRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// A sender for changes made from other threads.
    pub fn handle(&self) -> EngineHandle {
        self.handle.clone()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys()
    }

    pub fn node(&self, node_id: NodeId) -> Result<&Node, GraphError> {
        self.nodes.get(node_id).ok_or(GraphError::UnknownNode(node_id))
    }

    fn node_mut(&mut self, node_id: NodeId) -> Result<&mut Node, GraphError> {
        self.nodes
            .get_mut(node_id)
            .ok_or(GraphError::UnknownNode(node_id))
    }

    /// Number of tasks waiting for `run_until_idle`.
    pub fn pending_tasks(&self) -> usize {
        self.queue.len()
    }

    /// No queued tasks and no unapplied handle commands.
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.commands.is_empty()
    }

    /// Adds a node of the registered type `type_name`, with all inputs unwired
    /// and default parameters, and schedules its first evaluation.
    pub fn add_node(&mut self, type_name: &str) -> Result<NodeId, GraphError> {
        let def = self.registry.get_def(type_name)?;
        let setup = self.config.executor_setup(&mut self.seeds);
        let node_id = self.nodes.insert(Node::new(type_name, def.clone(), &setup));

        let inputs = def
            .inputs
            .iter()
            .map(|input_def| self.inputs.insert(InputPort::new(node_id, input_def)))
            .collect();
        let outputs = def
            .outputs
            .iter()
            .map(|output_def| self.outputs.insert(OutputPort::new(node_id, output_def)))
            .collect();
        let node = self.node_mut(node_id)?;
        node.inputs = inputs;
        node.outputs = outputs;

        info!("added {} node {:?}", type_name, node_id);
        self.queue.push(Task::Notify {
            node: node_id,
            force: true,
        });
        Ok(node_id)
    }

    /// Removes a node after unwiring every one of its inputs and detaching every
    /// subscriber of its outputs. Detached subscribers lose their value.
    pub fn remove_node(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        let node = self
            .nodes
            .remove(node_id)
            .ok_or(GraphError::UnknownNode(node_id))?;
        for input in &node.inputs {
            self.wiring.unlink(*input);
            self.inputs.remove(*input);
        }
        for output in &node.outputs {
            for subscriber in self.wiring.detach_output(*output) {
                self.reset_input(subscriber);
            }
            self.outputs.remove(*output);
        }
        info!("removed {} node {:?}", node.type_name, node_id);
        Ok(())
    }

    pub fn input_id(&self, node_id: NodeId, name: &str) -> Result<InputId, GraphError> {
        let node = self.node(node_id)?;
        node.def
            .input_index(name)
            .and_then(|index| node.inputs.get(index).copied())
            .ok_or_else(|| GraphError::UnknownPort {
                node: node_id,
                name: name.to_string(),
            })
    }

    pub fn output_id(&self, node_id: NodeId, name: &str) -> Result<OutputId, GraphError> {
        let node = self.node(node_id)?;
        node.def
            .output_index(name)
            .and_then(|index| node.outputs.get(index).copied())
            .ok_or_else(|| GraphError::UnknownPort {
                node: node_id,
                name: name.to_string(),
            })
    }

    pub fn input(&self, input: InputId) -> Result<&InputPort, GraphError> {
        self.inputs.get(input).ok_or(GraphError::UnknownInput(input))
    }

    pub fn output(&self, output: OutputId) -> Result<&OutputPort, GraphError> {
        self.outputs.get(output).ok_or(GraphError::UnknownOutput(output))
    }

    /// The output currently feeding `input`.
    pub fn upstream(&self, input: InputId) -> Option<OutputId> {
        self.wiring.upstream(input)
    }

    pub fn subscribers(&self, output: OutputId) -> &[InputId] {
        self.wiring.subscribers(output)
    }

    /// Wires `output` into `input`, replacing whatever fed `input` before, and
    /// hands the output's current value (possibly none) to the input.
    pub fn connect(&mut self, output: OutputId, input: InputId) -> Result<(), GraphError> {
        let source = self.output(output)?;
        let target = self.input(input)?;
        if source.value_type != target.value_type {
            return Err(GraphError::TypeMismatch {
                expected: target.value_type,
                found: source.value_type,
            });
        }
        let (from_node, to_node) = (source.node, target.node);
        let (value, dirty) = (source.value.clone(), source.dirty);
        if self.reaches(to_node, from_node) {
            return Err(GraphError::CycleDetected);
        }

        self.wiring.link(output, input);
        if let Some(port) = self.inputs.get_mut(input) {
            port.value = value;
            port.dirty = dirty;
        }
        if dirty {
            self.mark_dirty(to_node);
        }
        debug!("connected {:?} -> {:?}", output, input);
        self.queue.push(Task::Notify {
            node: to_node,
            force: false,
        });
        Ok(())
    }

    /// Connects the input called `port_name` on `node_id` to the output called
    /// `source_output` on `source_node`.
    pub fn connect_input(
        &mut self,
        node_id: NodeId,
        port_name: &str,
        source_node: NodeId,
        source_output: &str,
    ) -> Result<(), GraphError> {
        let output = self.output_id(source_node, source_output)?;
        let input = self.input_id(node_id, port_name)?;
        self.connect(output, input)
    }

    /// Unwires `input` and empties it. Does nothing if it is not wired.
    pub fn disconnect(&mut self, input: InputId) -> Result<(), GraphError> {
        self.input(input)?;
        if self.wiring.unlink(input).is_some() {
            debug!("disconnected {:?}", input);
            self.reset_input(input);
        }
        Ok(())
    }

    pub fn disconnect_input(&mut self, node_id: NodeId, port_name: &str) -> Result<(), GraphError> {
        let input = self.input_id(node_id, port_name)?;
        self.disconnect(input)
    }

    pub fn parameter(&self, node_id: NodeId, name: &str) -> Result<&ParamValue, GraphError> {
        self.node(node_id)?
            .params
            .get(name)
            .ok_or_else(|| GraphError::UnknownParam {
                node: node_id,
                name: name.to_string(),
            })
    }

    /// Changes one parameter and forces the node to recompute, even though its
    /// inputs are unchanged.
    pub fn set_parameter(&mut self, node_id: NodeId, name: &str, value: ParamValue) -> Result<(), GraphError> {
        let node = self.node_mut(node_id)?;
        let param_def = node.def.param(name).ok_or_else(|| GraphError::UnknownParam {
            node: node_id,
            name: name.to_string(),
        })?;
        let expected = param_def.default.param_type();
        if value.param_type() != expected {
            return Err(GraphError::ParamTypeMismatch {
                name: name.to_string(),
                expected,
                found: value.param_type(),
            });
        }
        if let ParamValue::Choice(choice) = &value {
            if !param_def.choices.contains(choice) {
                return Err(GraphError::InvalidParam {
                    name: name.to_string(),
                    value: choice.clone(),
                });
            }
        }
        node.params.set(name, value);
        self.queue.push(Task::Notify {
            node: node_id,
            force: true,
        });
        Ok(())
    }

    /// Hands a decoded image to a source node's `image` parameter.
    pub fn ingest_image(&mut self, node_id: NodeId, buffer: &PixelBuffer) -> Result<(), GraphError> {
        let image = Image::from_buffer(buffer)?;
        self.set_parameter(node_id, "image", ParamValue::Image(Some(Arc::new(image))))
    }

    pub fn output_value(&self, node_id: NodeId, name: &str) -> Result<Option<&NodeValue>, GraphError> {
        let output = self.output_id(node_id, name)?;
        Ok(self.output(output)?.value.as_ref())
    }

    /// Current value of an image output as raw RGBA, if it has one.
    pub fn export_image(&self, node_id: NodeId, name: &str) -> Result<Option<PixelBuffer>, GraphError> {
        let output = self.output(self.output_id(node_id, name)?)?;
        if output.value_type != NodeValueType::Image {
            return Err(GraphError::TypeMismatch {
                expected: NodeValueType::Image,
                found: output.value_type,
            });
        }
        Ok(output
            .value
            .as_ref()
            .and_then(|value| value.as_image())
            .map(|image| image.to_buffer()))
    }

    pub fn status(&self, node_id: NodeId) -> Result<NodeStatus, GraphError> {
        let node = self.node(node_id)?;
        let status = if node.busy {
            NodeStatus::Busy
        } else if node.dirty {
            NodeStatus::Dirty
        } else if node.last_error.is_some() {
            NodeStatus::Failed
        } else if node
            .inputs
            .iter()
            .filter_map(|input| self.inputs.get(*input))
            .any(|port| port.is_unmet())
        {
            NodeStatus::Waiting
        } else {
            NodeStatus::Ready
        };
        Ok(status)
    }

    pub fn snapshot(&self, node_id: NodeId) -> Result<NodeSnapshot, GraphError> {
        let node = self.node(node_id)?;
        let outputs = node
            .outputs
            .iter()
            .filter_map(|output| self.outputs.get(*output))
            .map(|port| (port.name.clone(), port.value.clone()))
            .collect();
        Ok(NodeSnapshot {
            type_name: node.type_name.clone(),
            status: self.status(node_id)?,
            outputs,
            presented: node.presented.clone(),
            last_error: node.last_error.clone(),
        })
    }

    /// Groups the nodes into waves, where each node depends only on nodes in
    /// earlier waves. Nodes within a wave keep insertion order.
    pub fn waves(&self) -> Result<Vec<Vec<NodeId>>, GraphError> {
        let dep_graph = self.build_deps_graph();
        let mut nodes_in_any_wave = HashSet::<NodeId>::with_capacity(self.nodes.len());
        let mut waves = Vec::<Vec<NodeId>>::new();

        while nodes_in_any_wave.len() != self.nodes.len() {
            let wave: Vec<NodeId> = dep_graph
                .iter()
                .filter(|(node_id, _)| !nodes_in_any_wave.contains(node_id))
                .filter(|(_, deps)| deps.iter().all(|dep| nodes_in_any_wave.contains(dep)))
                .map(|(node_id, _)| *node_id)
                .collect();

            if wave.is_empty() {
                // An empty wave means there's a cycle.
                return Err(GraphError::CycleDetected);
            }
            nodes_in_any_wave.extend(wave.iter().copied());
            waves.push(wave);
        }
        Ok(waves)
    }

    /// Build a list of each node and the other nodes it relies on.
    fn build_deps_graph(&self) -> Vec<(NodeId, Vec<NodeId>)> {
        self.nodes
            .iter()
            .map(|(node_id, node)| {
                (
                    node_id,
                    node.inputs
                        .iter()
                        .filter_map(|input| self.wiring.upstream(*input))
                        .filter_map(|output| self.outputs.get(output))
                        .map(|port| port.node)
                        .collect(),
                )
            })
            .collect()
    }

    /// Forces every node to recompute, upstream nodes first.
    pub fn recompute_all(&mut self) -> Result<(), GraphError> {
        for wave in self.waves()? {
            for node_id in wave {
                self.queue.push(Task::Notify {
                    node: node_id,
                    force: true,
                });
            }
        }
        Ok(())
    }

    /// Applies pending handle commands, then runs queued tasks until none are
    /// left (or the configured task limit is hit). Returns how many tasks ran.
    ///
    /// A failing compute stops the run and is returned; tasks queued behind it
    /// stay queued for the next call.
    pub fn run_until_idle(&mut self) -> Result<usize, GraphError> {
        self.apply_commands()?;
        let mut processed = 0;
        while let Some(task) = self.queue.pop() {
            processed += 1;
            match task {
                Task::Notify { node, force } => self.notify(node, force),
                Task::Compute {
                    node,
                    version,
                    inputs,
                } => self.compute(node, version, inputs)?,
            }
            if self.config.max_tasks_per_run.map_or(false, |max| processed >= max) {
                debug!("stopping after {} tasks", processed);
                break;
            }
        }
        Ok(processed)
    }

    fn apply_commands(&mut self) -> Result<(), GraphError> {
        let commands: Vec<Command> = self.commands.try_iter().collect();
        let mut first_error = None;
        for command in commands {
            let result = match command {
                Command::IngestImage { node, buffer } => self.ingest_image(node, &buffer),
                Command::SetParameter { node, name, value } => self.set_parameter(node, &name, value),
            };
            if let Err(err) = result {
                warn!("dropping command: {}", err);
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Decides whether `node_id` has to recompute after its inputs or
    /// parameters changed.
    fn notify(&mut self, node_id: NodeId, force: bool) {
        let Some(node) = self.nodes.get_mut(node_id) else {
            return;
        };
        if force {
            node.last_inputs = None;
        }

        let ports: Vec<&InputPort> = node
            .inputs
            .iter()
            .filter_map(|input| self.inputs.get(*input))
            .collect();
        if ports.iter().any(|port| port.is_unmet()) {
            self.clear(node_id);
            return;
        }
        if ports.iter().any(|port| port.dirty) {
            debug!("deferring {:?} until its inputs settle", node_id);
            return;
        }
        let values: Vec<Option<NodeValue>> = ports.iter().map(|port| port.value.clone()).collect();

        let unchanged = node
            .last_inputs
            .as_ref()
            .map_or(false, |last| same_values(last, &values));
        if unchanged {
            if !node.busy {
                debug!("{:?} is up to date", node_id);
                node.dirty = false;
                self.release(node_id);
            }
            return;
        }

        node.version += 1;
        node.dirty = true;
        node.busy = true;
        node.last_inputs = Some(values.clone());
        let version = node.version;
        self.mark_dirty(node_id);
        debug!("scheduling {:?} at version {}", node_id, version);
        self.queue.push(Task::Compute {
            node: node_id,
            version,
            inputs: values,
        });
    }

    fn compute(
        &mut self,
        node_id: NodeId,
        version: u64,
        inputs: Vec<Option<NodeValue>>,
    ) -> Result<(), GraphError> {
        let Some(node) = self.nodes.get_mut(node_id) else {
            debug!("dropping compute for removed node {:?}", node_id);
            return Ok(());
        };
        if node.version != version {
            debug!("dropping stale compute for {:?} at version {}", node_id, version);
            return Ok(());
        }
        // An upstream was rescheduled after this task was queued. Its next
        // delivery notifies the node again with settled inputs.
        let unsettled = node
            .inputs
            .iter()
            .filter_map(|input| self.inputs.get(*input))
            .any(|port| port.dirty);
        if unsettled {
            debug!("dropping compute for {:?}, its inputs changed", node_id);
            node.busy = false;
            node.last_inputs = None;
            return Ok(());
        }

        match node.evaluate(&inputs) {
            Ok(Evaluation::Outputs(values)) => {
                self.check_outputs(node_id, &values)?;
                self.publish(node_id, values);
            }
            Ok(Evaluation::Presented(value)) => node.presented = value,
            Err(source) => {
                return Err(self.fail(
                    node_id,
                    GraphError::Compute {
                        node: node_id,
                        source,
                    },
                ))
            }
        }

        if let Some(node) = self.nodes.get_mut(node_id) {
            node.dirty = false;
            node.busy = false;
            node.last_error = None;
        }
        Ok(())
    }

    /// Rejects results whose count or types don't match the declared outputs.
    fn check_outputs(&mut self, node_id: NodeId, values: &[Option<NodeValue>]) -> Result<(), GraphError> {
        let expected: Vec<NodeValueType> = self
            .node(node_id)?
            .def
            .outputs
            .iter()
            .map(|output| output.output_type)
            .collect();
        if values.len() != expected.len() {
            return Err(self.fail(
                node_id,
                GraphError::ArityMismatch {
                    node: node_id,
                    expected: expected.len(),
                    found: values.len(),
                },
            ));
        }
        for (index, (value, expected)) in values.iter().zip(expected).enumerate() {
            if let Some(value) = value {
                if value.value_type() != expected {
                    return Err(self.fail(
                        node_id,
                        GraphError::OutputTypeMismatch {
                            node: node_id,
                            index,
                            expected,
                            found: value.value_type(),
                        },
                    ));
                }
            }
        }
        Ok(())
    }

    /// Records a failed compute. The node keeps its previous outputs, which are
    /// re-delivered so that nothing downstream stays dirty.
    fn fail(&mut self, node_id: NodeId, error: GraphError) -> GraphError {
        warn!("{}", error);
        if let Some(node) = self.nodes.get_mut(node_id) {
            node.dirty = false;
            node.busy = false;
            node.last_inputs = None;
            node.last_error = Some(error.clone());
        }
        self.release(node_id);
        error
    }

    /// Stores fresh results on the node's outputs and hands them downstream.
    fn publish(&mut self, node_id: NodeId, values: Vec<Option<NodeValue>>) {
        let outputs = match self.nodes.get(node_id) {
            Some(node) => node.outputs.clone(),
            None => return,
        };
        for (output, value) in outputs.into_iter().zip(values) {
            if let Some(port) = self.outputs.get_mut(output) {
                port.value = value;
                port.dirty = false;
            }
            self.deliver(output);
        }
    }

    /// Marks the node's outputs clean and re-delivers their current values.
    fn release(&mut self, node_id: NodeId) {
        let outputs = match self.nodes.get(node_id) {
            Some(node) => node.outputs.clone(),
            None => return,
        };
        for output in outputs {
            if let Some(port) = self.outputs.get_mut(output) {
                port.dirty = false;
            }
            self.deliver(output);
        }
    }

    /// Empties every output of a node that cannot run, and forgets its last run.
    fn clear(&mut self, node_id: NodeId) {
        let outputs = match self.nodes.get_mut(node_id) {
            Some(node) => {
                node.version += 1;
                node.dirty = false;
                node.busy = false;
                node.last_inputs = None;
                node.presented = None;
                node.outputs.clone()
            }
            None => return,
        };
        for output in outputs {
            let changed = match self.outputs.get_mut(output) {
                Some(port) => {
                    let changed = port.value.is_some() || port.dirty;
                    port.value = None;
                    port.dirty = false;
                    changed
                }
                None => false,
            };
            if changed {
                self.deliver(output);
            }
        }
    }

    /// Copies an output's value and dirty flag into every subscriber and
    /// notifies their nodes.
    fn deliver(&mut self, output: OutputId) {
        let Some(port) = self.outputs.get(output) else {
            return;
        };
        let (value, dirty) = (port.value.clone(), port.dirty);
        for subscriber in self.wiring.subscribers(output) {
            if let Some(input) = self.inputs.get_mut(*subscriber) {
                input.value = value.clone();
                input.dirty = dirty;
                self.queue.push(Task::Notify {
                    node: input.node,
                    force: false,
                });
            }
        }
    }

    /// Empties an input that lost its upstream and notifies its node.
    fn reset_input(&mut self, input: InputId) {
        if let Some(port) = self.inputs.get_mut(input) {
            port.value = None;
            port.dirty = false;
            self.queue.push(Task::Notify {
                node: port.node,
                force: false,
            });
        }
    }

    /// Marks `node_id`, its outputs and everything downstream of them dirty, so
    /// that no downstream node runs before this one has settled.
    fn mark_dirty(&mut self, node_id: NodeId) {
        let mut stack = vec![node_id];
        while let Some(current) = stack.pop() {
            let outputs = match self.nodes.get_mut(current) {
                Some(node) => {
                    node.dirty = true;
                    node.outputs.clone()
                }
                None => continue,
            };
            for output in outputs {
                if let Some(port) = self.outputs.get_mut(output) {
                    port.dirty = true;
                }
                for subscriber in self.wiring.subscribers(output) {
                    if let Some(input) = self.inputs.get_mut(*subscriber) {
                        input.dirty = true;
                        if self.nodes.get(input.node).map_or(false, |n| !n.dirty) {
                            stack.push(input.node);
                        }
                    }
                }
            }
        }
    }

    /// True if data flows from `from` to `to` along existing wires.
    fn reaches(&self, from: NodeId, to: NodeId) -> bool {
        let mut stack = vec![from];
        let mut seen = HashSet::new();
        while let Some(current) = stack.pop() {
            if current == to {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(node) = self.nodes.get(current) {
                for output in &node.outputs {
                    for subscriber in self.wiring.subscribers(*output) {
                        if let Some(input) = self.inputs.get(*subscriber) {
                            stack.push(input.node);
                        }
                    }
                }
            }
        }
        false
    }

    /// Index of every node within `waves()`.
    pub fn wave_index(&self) -> Result<HashMap<NodeId, usize>, GraphError> {
        Ok(self
            .waves()?
            .into_iter()
            .enumerate()
            .flat_map(|(index, wave)| wave.into_iter().map(move |node_id| (node_id, index)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huegraph_shared::color::Color;
    use huegraph_shared::node_def::NodeParamDef;

    fn registry() -> Arc<NodeDefRegistry> {
        let registry = NodeDefRegistry::new();
        let mut source = node_def_from_fn!(|args;| -> (color: Color) {
            let color = args.params.color("color")?;
            match args.params.choice("mode")? {
                "inverted" => Ok(vec![Some(NodeValue::Color(color.invert()))]),
                _ => Ok(vec![Some(NodeValue::Color(color))]),
            }
        });
        source.params.push(NodeParamDef::new("color", ParamValue::Color(Color::grey(10))));
        source.params.push(NodeParamDef::choice("mode", ["plain", "inverted"]));
        registry.register("source", source).unwrap();
        registry
            .register(
                "invert",
                node_def_from_fn!(|args; color: Color| -> (color: Color) {
                    Ok(vec![Some(NodeValue::Color(args.color(0)?.invert()))])
                }),
            )
            .unwrap();
        registry
            .register(
                "mix",
                node_def_from_fn!(|args; a: Color, b: Color| -> (color: Color) {
                    let (a, b) = (args.color(0)?, args.color(1)?);
                    Ok(vec![Some(NodeValue::Color(a.blend(&b, 50.0)))])
                }),
            )
            .unwrap();
        registry
            .register(
                "swatch",
                node_def_from_fn!(|args; palette: Palette| -> (color: Color) {
                    Ok(vec![args.palette(0)?.colors().first().map(|c| NodeValue::Color(*c))])
                }),
            )
            .unwrap();
        registry
            .register(
                "doubled",
                node_def_from_fn!(|args; color: Color| -> (color: Color) {
                    let color = NodeValue::Color(args.color(0)?);
                    Ok(vec![Some(color.clone()), Some(color)])
                }),
            )
            .unwrap();
        registry
            .register(
                "mislabeled",
                node_def_from_fn!(|args; color: Color| -> (palette: Palette) {
                    Ok(vec![Some(NodeValue::Color(args.color(0)?))])
                }),
            )
            .unwrap();
        Arc::new(registry)
    }

    fn graph() -> ComputeGraph {
        let _ = env_logger::builder().is_test(true).try_init();
        ComputeGraph::new(registry(), EngineConfig::default())
    }

    fn color_of(graph: &ComputeGraph, node: NodeId) -> Option<Color> {
        match graph.output_value(node, "color").unwrap() {
            Some(NodeValue::Color(color)) => Some(*color),
            _ => None,
        }
    }

    #[test]
    fn propagates_values_downstream() {
        let mut graph = graph();
        let source = graph.add_node("source").unwrap();
        let invert = graph.add_node("invert").unwrap();
        graph.connect_input(invert, "color", source, "color").unwrap();
        graph.run_until_idle().unwrap();

        assert_eq!(color_of(&graph, source), Some(Color::grey(10)));
        assert_eq!(color_of(&graph, invert), Some(Color::grey(245)));
        assert_eq!(graph.status(invert), Ok(NodeStatus::Ready));
        assert!(graph.is_idle());
    }

    #[test]
    fn unwired_nodes_wait_without_failing() {
        let mut graph = graph();
        let invert = graph.add_node("invert").unwrap();
        graph.run_until_idle().unwrap();
        assert_eq!(color_of(&graph, invert), None);
        assert_eq!(graph.status(invert), Ok(NodeStatus::Waiting));
    }

    #[test]
    fn rejects_mismatched_types() {
        let mut graph = graph();
        let source = graph.add_node("source").unwrap();
        let swatch = graph.add_node("swatch").unwrap();
        assert_eq!(
            graph.connect_input(swatch, "palette", source, "color"),
            Err(GraphError::TypeMismatch {
                expected: NodeValueType::Palette,
                found: NodeValueType::Color,
            })
        );
        let input = graph.input_id(swatch, "palette").unwrap();
        assert_eq!(graph.upstream(input), None);
    }

    #[test]
    fn rejects_cycles() {
        let mut graph = graph();
        let first = graph.add_node("invert").unwrap();
        let second = graph.add_node("invert").unwrap();
        graph.connect_input(second, "color", first, "color").unwrap();
        assert_eq!(
            graph.connect_input(first, "color", second, "color"),
            Err(GraphError::CycleDetected)
        );
        assert_eq!(
            graph.connect_input(first, "color", first, "color"),
            Err(GraphError::CycleDetected)
        );
        assert!(graph.waves().is_ok());
    }

    #[test]
    fn reports_unknown_ports_and_nodes() {
        let mut graph = graph();
        let source = graph.add_node("source").unwrap();
        assert!(matches!(
            graph.input_id(source, "color"),
            Err(GraphError::UnknownPort { .. })
        ));
        assert!(matches!(graph.add_node("nope"), Err(GraphError::Registry(_))));
        graph.remove_node(source).unwrap();
        assert_eq!(graph.remove_node(source), Err(GraphError::UnknownNode(source)));
    }

    #[test]
    fn arity_mismatch_fails_only_that_node() {
        let mut graph = graph();
        let source = graph.add_node("source").unwrap();
        let doubled = graph.add_node("doubled").unwrap();
        graph.connect_input(doubled, "color", source, "color").unwrap();

        let error = graph.run_until_idle().unwrap_err();
        assert_eq!(
            error,
            GraphError::ArityMismatch {
                node: doubled,
                expected: 1,
                found: 2,
            }
        );
        graph.run_until_idle().unwrap();
        assert_eq!(graph.status(doubled), Ok(NodeStatus::Failed));
        assert_eq!(graph.snapshot(doubled).unwrap().last_error, Some(error));
        assert_eq!(color_of(&graph, doubled), None);
        assert_eq!(color_of(&graph, source), Some(Color::grey(10)));
    }

    #[test]
    fn rejects_outputs_of_the_wrong_type() {
        let mut graph = graph();
        let source = graph.add_node("source").unwrap();
        let mislabeled = graph.add_node("mislabeled").unwrap();
        graph.connect_input(mislabeled, "color", source, "color").unwrap();
        assert!(matches!(
            graph.run_until_idle(),
            Err(GraphError::OutputTypeMismatch { index: 0, .. })
        ));
        assert_eq!(graph.output_value(mislabeled, "palette"), Ok(None));
    }

    #[test]
    fn groups_nodes_into_waves() {
        let mut graph = graph();
        let source = graph.add_node("source").unwrap();
        let invert = graph.add_node("invert").unwrap();
        let mix = graph.add_node("mix").unwrap();
        graph.connect_input(invert, "color", source, "color").unwrap();
        graph.connect_input(mix, "a", invert, "color").unwrap();
        graph.connect_input(mix, "b", source, "color").unwrap();

        assert_eq!(graph.waves().unwrap(), vec![vec![source], vec![invert], vec![mix]]);
        assert_eq!(
            graph.wave_index().unwrap(),
            map! {source => 0, invert => 1, mix => 2}
        );
        graph.recompute_all().unwrap();
        graph.run_until_idle().unwrap();
        assert_eq!(color_of(&graph, mix), Some(Color::grey(128)));
    }

    #[test]
    fn disconnecting_is_idempotent() {
        let mut graph = graph();
        let source = graph.add_node("source").unwrap();
        let invert = graph.add_node("invert").unwrap();
        graph.connect_input(invert, "color", source, "color").unwrap();
        graph.run_until_idle().unwrap();

        graph.disconnect_input(invert, "color").unwrap();
        graph.disconnect_input(invert, "color").unwrap();
        graph.run_until_idle().unwrap();
        assert_eq!(color_of(&graph, invert), None);
        assert!(graph.subscribers(graph.output_id(source, "color").unwrap()).is_empty());
    }

    #[test]
    fn removing_a_node_detaches_its_subscribers() {
        let mut graph = graph();
        let source = graph.add_node("source").unwrap();
        let invert = graph.add_node("invert").unwrap();
        graph.connect_input(invert, "color", source, "color").unwrap();
        graph.run_until_idle().unwrap();

        graph.remove_node(source).unwrap();
        graph.run_until_idle().unwrap();
        let input = graph.input_id(invert, "color").unwrap();
        assert_eq!(graph.upstream(input), None);
        assert_eq!(graph.input(input).unwrap().value, None);
        assert_eq!(color_of(&graph, invert), None);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn validates_parameters() {
        let mut graph = graph();
        let source = graph.add_node("source").unwrap();
        assert!(matches!(
            graph.set_parameter(source, "size", ParamValue::Count(1)),
            Err(GraphError::UnknownParam { .. })
        ));
        assert!(matches!(
            graph.set_parameter(source, "color", ParamValue::Count(1)),
            Err(GraphError::ParamTypeMismatch { .. })
        ));
        assert!(matches!(
            graph.set_parameter(source, "mode", ParamValue::Choice("loud".to_string())),
            Err(GraphError::InvalidParam { .. })
        ));
        graph
            .set_parameter(source, "mode", ParamValue::Choice("inverted".to_string()))
            .unwrap();
        graph.run_until_idle().unwrap();
        assert_eq!(color_of(&graph, source), Some(Color::grey(245)));
        assert_eq!(
            graph.parameter(source, "mode"),
            Ok(&ParamValue::Choice("inverted".to_string()))
        );
    }

    #[test]
    fn later_parameter_changes_win() {
        let mut graph = graph();
        let source = graph.add_node("source").unwrap();
        let invert = graph.add_node("invert").unwrap();
        graph.connect_input(invert, "color", source, "color").unwrap();
        graph.set_parameter(source, "color", ParamValue::Color(Color::grey(1))).unwrap();
        graph.set_parameter(source, "color", ParamValue::Color(Color::grey(2))).unwrap();
        graph.run_until_idle().unwrap();
        assert_eq!(color_of(&graph, invert), Some(Color::grey(253)));
    }

    #[test]
    fn applies_handle_commands() {
        let mut graph = graph();
        let source = graph.add_node("source").unwrap();
        let invert = graph.add_node("invert").unwrap();
        graph.connect_input(invert, "color", source, "color").unwrap();

        let handle = graph.handle();
        std::thread::spawn(move || {
            handle
                .set_parameter(source, "color", ParamValue::Color(Color::grey(0)))
                .unwrap();
        })
        .join()
        .unwrap();
        assert!(!graph.is_idle());
        graph.run_until_idle().unwrap();
        assert_eq!(color_of(&graph, invert), Some(Color::grey(255)));

        graph
            .handle()
            .set_parameter(source, "color", ParamValue::Toggle(true))
            .unwrap();
        assert!(matches!(
            graph.run_until_idle(),
            Err(GraphError::ParamTypeMismatch { .. })
        ));
    }

    #[test]
    fn limits_tasks_per_run() {
        let config = EngineConfig {
            max_tasks_per_run: Some(1),
            ..EngineConfig::default()
        };
        let mut graph = ComputeGraph::new(registry(), config);
        graph.add_node("source").unwrap();
        assert_eq!(graph.run_until_idle(), Ok(1));
        assert_eq!(graph.pending_tasks(), 1);
        assert_eq!(graph.run_until_idle(), Ok(1));
        assert!(graph.is_idle());
    }
}
