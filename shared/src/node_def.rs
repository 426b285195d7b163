use super::color::Color;
use super::error::NodeError;
use super::image::Image;
use super::node_value::{NodeValue, NodeValueType, ParamType, ParamValue};
use super::palette::Palette;
use super::palette_map::PaletteMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A NodeDef represents a type of function that can be placed in a compute graph.
/// Like a Rust function it has a name and typed inputs and outputs (a NodeDef may
/// have several outputs, or none at all for output devices). Unlike a Rust
/// function, a NodeDef must behave as a pure function of its input values and its
/// parameters: the engine skips calling it when neither has changed.
#[derive(Debug)]
pub struct NodeDef {
    pub desc: NodeDefBasicDescription,
    pub inputs: Vec<NodeInputDef>,
    pub outputs: Vec<NodeOutputDef>,
    pub params: Vec<NodeParamDef>,
    pub runner: NodeDefRunner,
}

/// Represents a single input to a NodeDef function. Every input must hold a
/// value before the node runs.
#[derive(Debug, PartialEq)]
pub struct NodeInputDef {
    pub desc: NodeDefBasicDescription,
    pub value_type: NodeValueType,
}

/// Represents a single output of a NodeDef function.
#[derive(Debug, PartialEq)]
pub struct NodeOutputDef {
    pub desc: NodeDefBasicDescription,
    pub output_type: NodeValueType,
}

/// A setting shown in the node's property editor.
#[derive(Debug, PartialEq)]
pub struct NodeParamDef {
    pub desc: NodeDefBasicDescription,
    pub default: ParamValue,
    /// Allowed values for a `Choice` parameter. Empty for every other type.
    pub choices: Vec<String>,
}

/// Human-readable information about a node or its inputs, outputs or parameters.
#[derive(Debug, PartialEq)]
pub struct NodeDefBasicDescription {
    pub name: String,
    pub description: String,
}

impl NodeDefBasicDescription {
    pub fn new(name: &str, description: &str) -> NodeDefBasicDescription {
        NodeDefBasicDescription {
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

impl NodeInputDef {
    pub fn new(name: &str, value_type: NodeValueType) -> NodeInputDef {
        NodeInputDef {
            desc: NodeDefBasicDescription::new(name, ""),
            value_type,
        }
    }
}

impl NodeOutputDef {
    pub fn new(name: &str, output_type: NodeValueType) -> NodeOutputDef {
        NodeOutputDef {
            desc: NodeDefBasicDescription::new(name, ""),
            output_type,
        }
    }
}

impl NodeParamDef {
    pub fn new(name: &str, default: ParamValue) -> NodeParamDef {
        NodeParamDef {
            desc: NodeDefBasicDescription::new(name, ""),
            default,
            choices: Vec::new(),
        }
    }

    pub fn choice<I, S>(name: &str, options: I) -> NodeParamDef
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let choices: Vec<String> = options.into_iter().map(|o| o.to_string()).collect();
        let default = ParamValue::Choice(choices.first().cloned().unwrap_or_default());
        NodeParamDef {
            desc: NodeDefBasicDescription::new(name, ""),
            default,
            choices,
        }
    }
}

impl NodeDef {
    pub fn input_index(&self, name: &str) -> Option<usize> {
        self.inputs.iter().position(|i| i.desc.name == name)
    }

    pub fn output_index(&self, name: &str) -> Option<usize> {
        self.outputs.iter().position(|o| o.desc.name == name)
    }

    pub fn param(&self, name: &str) -> Option<&NodeParamDef> {
        self.params.iter().find(|p| p.desc.name == name)
    }

    pub fn default_params(&self) -> NodeParams {
        let mut params = NodeParams::default();
        for param in &self.params {
            params.set(&param.desc.name, param.default.clone());
        }
        params
    }
}

/// One slot per declared output; `None` publishes "no value".
pub type NodeOutputs = Vec<Option<NodeValue>>;

/// Options for executing a Node, as specified in a NodeDef.
pub enum NodeDefRunner {
    /// Stateless function of the node's inputs and parameters.
    Function(fn(&NodeArgs) -> Result<NodeOutputs, NodeError>),
    /// Factory for a per-node executor that may keep private state across runs.
    Executor(fn(&ExecutorSetup) -> Box<dyn NodeExecutor>),
    /// Terminal node. Produces no outputs; whatever `run` returns is presented.
    OutputDevice(NodeDefOutputRunner),
}

pub struct NodeDefOutputRunner {
    pub run: fn(&NodeArgs) -> Result<Option<NodeValue>, NodeError>,
    pub device: OutputDevice,
}

/// Information about an output device
#[derive(Debug, PartialEq)]
pub struct OutputDevice {
    pub name: String,
}

impl fmt::Debug for NodeDefRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeDefRunner::Function(_) => f.write_str("[Node Function]"),
            NodeDefRunner::Executor(_) => f.write_str("[Node Executor]"),
            NodeDefRunner::OutputDevice(od) => write!(f, "[Output Device {}]", od.device.name),
        }
    }
}

/// Engine settings handed to executor factories when a node is created.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutorSetup {
    pub rng_seed: u64,
    pub kmeans_max_iterations: usize,
}

pub trait NodeExecutor: Send {
    fn execute(&mut self, args: &NodeArgs) -> Result<NodeOutputs, NodeError>;
}

/// Everything a compute function may look at.
pub struct NodeArgs<'a> {
    pub inputs: Vec<Option<&'a NodeValue>>,
    pub params: &'a NodeParams,
}

impl<'a> NodeArgs<'a> {
    pub fn value(&self, index: usize) -> Result<&'a NodeValue, NodeError> {
        self.inputs
            .get(index)
            .copied()
            .flatten()
            .ok_or(NodeError::MissingInput { index })
    }

    fn wrong_type(index: usize, expected: NodeValueType, found: &NodeValue) -> NodeError {
        NodeError::WrongInputType {
            index,
            expected,
            found: found.value_type(),
        }
    }

    pub fn color(&self, index: usize) -> Result<Color, NodeError> {
        match self.value(index)? {
            NodeValue::Color(color) => Ok(*color),
            other => Err(Self::wrong_type(index, NodeValueType::Color, other)),
        }
    }

    pub fn image(&self, index: usize) -> Result<&'a Arc<Image>, NodeError> {
        match self.value(index)? {
            NodeValue::Image(image) => Ok(image),
            other => Err(Self::wrong_type(index, NodeValueType::Image, other)),
        }
    }

    pub fn palette(&self, index: usize) -> Result<&'a Arc<Palette>, NodeError> {
        match self.value(index)? {
            NodeValue::Palette(palette) => Ok(palette),
            other => Err(Self::wrong_type(index, NodeValueType::Palette, other)),
        }
    }

    pub fn palette_map(&self, index: usize) -> Result<&'a Arc<PaletteMap>, NodeError> {
        match self.value(index)? {
            NodeValue::PaletteMap(map) => Ok(map),
            other => Err(Self::wrong_type(index, NodeValueType::PaletteMap, other)),
        }
    }
}

/// Current parameter values of one node, in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeParams {
    values: Vec<(String, ParamValue)>,
}

impl NodeParams {
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn set(&mut self, name: &str, value: ParamValue) {
        match self.values.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name.to_string(), value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    fn lookup(&self, name: &str) -> Result<&ParamValue, NodeError> {
        self.get(name)
            .ok_or_else(|| NodeError::MissingParam(name.to_string()))
    }

    fn wrong_type(name: &str, expected: ParamType, found: &ParamValue) -> NodeError {
        NodeError::WrongParamType {
            name: name.to_string(),
            expected,
            found: found.param_type(),
        }
    }

    pub fn count(&self, name: &str) -> Result<i64, NodeError> {
        match self.lookup(name)? {
            ParamValue::Count(v) => Ok(*v),
            other => Err(Self::wrong_type(name, ParamType::Count, other)),
        }
    }

    /// A count that must be at least `min`, as a size.
    pub fn size_at_least(&self, name: &str, min: usize) -> Result<usize, NodeError> {
        let value = self.count(name)?;
        if value < min as i64 {
            return Err(NodeError::OutOfRange {
                name: name.to_string(),
                value: value.to_string(),
            });
        }
        Ok(value as usize)
    }

    pub fn magnitude(&self, name: &str) -> Result<f64, NodeError> {
        match self.lookup(name)? {
            ParamValue::Magnitude(v) => Ok(*v),
            other => Err(Self::wrong_type(name, ParamType::Magnitude, other)),
        }
    }

    pub fn toggle(&self, name: &str) -> Result<bool, NodeError> {
        match self.lookup(name)? {
            ParamValue::Toggle(v) => Ok(*v),
            other => Err(Self::wrong_type(name, ParamType::Toggle, other)),
        }
    }

    pub fn color(&self, name: &str) -> Result<Color, NodeError> {
        match self.lookup(name)? {
            ParamValue::Color(v) => Ok(*v),
            other => Err(Self::wrong_type(name, ParamType::Color, other)),
        }
    }

    pub fn image(&self, name: &str) -> Result<Option<&Arc<Image>>, NodeError> {
        match self.lookup(name)? {
            ParamValue::Image(v) => Ok(v.as_ref()),
            other => Err(Self::wrong_type(name, ParamType::Image, other)),
        }
    }

    pub fn choice(&self, name: &str) -> Result<&str, NodeError> {
        match self.lookup(name)? {
            ParamValue::Choice(v) => Ok(v.as_str()),
            other => Err(Self::wrong_type(name, ParamType::Choice, other)),
        }
    }

    /// Parses a `Choice` parameter into one of the option enums.
    pub fn parsed_choice<T: FromStr>(&self, name: &str) -> Result<T, NodeError> {
        let value = self.choice(name)?;
        value.parse().map_err(|_| NodeError::InvalidChoice {
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradient::GradientDirection;

    #[test]
    fn reads_typed_params() {
        let mut params = NodeParams::default();
        params.set("colors", ParamValue::Count(4));
        params.set("direction", ParamValue::Choice("horizontal".to_string()));
        params.set("colors", ParamValue::Count(6));
        assert_eq!(params.count("colors"), Ok(6));
        assert_eq!(params.size_at_least("colors", 1), Ok(6));
        assert_eq!(
            params.parsed_choice::<GradientDirection>("direction"),
            Ok(GradientDirection::Horizontal)
        );
        assert!(matches!(params.toggle("colors"), Err(NodeError::WrongParamType { .. })));
        assert_eq!(params.magnitude("missing"), Err(NodeError::MissingParam("missing".to_string())));
        assert_eq!(params.iter().count(), 2);
    }

    #[test]
    fn rejects_bad_choices_and_ranges() {
        let mut params = NodeParams::default();
        params.set("direction", ParamValue::Choice("sideways".to_string()));
        params.set("steps", ParamValue::Count(-1));
        assert!(matches!(
            params.parsed_choice::<GradientDirection>("direction"),
            Err(NodeError::InvalidChoice { .. })
        ));
        assert!(matches!(params.size_at_least("steps", 0), Err(NodeError::OutOfRange { .. })));
    }

    #[test]
    fn reads_typed_inputs() {
        let params = NodeParams::default();
        let color = NodeValue::Color(Color::grey(9));
        let args = NodeArgs {
            inputs: vec![Some(&color), None],
            params: &params,
        };
        assert_eq!(args.color(0), Ok(Color::grey(9)));
        assert_eq!(args.value(1), Err(NodeError::MissingInput { index: 1 }));
        assert_eq!(args.value(5), Err(NodeError::MissingInput { index: 5 }));
        assert_eq!(
            args.image(0).err(),
            Some(NodeError::WrongInputType {
                index: 0,
                expected: NodeValueType::Image,
                found: NodeValueType::Color,
            })
        );
    }
}
