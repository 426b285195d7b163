//! The built-in node types. Every compute function here is a pure function of
//! its inputs and parameters; the engine decides when to call it.

mod filters;
mod mapping;
mod output;
mod palettes;
mod sources;

pub use filters::FilterKind;
pub use mapping::MappingAlgorithm;

use super::error::RegistryError;
use super::node_def::{NodeDef, NodeOutputs};
use super::node_def_registry::NodeDefRegistry;
use super::node_value::NodeValue;

fn single<V: Into<NodeValue>>(value: V) -> NodeOutputs {
    vec![Some(value.into())]
}

fn builtin_defs() -> Vec<(&'static str, NodeDef)> {
    let mut defs = sources::defs();
    defs.extend(filters::defs());
    defs.extend(palettes::defs());
    defs.extend(mapping::defs());
    defs.extend(output::defs());
    defs
}

/// Adds every built-in node type to `registry`.
pub fn register_builtins(registry: &NodeDefRegistry) -> Result<(), RegistryError> {
    for (name, def) in builtin_defs() {
        registry.register(name, def)?;
    }
    Ok(())
}

/// A fresh registry holding only the built-in node types.
pub fn builtin_registry() -> Result<NodeDefRegistry, RegistryError> {
    let registry = NodeDefRegistry::new();
    register_builtins(&registry)?;
    Ok(registry)
}

/// Runs a definition once, outside of any graph.
#[cfg(test)]
pub(crate) fn evaluate(
    def: &NodeDef,
    inputs: &[NodeValue],
    params: &crate::node_def::NodeParams,
) -> Result<NodeOutputs, crate::error::NodeError> {
    use crate::node_def::{ExecutorSetup, NodeArgs, NodeDefRunner};
    let args = NodeArgs {
        inputs: inputs.iter().map(Some).collect(),
        params,
    };
    match &def.runner {
        NodeDefRunner::Function(f) => f(&args),
        NodeDefRunner::Executor(factory) => factory(&ExecutorSetup {
            rng_seed: 7,
            kmeans_max_iterations: 100,
        })
        .execute(&args),
        NodeDefRunner::OutputDevice(od) => (od.run)(&args).map(|v| vec![v]),
    }
}
