use super::error::RegistryError;
use super::node_def::NodeDef;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Catalog of node types, keyed by type name. The UI layer reads it to populate
/// its picklist and hands it to the engine, which instantiates nodes from it.
/// Shared behind an `Arc`, so plugins may keep registering types after the
/// engine has been created.
#[derive(Default)]
pub struct NodeDefRegistry {
    map: RwLock<BTreeMap<String, Arc<NodeDef>>>,
}

/// One picklist entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeTypeListing {
    pub type_name: String,
    pub display_name: String,
}

impl NodeDefRegistry {
    pub fn new() -> NodeDefRegistry {
        NodeDefRegistry::default()
    }

    pub fn register(&self, node_def_name: &str, node_def: NodeDef) -> Result<(), RegistryError> {
        let mut map = self.map.write();
        if map.contains_key(node_def_name) {
            return Err(RegistryError::AlreadyRegistered(node_def_name.to_string()));
        }
        map.insert(node_def_name.to_string(), Arc::new(node_def));
        Ok(())
    }

    pub fn get_def(&self, node_def_name: &str) -> Result<Arc<NodeDef>, RegistryError> {
        self.map
            .read()
            .get(node_def_name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownNodeType(node_def_name.to_string()))
    }

    pub fn contains(&self, node_def_name: &str) -> bool {
        self.map.read().contains_key(node_def_name)
    }

    /// Registered types sorted by type name.
    pub fn listing(&self) -> Vec<NodeTypeListing> {
        self.map
            .read()
            .iter()
            .map(|(name, def)| NodeTypeListing {
                type_name: name.clone(),
                display_name: def.desc.name.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.read().is_empty()
    }

    pub fn reset(&self) {
        self.map.write().clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node_def::*;
    use crate::node_value::{NodeValue, NodeValueType};

    fn passthrough() -> NodeDef {
        NodeDef {
            desc: NodeDefBasicDescription::new("Passthrough", "Forwards its color"),
            inputs: vec![NodeInputDef::new("color", NodeValueType::Color)],
            outputs: vec![NodeOutputDef::new("color", NodeValueType::Color)],
            params: vec![],
            runner: NodeDefRunner::Function(|args| {
                Ok(vec![Some(NodeValue::Color(args.color(0)?))])
            }),
        }
    }

    #[test]
    fn registers_and_lists_types() {
        let registry = NodeDefRegistry::new();
        registry.register("passthrough", passthrough()).unwrap();
        assert_eq!(
            registry.register("passthrough", passthrough()),
            Err(RegistryError::AlreadyRegistered("passthrough".to_string()))
        );
        assert_eq!(registry.get_def("passthrough").unwrap().desc.name, "Passthrough");
        assert!(matches!(
            registry.get_def("nope"),
            Err(RegistryError::UnknownNodeType(_))
        ));
        assert_eq!(
            registry.listing(),
            vec![NodeTypeListing {
                type_name: "passthrough".to_string(),
                display_name: "Passthrough".to_string(),
            }]
        );
        registry.reset();
        assert!(registry.is_empty());
    }
}
