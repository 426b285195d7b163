//! Value types, color algorithms and node definitions shared between the
//! engine and whatever UI layer drives it.

pub mod catalog;
pub mod color;
pub mod combinatorics;
pub mod error;
pub mod generators;
pub mod gradient;
pub mod image;
pub mod kmeans;
pub mod node_def;
pub mod node_def_registry;
pub mod node_value;
pub mod palette;
pub mod palette_map;
