use super::single;
use crate::error::PaletteError;
use crate::node_def::*;
use crate::node_value::NodeValueType;
use crate::palette::Palette;
use crate::palette_map::PaletteMap;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// How the palette mapping node pairs source colors with destination colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum MappingAlgorithm {
    Luminosity,
    Direct,
    NearestGreedy,
    NearestBruteForce,
}

impl MappingAlgorithm {
    pub fn build(&self, from: &Palette, to: &Palette) -> Result<PaletteMap, PaletteError> {
        match self {
            MappingAlgorithm::Luminosity => PaletteMap::by_luminosity(from, to),
            MappingAlgorithm::Direct => PaletteMap::direct(from, to),
            MappingAlgorithm::NearestGreedy => PaletteMap::nearest_greedy(from, to),
            MappingAlgorithm::NearestBruteForce => PaletteMap::nearest_brute_force(from, to),
        }
    }
}

fn palette_map() -> NodeDef {
    NodeDef {
        desc: NodeDefBasicDescription::new(
            "Palette Mapping",
            "Pairs the colors of one palette with another",
        ),
        inputs: vec![
            NodeInputDef::new("palette1", NodeValueType::Palette),
            NodeInputDef::new("palette2", NodeValueType::Palette),
        ],
        outputs: vec![NodeOutputDef::new("palette_map", NodeValueType::PaletteMap)],
        params: vec![NodeParamDef::choice("algorithm", MappingAlgorithm::iter())],
        runner: NodeDefRunner::Function(|args| {
            let algorithm: MappingAlgorithm = args.params.parsed_choice("algorithm")?;
            Ok(single(algorithm.build(args.palette(0)?, args.palette(1)?)?))
        }),
    }
}

fn apply_palette_map() -> NodeDef {
    NodeDef {
        desc: NodeDefBasicDescription::new(
            "Apply Palette Mapping",
            "Recolors an image through a palette mapping",
        ),
        inputs: vec![
            NodeInputDef::new("image", NodeValueType::Image),
            NodeInputDef::new("mapping", NodeValueType::PaletteMap),
        ],
        outputs: vec![NodeOutputDef::new("image", NodeValueType::Image)],
        params: vec![],
        runner: NodeDefRunner::Function(|args| {
            Ok(single(args.palette_map(1)?.apply(args.image(0)?)?))
        }),
    }
}

pub(super) fn defs() -> Vec<(&'static str, NodeDef)> {
    vec![
        ("palette_map", palette_map()),
        ("apply_palette_map", apply_palette_map()),
    ]
}
