use super::single;
use crate::color::Color;
use crate::gradient::{self, GradientDirection};
use crate::node_def::*;
use crate::node_value::{NodeValueType, ParamValue};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Per-pixel adjustments offered by the filter node. Every kind keeps alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum FilterKind {
    Greyscale,
    Sepia,
    Invert,
    /// Scales HSI saturation by `amount` percent.
    Saturation,
    /// Rotates HSI hue by `amount` degrees.
    HueRotation,
    /// Scales HSL lightness by `amount` percent.
    Lightness,
}

impl FilterKind {
    pub fn apply(&self, color: &Color, amount: f64) -> Color {
        match self {
            FilterKind::Greyscale => color.greyscale(),
            FilterKind::Sepia => color.sepia(),
            FilterKind::Invert => color.invert(),
            FilterKind::Saturation => {
                let (h, s, i) = color.hsi();
                Color::from_hsi(h, s * amount / 100.0, i).with_alpha(color.a)
            }
            FilterKind::HueRotation => {
                let (h, s, i) = color.hsi();
                Color::from_hsi(h + amount / 360.0, s, i).with_alpha(color.a)
            }
            FilterKind::Lightness => {
                let (h, s, l) = color.hsl();
                Color::from_hsl(h, s, l * amount / 100.0).with_alpha(color.a)
            }
        }
    }
}

fn filter() -> NodeDef {
    NodeDef {
        desc: NodeDefBasicDescription::new("Filter", "Applies a per-pixel color adjustment"),
        inputs: vec![NodeInputDef::new("image", NodeValueType::Image)],
        outputs: vec![NodeOutputDef::new("image", NodeValueType::Image)],
        params: vec![
            NodeParamDef::choice("filter", FilterKind::iter()),
            NodeParamDef::new("amount", ParamValue::Magnitude(100.0)),
        ],
        runner: NodeDefRunner::Function(|args| {
            let kind: FilterKind = args.params.parsed_choice("filter")?;
            let amount = args.params.magnitude("amount")?;
            let image = args.image(0)?;
            Ok(single(image.map(|c, _, _| kind.apply(&c, amount))))
        }),
    }
}

fn greyscale() -> NodeDef {
    NodeDef {
        desc: NodeDefBasicDescription::new("Greyscale", "Replaces every pixel with its luminosity"),
        inputs: vec![NodeInputDef::new("image", NodeValueType::Image)],
        outputs: vec![NodeOutputDef::new("image", NodeValueType::Image)],
        params: vec![],
        runner: NodeDefRunner::Function(|args| {
            Ok(single(args.image(0)?.map(|c, _, _| c.greyscale())))
        }),
    }
}

fn invert() -> NodeDef {
    NodeDef {
        desc: NodeDefBasicDescription::new("Invert", "Inverts the color channels of every pixel"),
        inputs: vec![NodeInputDef::new("image", NodeValueType::Image)],
        outputs: vec![NodeOutputDef::new("image", NodeValueType::Image)],
        params: vec![],
        runner: NodeDefRunner::Function(|args| {
            Ok(single(args.image(0)?.map(|c, _, _| c.invert())))
        }),
    }
}

fn gradient() -> NodeDef {
    NodeDef {
        desc: NodeDefBasicDescription::new("Gradient", "Renders a linear gradient between two colors"),
        inputs: vec![
            NodeInputDef::new("color1", NodeValueType::Color),
            NodeInputDef::new("color2", NodeValueType::Color),
        ],
        outputs: vec![NodeOutputDef::new("image", NodeValueType::Image)],
        params: vec![
            NodeParamDef::choice("direction", GradientDirection::iter()),
            NodeParamDef::new("width", ParamValue::Count(300)),
            NodeParamDef::new("height", ParamValue::Count(200)),
        ],
        runner: NodeDefRunner::Function(|args| {
            let direction: GradientDirection = args.params.parsed_choice("direction")?;
            let width = args.params.size_at_least("width", 1)?;
            let height = args.params.size_at_least("height", 1)?;
            let (color1, color2) = (args.color(0)?, args.color(1)?);
            Ok(single(gradient::render(direction, &color1, &color2, width, height)?))
        }),
    }
}

fn image_color_picker() -> NodeDef {
    NodeDef {
        desc: NodeDefBasicDescription::new("Image Color Picker", "Reads the color of one pixel"),
        inputs: vec![NodeInputDef::new("image", NodeValueType::Image)],
        outputs: vec![NodeOutputDef::new("color", NodeValueType::Color)],
        params: vec![
            NodeParamDef::new("x", ParamValue::Count(0)),
            NodeParamDef::new("y", ParamValue::Count(0)),
        ],
        runner: NodeDefRunner::Function(|args| {
            let x = args.params.size_at_least("x", 0)?;
            let y = args.params.size_at_least("y", 0)?;
            Ok(single(args.image(0)?.get(x, y)?))
        }),
    }
}

pub(super) fn defs() -> Vec<(&'static str, NodeDef)> {
    vec![
        ("filter", filter()),
        ("greyscale", greyscale()),
        ("invert", invert()),
        ("gradient", gradient()),
        ("image_color_picker", image_color_picker()),
    ]
}
