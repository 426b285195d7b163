use super::single;
use crate::error::NodeError;
use crate::generators::{self, ColorScheme};
use crate::kmeans;
use crate::node_def::*;
use crate::node_value::{NodeValue, NodeValueType, ParamValue};
use rand::rngs::StdRng;
use rand::SeedableRng;
use strum::IntoEnumIterator;

/// Quantization keeps its own random source so that repeated runs of one node
/// continue a single reproducible sequence.
struct QuantizeExecutor {
    rng: StdRng,
    max_iterations: usize,
}

impl NodeExecutor for QuantizeExecutor {
    fn execute(&mut self, args: &NodeArgs) -> Result<NodeOutputs, NodeError> {
        let colors = args.params.size_at_least("colors", 1)?;
        let image = args.image(0)?;
        let palette = kmeans::cluster_image(image, colors, self.max_iterations, &mut self.rng)?;
        let quantized = palette.apply(image)?;
        Ok(vec![
            Some(NodeValue::from(quantized)),
            Some(NodeValue::from(palette)),
        ])
    }
}

fn quantize() -> NodeDef {
    NodeDef {
        desc: NodeDefBasicDescription::new(
            "Quantize",
            "Reduces an image to its most representative colors",
        ),
        inputs: vec![NodeInputDef::new("image", NodeValueType::Image)],
        outputs: vec![
            NodeOutputDef::new("image", NodeValueType::Image),
            NodeOutputDef::new("palette", NodeValueType::Palette),
        ],
        params: vec![NodeParamDef::new("colors", ParamValue::Count(4))],
        runner: NodeDefRunner::Executor(|setup| {
            Box::new(QuantizeExecutor {
                rng: StdRng::seed_from_u64(setup.rng_seed),
                max_iterations: setup.kmeans_max_iterations,
            })
        }),
    }
}

fn apply_palette() -> NodeDef {
    NodeDef {
        desc: NodeDefBasicDescription::new(
            "Apply Palette",
            "Replaces every pixel with its nearest palette color",
        ),
        inputs: vec![
            NodeInputDef::new("image", NodeValueType::Image),
            NodeInputDef::new("palette", NodeValueType::Palette),
        ],
        outputs: vec![NodeOutputDef::new("image", NodeValueType::Image)],
        params: vec![],
        runner: NodeDefRunner::Function(|args| {
            Ok(single(args.palette(1)?.apply(args.image(0)?)?))
        }),
    }
}

fn palette_to_image() -> NodeDef {
    NodeDef {
        desc: NodeDefBasicDescription::new("Palette to Image", "Lays a palette out as swatches"),
        inputs: vec![NodeInputDef::new("palette", NodeValueType::Palette)],
        outputs: vec![NodeOutputDef::new("image", NodeValueType::Image)],
        params: vec![NodeParamDef::new("pixels", ParamValue::Count(50))],
        runner: NodeDefRunner::Function(|args| {
            let pixels = args.params.size_at_least("pixels", 1)?;
            Ok(single(args.palette(0)?.make_image(pixels)?))
        }),
    }
}

fn monochrome_palette() -> NodeDef {
    NodeDef {
        desc: NodeDefBasicDescription::new(
            "Monochrome Palette",
            "Shades and tints of one color",
        ),
        inputs: vec![NodeInputDef::new("color", NodeValueType::Color)],
        outputs: vec![NodeOutputDef::new("palette", NodeValueType::Palette)],
        params: vec![
            NodeParamDef::new("steps", ParamValue::Count(4)),
            NodeParamDef::new("include_black", ParamValue::Toggle(true)),
            NodeParamDef::new("include_white", ParamValue::Toggle(true)),
        ],
        runner: NodeDefRunner::Function(|args| {
            let steps = args.params.size_at_least("steps", 1)?;
            let include_black = args.params.toggle("include_black")?;
            let include_white = args.params.toggle("include_white")?;
            Ok(single(generators::monochrome(
                &args.color(0)?,
                steps,
                include_black,
                include_white,
            )?))
        }),
    }
}

fn duotone_palette() -> NodeDef {
    NodeDef {
        desc: NodeDefBasicDescription::new("Duotone Palette", "Even steps between two colors"),
        inputs: vec![
            NodeInputDef::new("color1", NodeValueType::Color),
            NodeInputDef::new("color2", NodeValueType::Color),
        ],
        outputs: vec![NodeOutputDef::new("palette", NodeValueType::Palette)],
        params: vec![NodeParamDef::new("steps", ParamValue::Count(4))],
        runner: NodeDefRunner::Function(|args| {
            let steps = args.params.size_at_least("steps", 1)?;
            Ok(single(generators::duotone(&args.color(0)?, &args.color(1)?, steps)?))
        }),
    }
}

fn duotone_square_palette() -> NodeDef {
    NodeDef {
        desc: NodeDefBasicDescription::new(
            "Duotone Square Palette",
            "A grid between two colors, black and white",
        ),
        inputs: vec![
            NodeInputDef::new("color1", NodeValueType::Color),
            NodeInputDef::new("color2", NodeValueType::Color),
        ],
        outputs: vec![NodeOutputDef::new("palette", NodeValueType::Palette)],
        params: vec![NodeParamDef::new("steps", ParamValue::Count(4))],
        runner: NodeDefRunner::Function(|args| {
            let steps = args.params.size_at_least("steps", 1)?;
            Ok(single(generators::duotone_square(
                &args.color(0)?,
                &args.color(1)?,
                steps,
            )?))
        }),
    }
}

fn color_scheme() -> NodeDef {
    NodeDef {
        desc: NodeDefBasicDescription::new("Palette", "A color-wheel harmony around one color"),
        inputs: vec![NodeInputDef::new("color", NodeValueType::Color)],
        outputs: vec![NodeOutputDef::new("palette", NodeValueType::Palette)],
        params: vec![NodeParamDef::choice("scheme", ColorScheme::iter())],
        runner: NodeDefRunner::Function(|args| {
            let scheme: ColorScheme = args.params.parsed_choice("scheme")?;
            Ok(single(scheme.generate(&args.color(0)?)))
        }),
    }
}

pub(super) fn defs() -> Vec<(&'static str, NodeDef)> {
    vec![
        ("quantize", quantize()),
        ("apply_palette", apply_palette()),
        ("palette_to_image", palette_to_image()),
        ("monochrome_palette", monochrome_palette()),
        ("duotone_palette", duotone_palette()),
        ("duotone_square_palette", duotone_square_palette()),
        ("color_scheme", color_scheme()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::evaluate;
    use crate::color::{Color, BLACK, WHITE};
    use crate::error::PaletteError;
    use crate::image::Image;
    use crate::palette::Palette;

    fn palette_of(value: &Option<NodeValue>) -> Vec<Color> {
        match value {
            Some(NodeValue::Palette(palette)) => palette.colors().to_vec(),
            other => panic!("expected a palette, got {:?}", other),
        }
    }

    #[test]
    fn quantize_finds_black_and_white() {
        let def = quantize();
        let mut params = def.default_params();
        params.set("colors", ParamValue::Count(2));
        let image = Image::from_pixels(2, 2, vec![BLACK, BLACK, WHITE, WHITE]).unwrap();
        let outputs = evaluate(&def, &[NodeValue::from(image.clone())], &params).unwrap();
        assert_eq!(outputs.len(), 2);

        let mut centroids = palette_of(&outputs[1]);
        centroids.sort_by_key(|c| c.luminosity());
        assert_eq!(centroids, vec![BLACK, WHITE]);
        assert_eq!(outputs[0], Some(NodeValue::from(image)));
    }

    #[test]
    fn quantize_rejects_an_empty_image() {
        let def = quantize();
        let result = evaluate(&def, &[NodeValue::from(Image::new(0, 0))], &def.default_params());
        assert!(result.is_err());
    }

    #[test]
    fn apply_palette_needs_colors() {
        let def = apply_palette();
        let inputs = [
            NodeValue::from(Image::filled(1, 1, WHITE)),
            NodeValue::from(Palette::default()),
        ];
        assert_eq!(
            evaluate(&def, &inputs, &def.default_params()),
            Err(NodeError::Palette(PaletteError::Empty))
        );
    }

    #[test]
    fn palette_to_image_lays_out_swatches() {
        let def = palette_to_image();
        let mut params = def.default_params();
        params.set("pixels", ParamValue::Count(2));
        let palette = Palette::new(vec![BLACK, WHITE, BLACK, WHITE]);
        let outputs = evaluate(&def, &[NodeValue::from(palette)], &params).unwrap();
        match &outputs[0] {
            Some(NodeValue::Image(image)) => {
                assert_eq!((image.width(), image.height()), (4, 4));
                assert_eq!(image.get(3, 3).unwrap(), WHITE);
            }
            other => panic!("expected an image, got {:?}", other),
        }
    }

    #[test]
    fn generator_nodes_honour_steps() {
        let inputs = [NodeValue::Color(BLACK), NodeValue::Color(WHITE)];
        let def = duotone_palette();
        let mut params = def.default_params();
        params.set("steps", ParamValue::Count(3));
        let outputs = evaluate(&def, &inputs, &params).unwrap();
        assert_eq!(palette_of(&outputs[0]), vec![BLACK, Color::grey(127), WHITE]);

        let def = duotone_square_palette();
        let outputs = evaluate(&def, &inputs, &def.default_params()).unwrap();
        assert_eq!(palette_of(&outputs[0]).len(), 16);

        let def = monochrome_palette();
        let outputs = evaluate(&def, &[NodeValue::Color(Color::rgb(34, 69, 158))], &def.default_params()).unwrap();
        assert_eq!(palette_of(&outputs[0]).len(), 4);
    }

    #[test]
    fn color_scheme_defaults_to_analogous() {
        let def = color_scheme();
        let seed = Color::rgb(200, 40, 40);
        let outputs = evaluate(&def, &[NodeValue::Color(seed)], &def.default_params()).unwrap();
        let colors = palette_of(&outputs[0]);
        assert_eq!(colors.len(), 3);
        assert_eq!(colors[1], seed);
    }
}
