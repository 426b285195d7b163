use super::single;
use crate::color::Color;
use crate::generators;
use crate::node_def::*;
use crate::node_value::{NodeValue, NodeValueType, ParamValue};

/// Default for a fresh color picker.
const DEFAULT_PICKER_COLOR: Color = Color::rgb(34, 69, 158);

fn read_image() -> NodeDef {
    NodeDef {
        desc: NodeDefBasicDescription::new("Read Image", "Publishes an image loaded from outside the graph"),
        inputs: vec![],
        outputs: vec![NodeOutputDef::new("image", NodeValueType::Image)],
        params: vec![NodeParamDef::new("image", ParamValue::Image(None))],
        runner: NodeDefRunner::Function(|args| {
            let image = args.params.image("image")?;
            Ok(vec![image.map(|image| NodeValue::Image(image.clone()))])
        }),
    }
}

fn color_picker() -> NodeDef {
    NodeDef {
        desc: NodeDefBasicDescription::new("Color Picker", "Publishes a single chosen color"),
        inputs: vec![],
        outputs: vec![NodeOutputDef::new("color", NodeValueType::Color)],
        params: vec![NodeParamDef::new("color", ParamValue::Color(DEFAULT_PICKER_COLOR))],
        runner: NodeDefRunner::Function(|args| Ok(single(args.params.color("color")?))),
    }
}

fn subdivide_palette() -> NodeDef {
    NodeDef {
        desc: NodeDefBasicDescription::new("Subdivided Palette", "Evenly spaced colors from the RGB cube"),
        inputs: vec![],
        outputs: vec![NodeOutputDef::new("palette", NodeValueType::Palette)],
        params: vec![NodeParamDef::new("divisions", ParamValue::Count(3))],
        runner: NodeDefRunner::Function(|args| {
            let divisions = args.params.size_at_least("divisions", 1)?;
            Ok(single(generators::subdivide(divisions)?))
        }),
    }
}

pub(super) fn defs() -> Vec<(&'static str, NodeDef)> {
    vec![
        ("read_image", read_image()),
        ("color_picker", color_picker()),
        ("subdivide_palette", subdivide_palette()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::evaluate;
    use crate::image::Image;
    use std::sync::Arc;

    #[test]
    fn read_image_publishes_nothing_until_loaded() {
        let def = read_image();
        let mut params = def.default_params();
        assert_eq!(evaluate(&def, &[], &params).unwrap(), vec![None]);

        let image = Arc::new(Image::new(2, 2));
        params.set("image", ParamValue::Image(Some(image.clone())));
        let outputs = evaluate(&def, &[], &params).unwrap();
        assert!(outputs[0].as_ref().unwrap().same_as(&NodeValue::Image(image)));
    }

    #[test]
    fn color_picker_publishes_its_color() {
        let def = color_picker();
        let outputs = evaluate(&def, &[], &def.default_params()).unwrap();
        assert_eq!(outputs, vec![Some(NodeValue::Color(DEFAULT_PICKER_COLOR))]);
    }

    #[test]
    fn subdivide_rejects_zero_divisions() {
        let def = subdivide_palette();
        let mut params = def.default_params();
        params.set("divisions", ParamValue::Count(0));
        assert!(evaluate(&def, &[], &params).is_err());
    }
}
