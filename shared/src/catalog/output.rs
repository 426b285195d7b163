use crate::node_def::*;
use crate::node_value::{NodeValue, NodeValueType};

fn render_image() -> NodeDef {
    NodeDef {
        desc: NodeDefBasicDescription::new("Render Image", "Presents an image to the host"),
        inputs: vec![NodeInputDef::new("image", NodeValueType::Image)],
        outputs: vec![],
        params: vec![],
        runner: NodeDefRunner::OutputDevice(NodeDefOutputRunner {
            run: |args| Ok(Some(NodeValue::Image(args.image(0)?.clone()))),
            device: OutputDevice {
                name: "canvas".to_string(),
            },
        }),
    }
}

pub(super) fn defs() -> Vec<(&'static str, NodeDef)> {
    vec![("render_image", render_image())]
}
