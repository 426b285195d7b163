use super::color::Color;
use super::image::Image;
use super::palette::Palette;
use super::palette_map::PaletteMap;
use std::sync::Arc;
use strum_macros::{Display, EnumDiscriminants};

/// A value that travels along a wire, from a node output to node inputs.
///
/// Heavy values are shared behind an `Arc`, so handing a value to several
/// subscribers never copies pixels, and identity (see `same_as`) is cheap to
/// check when deciding whether a node has to recompute.
#[derive(Debug, EnumDiscriminants, PartialEq, Clone)]
#[strum_discriminants(name(NodeValueType), derive(Hash, Display))]
pub enum NodeValue {
    /// A single RGBA color.
    Color(Color),

    /// 2-dimensional bitmap image. Stored uncompressed.
    Image(Arc<Image>),

    /// Ordered list of colors.
    Palette(Arc<Palette>),

    /// Positional mapping from one palette onto another.
    PaletteMap(Arc<PaletteMap>),
}

impl NodeValue {
    pub fn value_type(&self) -> NodeValueType {
        NodeValueType::from(self)
    }

    /// Identity check used for memoization: shared values compare by pointer,
    /// colors (plain values) by equality.
    pub fn same_as(&self, other: &NodeValue) -> bool {
        match (self, other) {
            (NodeValue::Color(a), NodeValue::Color(b)) => a == b,
            (NodeValue::Image(a), NodeValue::Image(b)) => Arc::ptr_eq(a, b),
            (NodeValue::Palette(a), NodeValue::Palette(b)) => Arc::ptr_eq(a, b),
            (NodeValue::PaletteMap(a), NodeValue::PaletteMap(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn as_image(&self) -> Option<&Arc<Image>> {
        match self {
            NodeValue::Image(image) => Some(image),
            _ => None,
        }
    }
}

impl From<Color> for NodeValue {
    fn from(color: Color) -> Self {
        NodeValue::Color(color)
    }
}

impl From<Image> for NodeValue {
    fn from(image: Image) -> Self {
        NodeValue::Image(Arc::new(image))
    }
}

impl From<Palette> for NodeValue {
    fn from(palette: Palette) -> Self {
        NodeValue::Palette(Arc::new(palette))
    }
}

impl From<PaletteMap> for NodeValue {
    fn from(map: PaletteMap) -> Self {
        NodeValue::PaletteMap(Arc::new(map))
    }
}

/// Element-wise `same_as` over two input tuples; empty slots match each other.
pub fn same_values(a: &[Option<NodeValue>], b: &[Option<NodeValue>]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b.iter()).all(|pair| match pair {
            (Some(x), Some(y)) => x.same_as(y),
            (None, None) => true,
            _ => false,
        })
}

/// A user-editable setting on a node. Changing one forces that node to recompute.
#[derive(Debug, EnumDiscriminants, PartialEq, Clone)]
#[strum_discriminants(name(ParamType), derive(Hash, Display))]
pub enum ParamValue {
    /// Signed integer value, such as a number of colors or a pixel size.
    Count(i64),

    /// Real-valued amount, such as a percentage or an angle.
    Magnitude(f64),

    /// Boolean value, used to switch something on or off.
    Toggle(bool),

    /// One option out of a fixed list, such as a filter name.
    Choice(String),

    /// A color chosen in the UI.
    Color(Color),

    /// An image delivered from outside the engine, if one has been loaded.
    Image(Option<Arc<Image>>),
}

impl ParamValue {
    pub fn param_type(&self) -> ParamType {
        ParamType::from(self)
    }
}
