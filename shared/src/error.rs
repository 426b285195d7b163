use super::color::Color;
use super::node_value::{NodeValueType, ParamType};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColorError {
    #[error("invalid hex color {0:?}")]
    InvalidHex(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImageError {
    #[error("pixel buffer for a {width}x{height} image must hold {expected} bytes, found {found}")]
    BufferLength {
        width: usize,
        height: usize,
        expected: usize,
        found: usize,
    },
    #[error("pixel ({x}, {y}) is outside of a {width}x{height} image")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    #[error("a {width}x{height} image exceeds the {max} pixel limit")]
    TooLarge {
        width: usize,
        height: usize,
        max: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaletteError {
    #[error("palette has no colors")]
    Empty,
    #[error("src and dst palettes must be the same size, {from} vs {to}")]
    LengthMismatch { from: usize, to: usize },
    #[error("dst palette has fewer colors than the src, {to} vs {from}")]
    NotEnoughColors { from: usize, to: usize },
    #[error("source palette does not include color {0}")]
    MissingColor(Color),
    #[error("palette would exceed {max} colors")]
    TooManyColors { max: usize },
    #[error(transparent)]
    Image(#[from] ImageError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClusterError {
    #[error("cannot cluster an empty set of points")]
    NoPoints,
    #[error("number of clusters must be at least 1")]
    NoClusters,
    #[error("cannot build {k} clusters, the limit is {max}")]
    TooManyClusters { k: usize, max: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("{0} already registered as a node def")]
    AlreadyRegistered(String),
    #[error("no such node type: {0}")]
    UnknownNodeType(String),
}

/// Failures raised from inside a node's compute function.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NodeError {
    #[error("input {index} has no value")]
    MissingInput { index: usize },
    #[error("input {index} expected a {expected} value, found {found}")]
    WrongInputType {
        index: usize,
        expected: NodeValueType,
        found: NodeValueType,
    },
    #[error("parameter {0:?} is not set")]
    MissingParam(String),
    #[error("parameter {name:?} expected a {expected} value, found {found}")]
    WrongParamType {
        name: String,
        expected: ParamType,
        found: ParamType,
    },
    #[error("parameter {name:?} has no option {value:?}")]
    InvalidChoice { name: String, value: String },
    #[error("parameter {name:?} is out of range: {value}")]
    OutOfRange { name: String, value: String },
    #[error(transparent)]
    Color(#[from] ColorError),
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error(transparent)]
    Palette(#[from] PaletteError),
    #[error(transparent)]
    Cluster(#[from] ClusterError),
}
