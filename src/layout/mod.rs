//! Layout engine for scene graphs
//!
//! A scene is a tree of [`Node`]s held in a [`SceneGraph`]. Each node
//! carries an [`Operator`] (spread, layer, rect, ...) that decides how its
//! children are sized and placed. [`layout`] runs the whole pass and returns
//! a [`LayoutResult`] describing the root; afterwards every node has an
//! intrinsic extent and a translation relative to its parent.

pub mod config;
pub mod context;
pub mod dims;
pub mod domain;
pub mod error;
pub mod monotonic;
pub mod node;
pub mod operator;
pub mod operators;
pub mod pipeline;
pub mod space;
pub mod types;

pub use config::LayoutConfig;
pub use context::{LayoutWarning, RenderContext};
pub use dims::{data, AxisDims, Dimensions, Encoded, Interval};
pub use domain::PosScale;
pub use error::LayoutError;
pub use monotonic::{InverseOptions, Monotonic};
pub use node::{Fill, Node, NodeId, Phase, SceneGraph};
pub use operator::{LayoutOperator, Operator, RenderData};
pub use operators::{
    Arrow, Connect, Coord, Interpolation, Layer, Position, Rect, Ref, RefTarget, Spread, SpreadMode,
};
pub use pipeline::{layout, LayoutResult, OrdinalScale};
pub use space::UnderlyingSpace;
pub use types::{Alignment, Axis, BoundingBox, Point, Size};
