//! Built-in operators

mod arrow;
mod connect;
mod coord;
mod layer;
mod position;
mod rect;
mod reference;
mod spread;

pub use arrow::Arrow;
pub use connect::{Connect, Interpolation};
pub use coord::Coord;
pub use layer::Layer;
pub use position::Position;
pub use rect::Rect;
pub use reference::{Ref, RefTarget};
pub use spread::{Spread, SpreadMode};
