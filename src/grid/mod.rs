mod builder;
mod hexgrid;
mod sizing;
mod target;

pub use hexgrid::{HexCell, HexGrid};
pub use target::TargetData;
