pub mod bezier;
pub mod grid;
pub mod outline;
pub mod settings;
pub mod tab;

pub use bezier::{CubicBezier, CubicSamples, Point};
pub use grid::{CropRect, GridError, GridSpec, PieceSlot};
pub use outline::PieceOutline;
pub use settings::{marker_radius, CutSettings};
pub use tab::{EdgeSide, EdgeType, TabShape};
