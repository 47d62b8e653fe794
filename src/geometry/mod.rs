pub mod arc;
pub mod bearing;
pub mod frame;
pub mod line;
pub mod linear;
pub mod polyline;
pub mod segment;

pub use arc::{Arc, RotationDirection};
pub use bearing::Bearing;
pub use frame::FrameId;
pub use line::Line;
pub use linear::Linear;
pub use polyline::Polyline;
pub use segment::{CrossResult, CrossStatus, ExtremityProcessing, Segment, Side};
