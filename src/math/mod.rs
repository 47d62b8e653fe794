pub mod extent;
pub mod tolerance;
pub mod transform;

pub use extent::Extent;
pub use tolerance::{Tolerance, ToleranceConfig};
pub use transform::Similarity2;

pub type Point2 = nalgebra::Point2<f64>;
pub type Vector2 = nalgebra::Vector2<f64>;
