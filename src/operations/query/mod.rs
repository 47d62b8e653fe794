pub mod self_intersect;

pub use self_intersect::AutoIntersection;
