mod needles;
mod split;

pub use needles::RemoveNeedles;
pub use split::SplitAutoCrossing;
