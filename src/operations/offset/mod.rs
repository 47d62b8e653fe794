mod parallel_copy;

pub use parallel_copy::ParallelCopy;
