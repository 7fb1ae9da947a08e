//! Solution assembly and per-target project descriptors.

pub mod descriptor;
pub mod solution;

pub use descriptor::{describe_all, ProjectDescriptor};
pub use solution::{assemble, Solution, SolutionEntry, SolutionOptions};
