//! Dependency graph construction.
//!
//! Edges are direct only and resolution is pure: all I/O happens in the
//! scanner before the graph is built.

pub mod graph;

pub use graph::{lookup, DepGraph, DependencyCycle};
