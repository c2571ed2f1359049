//! Authored dialogue content: nodes, graphs and flat scripts.

pub mod graph;
pub mod node;
pub mod script;
