mod components;
mod graph;

pub use graph::ConnectivityGraph;
