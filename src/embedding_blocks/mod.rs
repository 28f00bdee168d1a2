pub mod faces;
pub mod graph_copy;
pub mod rotation;
