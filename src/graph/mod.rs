mod graph;
mod keyed;
mod node;

pub use graph::Graph;
pub use keyed::KeyedGraph;
pub use node::NodeId;
