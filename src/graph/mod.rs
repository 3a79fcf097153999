/// Cycle-safe traversal over resolved relation graphs.
pub mod traversal;

pub use traversal::{find_cycle, GraphTraverser, TraversalDirection};
