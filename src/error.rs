use crate::VertexId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("vertex {0} does not exist")]
    UnknownVertex(VertexId),
    #[error("found self loop at vertex {0}")]
    SelfLoop(VertexId),
    #[error("edge between {0} and {1} already exists")]
    DuplicateEdge(VertexId, VertexId),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PartitionError {
    /// A balanced bisection needs an even number of vertices.
    #[error("odd vertex count ({count}), cannot split into two equal groups")]
    OddVertexCount { count: usize },
    /// Internal invariant failure, the partition state can no longer be trusted.
    #[error("invalid swap: {in_a} is not in group A or {in_b} is not in group B")]
    InvalidSwap { in_a: VertexId, in_b: VertexId },
}
