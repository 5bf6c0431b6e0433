// Graph bisection using a single pass of the Kernighan-Lin heuristic:
// https://ieeexplore.ieee.org/document/6771089

mod bisection;
mod error;
mod io;
mod partition_util;

pub use bisection::{Bisection, BisectionPartitioningConfig, SwapRecord};
pub use error::{GraphError, PartitionError};
pub use partition_util::{InitialPartitioningMethod, PartitionState, Side};

/// Index of a vertex in the enumeration order of its graph.
pub type VertexId = u32;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GraphEdge {
    pub dst: VertexId,
    pub weight: u32,
}

#[derive(Clone, Debug)]
pub struct GraphVertex {
    pub label: String,
    pub edges: Vec<GraphEdge>,
}

/// Undirected, edge-weighted graph stored as adjacency lists.
///
/// Every edge is kept on both of its endpoints. Self loops and parallel edges are rejected on
/// insertion, so there is at most one edge per unordered pair of vertices.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    vertices: Vec<GraphVertex>,
    edge_count: usize,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertex_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            edge_count: 0,
        }
    }

    pub fn add_vertex(&mut self, label: impl Into<String>) -> VertexId {
        self.vertices.push(GraphVertex {
            label: label.into(),
            edges: vec![],
        });
        (self.vertices.len() - 1) as VertexId
    }

    pub fn add_edge(&mut self, u: VertexId, v: VertexId, weight: u32) -> Result<(), GraphError> {
        for x in [u, v] {
            if x as usize >= self.vertices.len() {
                return Err(GraphError::UnknownVertex(x));
            }
        }
        if u == v {
            return Err(GraphError::SelfLoop(u));
        }
        if self.find_edge(u, v).is_some() {
            return Err(GraphError::DuplicateEdge(u, v));
        }
        self.vertices[u as usize].edges.push(GraphEdge { dst: v, weight });
        self.vertices[v as usize].edges.push(GraphEdge { dst: u, weight });
        self.edge_count += 1;
        Ok(())
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// All vertices in insertion order. The order is stable and drives the initial split.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> {
        0..self.vertices.len() as VertexId
    }

    pub fn label(&self, v: VertexId) -> &str {
        &self.vertices[v as usize].label
    }

    pub fn find_vertex(&self, label: &str) -> Option<VertexId> {
        self.vertices
            .iter()
            .position(|v| v.label == label)
            .map(|i| i as VertexId)
    }

    pub fn neighbours(&self, v: VertexId) -> &[GraphEdge] {
        &self.vertices[v as usize].edges
    }

    /// Every edge exactly once as `(u, v, weight)` with `u < v`.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId, u32)> + '_ {
        self.vertices.iter().enumerate().flat_map(|(u, vertex)| {
            let u = u as VertexId;
            vertex
                .edges
                .iter()
                .filter(move |e| u < e.dst)
                .map(move |e| (u, e.dst, e.weight))
        })
    }

    /// Returns the weight of the edge between `u` and `v`, if there is one.
    pub fn find_edge(&self, u: VertexId, v: VertexId) -> Option<u32> {
        let degree = |x: VertexId| self.vertices[x as usize].edges.len();
        let (u, v) = if degree(u) <= degree(v) { (u, v) } else { (v, u) };
        self.vertices[u as usize]
            .edges
            .iter()
            .find(|e| e.dst == v)
            .map(|e| e.weight)
    }
}
