use crate::{Graph, PartitionError, VertexId};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::VecDeque;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum InitialPartitioningMethod {
    /// The first half of the vertex enumeration goes to A, the second half to B.
    #[default]
    Split,
    /// Vertices at even positions of the enumeration go to A, odd positions to B.
    Modulo,
    /// The enumeration is shuffled and then split in half.
    Random,
    /// A is grown by breadth first search until it holds half of the vertices.
    Bfs,
}

/// Assignment of every vertex to one of the two groups, plus the vertices of each group that
/// have not been swapped during the current pass.
///
/// Both groups always hold the same number of vertices. Membership is a table indexed by
/// [`VertexId`].
#[derive(Clone, Debug)]
pub struct PartitionState {
    sides: Vec<Side>,
    unswapped_a: Vec<VertexId>,
    unswapped_b: Vec<VertexId>,
}

impl PartitionState {
    /// Splits the vertex enumeration of `graph` in half.
    pub fn new(graph: &Graph) -> Result<Self, PartitionError> {
        let count = graph.vertex_count();
        Self::check_even(count)?;
        let half = count / 2;
        let sides = graph
            .vertex_ids()
            .map(|v| if (v as usize) < half { Side::A } else { Side::B })
            .collect();
        Ok(Self::from_sides(sides))
    }

    pub fn with_method(
        graph: &Graph,
        method: InitialPartitioningMethod,
        rng: &mut StdRng,
    ) -> Result<Self, PartitionError> {
        let count = graph.vertex_count();
        Self::check_even(count)?;
        let half = count / 2;

        let sides = match method {
            InitialPartitioningMethod::Split => return Self::new(graph),
            InitialPartitioningMethod::Modulo => graph
                .vertex_ids()
                .map(|v| if v % 2 == 0 { Side::A } else { Side::B })
                .collect(),
            InitialPartitioningMethod::Random => {
                let mut order: Vec<VertexId> = graph.vertex_ids().collect();
                order.shuffle(rng);
                let mut sides = vec![Side::B; count];
                for &v in &order[..half] {
                    sides[v as usize] = Side::A;
                }
                sides
            }
            InitialPartitioningMethod::Bfs => {
                let mut sides = vec![None; count];
                let mut size_a = 0;
                let mut queue = VecDeque::new();

                while size_a < half {
                    queue.clear();
                    let Some(start) = sides.iter().position(|s| s.is_none()) else {
                        break;
                    };
                    queue.push_back(start as VertexId);

                    while let Some(vx) = queue.pop_front() {
                        if sides[vx as usize].is_none() {
                            sides[vx as usize] = Some(Side::A);
                            size_a += 1;
                            if size_a >= half {
                                break;
                            }

                            for e in graph.neighbours(vx) {
                                if sides[e.dst as usize].is_none() {
                                    queue.push_back(e.dst);
                                }
                            }
                        }
                    }
                }
                log::trace!("bfs grew group A to {} vertices", size_a);
                sides.into_iter().map(|s| s.unwrap_or(Side::B)).collect()
            }
        };
        Ok(Self::from_sides(sides))
    }

    fn check_even(count: usize) -> Result<(), PartitionError> {
        if count % 2 != 0 {
            return Err(PartitionError::OddVertexCount { count });
        }
        Ok(())
    }

    fn from_sides(sides: Vec<Side>) -> Self {
        let members = |side| {
            sides
                .iter()
                .enumerate()
                .filter(|&(_, &s)| s == side)
                .map(|(v, _)| v as VertexId)
                .collect::<Vec<_>>()
        };
        let unswapped_a = members(Side::A);
        let unswapped_b = members(Side::B);
        Self {
            sides,
            unswapped_a,
            unswapped_b,
        }
    }

    pub fn side(&self, v: VertexId) -> Side {
        self.sides[v as usize]
    }

    pub fn group_a(&self) -> Vec<VertexId> {
        self.group(Side::A)
    }

    pub fn group_b(&self) -> Vec<VertexId> {
        self.group(Side::B)
    }

    fn group(&self, side: Side) -> Vec<VertexId> {
        self.sides
            .iter()
            .enumerate()
            .filter(|&(_, &s)| s == side)
            .map(|(v, _)| v as VertexId)
            .collect()
    }

    pub fn unswapped_a(&self) -> &[VertexId] {
        &self.unswapped_a
    }

    pub fn unswapped_b(&self) -> &[VertexId] {
        &self.unswapped_b
    }

    /// Moves `in_a` from A to B and `in_b` from B to A.
    ///
    /// `swap(x, y)` is undone by `swap(y, x)`.
    pub fn swap(&mut self, in_a: VertexId, in_b: VertexId) -> Result<(), PartitionError> {
        let valid = self.sides.get(in_a as usize) == Some(&Side::A)
            && self.sides.get(in_b as usize) == Some(&Side::B);
        if !valid {
            return Err(PartitionError::InvalidSwap { in_a, in_b });
        }
        self.sides[in_a as usize] = Side::B;
        self.sides[in_b as usize] = Side::A;
        Ok(())
    }

    /// Excludes both vertices from further swaps in this pass. Group membership is untouched.
    pub fn mark_swapped(&mut self, from_a: VertexId, from_b: VertexId) {
        self.unswapped_a.retain(|&v| v != from_a);
        self.unswapped_b.retain(|&v| v != from_b);
    }

    /// External minus internal edge weight of `v`.
    pub fn differential(&self, graph: &Graph, v: VertexId) -> i64 {
        let side = self.side(v);
        graph
            .neighbours(v)
            .iter()
            .map(|e| {
                if self.side(e.dst) != side {
                    e.weight as i64
                } else {
                    -(e.weight as i64)
                }
            })
            .sum()
    }

    /// Returns the sum of edge weights between the two groups.
    pub fn cut_cost(&self, graph: &Graph) -> u64 {
        graph
            .edges()
            .filter(|&(u, v, _)| self.side(u) != self.side(v))
            .map(|(_, _, w)| w as u64)
            .sum()
    }
}
