use crate::{Graph, InitialPartitioningMethod, PartitionError, PartitionState, Side, VertexId};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub struct BisectionPartitioningConfig {
    /// The seed for the random number generator.
    pub rng_seed: u64,
    /// What initial partitioning method to use.
    pub initial_partitioning: InitialPartitioningMethod,
}

impl Default for BisectionPartitioningConfig {
    fn default() -> Self {
        Self {
            rng_seed: 1234,
            initial_partitioning: InitialPartitioningMethod::Split,
        }
    }
}

/// One executed swap: `from_a` moved from A to B and `from_b` moved from B to A.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct SwapRecord {
    pub from_a: VertexId,
    pub from_b: VertexId,
}

impl SwapRecord {
    /// The swap that undoes this one. Both vertices changed groups, so the roles flip.
    pub fn inverse(self) -> SwapRecord {
        SwapRecord {
            from_a: self.from_b,
            from_b: self.from_a,
        }
    }

    fn apply(self, state: &mut PartitionState) -> Result<(), PartitionError> {
        state.swap(self.from_a, self.from_b)
    }
}

/// Result of a Kernighan-Lin pass, rolled back to the cheapest point of the pass.
#[derive(Clone, Debug)]
pub struct Bisection {
    state: PartitionState,
    cut_cost: u64,
    initial_cut_cost: u64,
    swap_costs: Vec<u64>,
    swaps: Vec<SwapRecord>,
}

impl Bisection {
    /// Runs one pass with the default configuration.
    pub fn compute(graph: &Graph) -> Result<Self, PartitionError> {
        graph.partition_bisection(&BisectionPartitioningConfig::default())
    }

    pub fn group_a(&self) -> Vec<VertexId> {
        self.state.group_a()
    }

    pub fn group_b(&self) -> Vec<VertexId> {
        self.state.group_b()
    }

    pub fn side(&self, v: VertexId) -> Side {
        self.state.side(v)
    }

    pub fn cut_cost(&self) -> u64 {
        self.cut_cost
    }

    pub fn initial_cut_cost(&self) -> u64 {
        self.initial_cut_cost
    }

    /// Cut cost after every swap of the pass, including the ones that were rolled back.
    pub fn swap_costs(&self) -> &[u64] {
        &self.swap_costs
    }

    /// Index of the swap the pass was rolled back to, `None` if no swap was performed.
    pub fn best_step(&self) -> Option<usize> {
        self.swaps.len().checked_sub(1)
    }

    /// The swaps that remain applied, in execution order.
    pub fn swaps(&self) -> &[SwapRecord] {
        &self.swaps
    }
}

impl Graph {
    /// Splits the graph into two equally sized parts while minimizing the edge cut cost.
    ///
    /// Performs `|V|/2` greedy swaps, each picking the unswapped pair with the highest gain, and
    /// then undoes the trailing swaps that did not lower the cut cost. Ties between pairs go to
    /// the first pair found, ties between steps to the earliest step.
    pub fn partition_bisection(
        &self,
        config: &BisectionPartitioningConfig,
    ) -> Result<Bisection, PartitionError> {
        let mut rng = StdRng::seed_from_u64(config.rng_seed);
        let mut state =
            PartitionState::with_method(self, config.initial_partitioning, &mut rng)?;

        let initial_cut_cost = state.cut_cost(self);
        log::debug!("initial edge cut: {}", initial_cut_cost);

        let partition_size = self.vertex_count() / 2;
        let mut swaps = Vec::with_capacity(partition_size);
        let mut swap_costs = Vec::with_capacity(partition_size);

        for step in 0..partition_size {
            let Some((swap, gain)) = self.best_swap(&state) else {
                break;
            };
            swap.apply(&mut state)?;
            state.mark_swapped(swap.from_a, swap.from_b);
            swaps.push(swap);

            let cost = state.cut_cost(self);
            log::trace!(
                "step: {step}, swap: {} <-> {}, gain: {gain}, edge cut: {cost}",
                self.label(swap.from_a),
                self.label(swap.from_b)
            );
            swap_costs.push(cost);
        }

        // First minimum wins, so fewer swaps are preferred on equal cost.
        let best = swap_costs
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, u64)>, (i, &cost)| match best {
                Some((_, min)) if min <= cost => best,
                _ => Some((i, cost)),
            });

        let kept = best.map_or(0, |(i, _)| i + 1);
        while swaps.len() > kept {
            if let Some(swap) = swaps.pop() {
                swap.inverse().apply(&mut state)?;
            }
        }

        let cut_cost = best.map_or(initial_cut_cost, |(_, cost)| cost);
        debug_assert_eq!(cut_cost, state.cut_cost(self));
        log::debug!(
            "kept {} of {} swaps, edge cut: {}",
            kept,
            swap_costs.len(),
            cut_cost
        );

        Ok(Bisection {
            state,
            cut_cost,
            initial_cut_cost,
            swap_costs,
            swaps,
        })
    }

    /// Returns the unswapped pair with the highest gain and that gain.
    fn best_swap(&self, state: &PartitionState) -> Option<(SwapRecord, i64)> {
        let differentials: Vec<i64> = self
            .vertex_ids()
            .map(|v| state.differential(self, v))
            .collect();

        let mut best: Option<(SwapRecord, i64)> = None;
        for &va in state.unswapped_a() {
            for &vb in state.unswapped_b() {
                let edge_cost = self.find_edge(va, vb).unwrap_or(0) as i64;
                // The edge between va and vb stays external after swapping.
                let gain =
                    differentials[va as usize] + differentials[vb as usize] - 2 * edge_cost;

                if best.map_or(true, |(_, max)| gain > max) {
                    best = Some((
                        SwapRecord {
                            from_a: va,
                            from_b: vb,
                        },
                        gain,
                    ));
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn labelled(labels: &[&str], edges: &[(&str, &str, u32)]) -> Graph {
        let mut graph = Graph::new();
        for &label in labels {
            graph.add_vertex(label);
        }
        for &(u, v, w) in edges {
            let u = graph.find_vertex(u).unwrap();
            let v = graph.find_vertex(v).unwrap();
            graph.add_edge(u, v, w).unwrap();
        }
        graph
    }

    fn labels(graph: &Graph, group: &[VertexId]) -> Vec<String> {
        group.iter().map(|&v| graph.label(v).to_string()).collect()
    }

    fn random_graph(rng: &mut StdRng, n: u32, p: f64) -> Graph {
        let mut graph = Graph::with_capacity(n as usize);
        for i in 0..n {
            graph.add_vertex(i.to_string());
        }
        for u in 0..n {
            for v in u + 1..n {
                if rng.gen_bool(p) {
                    graph.add_edge(u, v, rng.gen_range(0..10)).unwrap();
                }
            }
        }
        graph
    }

    fn assert_balanced(graph: &Graph, bisection: &Bisection) {
        let (a, b) = (bisection.group_a(), bisection.group_b());
        assert_eq!(a.len(), b.len());
        let mut all: Vec<_> = a.iter().chain(b.iter()).copied().collect();
        all.sort();
        assert_eq!(all, graph.vertex_ids().collect::<Vec<_>>());
    }

    #[test]
    fn four_vertex_scenario() {
        let graph = labelled(
            &["A", "B", "C", "D"],
            &[
                ("A", "B", 1),
                ("A", "C", 3),
                ("B", "D", 2),
                ("C", "D", 4),
                ("A", "D", 0),
                ("B", "C", 0),
            ],
        );
        let bisection = Bisection::compute(&graph).unwrap();

        assert_eq!(bisection.initial_cut_cost(), 5);
        assert_eq!(bisection.swap_costs(), &[5, 5]);
        assert_eq!(bisection.best_step(), Some(0));
        assert_eq!(
            bisection.swaps(),
            &[SwapRecord {
                from_a: 0,
                from_b: 3
            }]
        );
        assert_eq!(labels(&graph, &bisection.group_a()), vec!["B", "D"]);
        assert_eq!(labels(&graph, &bisection.group_b()), vec!["A", "C"]);
        assert_eq!(bisection.cut_cost(), 5);
        assert!(bisection.cut_cost() <= bisection.initial_cut_cost());
    }

    #[test]
    fn keeps_a_single_heavy_edge_internal() {
        // P and R start in different groups
        let graph = labelled(&["P", "Q", "R", "S"], &[("P", "R", 5)]);
        let bisection = Bisection::compute(&graph).unwrap();
        assert_eq!(bisection.initial_cut_cost(), 5);
        assert_eq!(bisection.cut_cost(), 0);
        assert_eq!(bisection.side(0), bisection.side(2));

        // P and Q start together
        let graph = labelled(&["P", "Q", "R", "S"], &[("P", "Q", 5)]);
        let bisection = Bisection::compute(&graph).unwrap();
        assert_eq!(bisection.cut_cost(), 0);
        assert_eq!(bisection.side(0), bisection.side(1));
    }

    #[test]
    fn complete_graph_has_constant_cost() {
        for n in 1..5u32 {
            let mut graph = Graph::new();
            for i in 0..2 * n {
                graph.add_vertex(i.to_string());
            }
            for u in 0..2 * n {
                for v in u + 1..2 * n {
                    graph.add_edge(u, v, 3).unwrap();
                }
            }
            let bisection = Bisection::compute(&graph).unwrap();
            assert_eq!(bisection.cut_cost(), (n * n * 3) as u64);
            assert!(bisection.swap_costs().iter().all(|&c| c == (n * n * 3) as u64));
        }
    }

    #[test]
    fn without_edges() {
        let graph = labelled(&["A", "B", "C", "D", "E", "F"], &[]);
        let bisection = Bisection::compute(&graph).unwrap();
        assert_eq!(bisection.cut_cost(), 0);
        assert_eq!(bisection.swap_costs(), &[0, 0, 0]);
        assert_balanced(&graph, &bisection);
    }

    #[test]
    fn empty_graph() {
        let graph = Graph::new();
        let bisection = Bisection::compute(&graph).unwrap();
        assert!(bisection.group_a().is_empty());
        assert!(bisection.group_b().is_empty());
        assert_eq!(bisection.cut_cost(), 0);
        assert_eq!(bisection.best_step(), None);
        assert!(bisection.swap_costs().is_empty());
    }

    #[test]
    fn odd_vertex_count() {
        let graph = labelled(&["A", "B", "C"], &[("A", "B", 1)]);
        assert_eq!(
            Bisection::compute(&graph).unwrap_err(),
            PartitionError::OddVertexCount { count: 3 }
        );
    }

    #[test]
    fn random_graphs() {
        let mut rng = StdRng::seed_from_u64(1234);
        for n in [2, 4, 10, 16, 24] {
            let graph = random_graph(&mut rng, n, 0.3);
            for method in [
                InitialPartitioningMethod::Split,
                InitialPartitioningMethod::Modulo,
                InitialPartitioningMethod::Random,
                InitialPartitioningMethod::Bfs,
            ] {
                let bisection = graph
                    .partition_bisection(&BisectionPartitioningConfig {
                        initial_partitioning: method,
                        ..Default::default()
                    })
                    .unwrap();
                assert_balanced(&graph, &bisection);

                let costs = bisection.swap_costs();
                assert_eq!(costs.len(), n as usize / 2);
                let best = bisection.best_step().unwrap();
                assert_eq!(bisection.cut_cost(), costs[best]);
                assert!(costs[best] <= costs[0]);
                assert!(costs[..best].iter().all(|&c| c > costs[best]));
                assert!(costs[best..].iter().all(|&c| c >= costs[best]));
                assert_eq!(bisection.swaps().len(), best + 1);
            }
        }
    }

    #[test]
    fn recomputed_cost_matches() {
        let mut rng = StdRng::seed_from_u64(99);
        let graph = random_graph(&mut rng, 12, 0.4);
        let bisection = Bisection::compute(&graph).unwrap();

        // replay the kept swaps on a fresh split
        let mut state = PartitionState::new(&graph).unwrap();
        for swap in bisection.swaps() {
            state.swap(swap.from_a, swap.from_b).unwrap();
        }
        assert_eq!(state.group_a(), bisection.group_a());
        assert_eq!(state.cut_cost(&graph), bisection.cut_cost());

        let direct: u64 = graph
            .edges()
            .filter(|&(u, v, _)| bisection.side(u) != bisection.side(v))
            .map(|(_, _, w)| w as u64)
            .sum();
        assert_eq!(direct, bisection.cut_cost());
    }

    #[test]
    fn swap_record_inverse() {
        let graph = labelled(&["A", "B", "C", "D"], &[("A", "C", 2)]);
        let mut state = PartitionState::new(&graph).unwrap();
        let swap = SwapRecord {
            from_a: 1,
            from_b: 2,
        };
        swap.apply(&mut state).unwrap();
        assert_eq!(state.cut_cost(&graph), 0);
        swap.inverse().apply(&mut state).unwrap();
        assert_eq!(state.group_a(), vec![0, 1]);
        assert!(swap.apply(&mut state).is_ok());
        assert!(swap.apply(&mut state).is_err());
    }
}
