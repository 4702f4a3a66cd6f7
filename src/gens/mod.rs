/*!
# Graph Generators

Random-graph models used by the null-model comparison:

- [`Gnm`](gnm::Gnm): uniform `G(n,m)` graphs with a fixed number of nodes
  and edges.
- [`DegreeSequence`](degree_sequence::DegreeSequence): the directed
  configuration model, preserving a joint in-/out-degree sequence.

Generators are configurable structs producing an edge stream; the
[`RandomGraph`] trait offers one-call construction of a graph instance:

```
use ctrlgraphs::{prelude::*, gens::*};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

let rng = &mut Pcg64Mcg::seed_from_u64(42);
let g = DiGraph::gnm(rng, 50, 100);
assert_eq!(g.number_of_nodes(), 50);
assert_eq!(g.number_of_edges(), 100);
```
*/

use rand::Rng;

use crate::prelude::*;

pub mod degree_sequence;
pub mod gnm;

pub use degree_sequence::*;
pub use gnm::*;

/// Trait for generators that allow specifying the number of nodes.
pub trait NumNodesGen: Sized {
    /// Sets the number of nodes in the generator (mutable setter).
    fn set_nodes(&mut self, n: NumNodes);

    /// Sets the number of nodes and returns the generator (builder style).
    fn nodes(mut self, n: NumNodes) -> Self {
        self.set_nodes(n);
        self
    }
}

/// Trait for generators that allow specifying the number of edges.
pub trait NumEdgesGen: Sized {
    /// Sets the number of edges in the generator (mutable setter).
    fn set_edges(&mut self, m: NumEdges);

    /// Sets the number of edges and returns the generator (builder style).
    fn edges(mut self, m: NumEdges) -> Self {
        self.set_edges(m);
        self
    }
}

/// General trait for a configurable random edge generator.
pub trait GraphGenerator {
    /// Produces a lazy stream (iterator) of edges.
    fn stream<'a, R>(&'a self, rng: &'a mut R) -> impl Iterator<Item = Edge> + 'a
    where
        R: Rng;

    /// Generates a `Vec<Edge>` by fully materializing the edge stream.
    fn generate<R>(&self, rng: &mut R) -> Vec<Edge>
    where
        R: Rng,
    {
        self.stream(rng).collect()
    }
}

/// Trait for constructing full random graph instances.
pub trait RandomGraph: Sized {
    /// Creates a uniform random `G(n,m)` graph with exactly `m` edges and
    /// no self-loops.
    fn gnm<R>(rng: &mut R, n: NumNodes, m: NumEdges) -> Self
    where
        R: Rng;

    /// Creates a configuration-model graph realizing the given joint
    /// out-/in-degree sequence. Self-loops and parallel edges may occur.
    fn degree_sequence<R>(rng: &mut R, out_seq: &[NumNodes], in_seq: &[NumNodes]) -> Self
    where
        R: Rng;
}

impl<G> RandomGraph for G
where
    G: GraphFromScratch,
{
    fn gnm<R>(rng: &mut R, n: NumNodes, m: NumEdges) -> Self
    where
        R: Rng,
    {
        Self::from_edges(n, Gnm::new().nodes(n).edges(m).stream(rng))
    }

    fn degree_sequence<R>(rng: &mut R, out_seq: &[NumNodes], in_seq: &[NumNodes]) -> Self
    where
        R: Rng,
    {
        Self::from_edges(
            out_seq.len() as NumNodes,
            DegreeSequence::new(out_seq, in_seq).stream(rng),
        )
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    #[test]
    fn gnm_has_requested_size_and_no_loops() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);

        for (n, m) in [(10 as NumNodes, 20 as NumEdges), (20, 60), (50, 1000)] {
            for _ in 0..20 {
                let g = DiGraph::gnm(rng, n, m);
                assert_eq!(g.number_of_nodes(), n);
                assert_eq!(g.number_of_edges(), m);
                assert!(!g.has_self_loops());

                // sampling is without replacement
                let mut edges = g.edges().collect_vec();
                edges.sort_unstable();
                edges.dedup();
                assert_eq!(edges.len(), m as usize);
            }
        }
    }

    #[test]
    fn gnm_with_zero_edges() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);
        let g = DiGraph::gnm(rng, 10, 0);
        assert_eq!(g.number_of_edges(), 0);
    }

    #[test]
    fn degree_sequence_is_preserved() {
        let rng = &mut Pcg64Mcg::seed_from_u64(7);
        let template = DiGraph::gnm(rng, 30, 120);

        let out_seq = template.vertices().map(|u| template.out_degree_of(u)).collect_vec();
        let in_seq = template.vertices().map(|u| template.in_degree_of(u)).collect_vec();

        for _ in 0..20 {
            let g = DiGraph::degree_sequence(rng, &out_seq, &in_seq);
            assert_eq!(g.number_of_nodes(), 30);
            assert_eq!(g.number_of_edges(), 120);
            for u in g.vertices() {
                assert_eq!(g.out_degree_of(u), out_seq[u as usize]);
                assert_eq!(g.in_degree_of(u), in_seq[u as usize]);
            }
        }
    }
}
