use rand::seq::SliceRandom;

use super::*;

/// Generator for the directed configuration model: realizes a prescribed
/// joint out-/in-degree sequence by expanding both sequences into stub
/// lists, shuffling the in-stubs and pairing them up.
///
/// Self-loops and parallel edges may occur, as in the classic model. Every
/// realization preserves the degree sequence exactly.
#[derive(Debug, Clone, Default)]
pub struct DegreeSequence {
    out_seq: Vec<NumNodes>,
    in_seq: Vec<NumNodes>,
}

impl DegreeSequence {
    /// Creates a generator for the given degree sequences.
    ///
    /// # Panics
    /// If the sequences differ in length or in their sums.
    pub fn new(out_seq: &[NumNodes], in_seq: &[NumNodes]) -> Self {
        assert_eq!(
            out_seq.len(),
            in_seq.len(),
            "degree sequences must cover the same vertices"
        );
        assert_eq!(
            out_seq.iter().map(|&d| d as u64).sum::<u64>(),
            in_seq.iter().map(|&d| d as u64).sum::<u64>(),
            "degree sequences must have equal sums"
        );

        Self {
            out_seq: out_seq.to_vec(),
            in_seq: in_seq.to_vec(),
        }
    }
}

/// Expands a degree sequence into a stub list: vertex `u` occurs
/// `seq[u]` times.
fn stubs(seq: &[NumNodes]) -> Vec<Node> {
    seq.iter()
        .enumerate()
        .flat_map(|(u, &d)| std::iter::repeat(u as Node).take(d as usize))
        .collect()
}

impl GraphGenerator for DegreeSequence {
    fn stream<'a, R>(&'a self, rng: &'a mut R) -> impl Iterator<Item = Edge> + 'a
    where
        R: Rng,
    {
        let out_stubs = stubs(&self.out_seq);
        let mut in_stubs = stubs(&self.in_seq);
        in_stubs.shuffle(rng);

        out_stubs
            .into_iter()
            .zip(in_stubs)
            .map(|(u, v)| Edge(u, v))
    }
}
