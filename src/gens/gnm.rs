use fxhash::FxHashMap;

use super::*;

/// Generator for uniform `G(n,m)` random directed graphs with `n` nodes and
/// `m` edges, sampled without replacement from the loop-free edge space.
///
/// Configure via `.nodes(n)` and `.edges(m)`; the null-model driver uses it
/// to resample a network while preserving its vertex and edge counts.
#[derive(Debug, Copy, Clone, Default)]
pub struct Gnm {
    n: u64,
    m: Option<NumEdges>,
}

impl Gnm {
    /// Creates a new empty `G(n,m)` generator.
    pub fn new() -> Self {
        Self::default()
    }
}

impl NumNodesGen for Gnm {
    fn set_nodes(&mut self, n: NumNodes) {
        self.n = n as u64;
    }
}

impl NumEdgesGen for Gnm {
    fn set_edges(&mut self, m: NumEdges) {
        self.m = Some(m);
    }
}

impl GraphGenerator for Gnm {
    /// Returns a streaming iterator over a random `G(n,m)` edge set.
    ///
    /// # Panics
    /// - If `edges(m)` was not set
    /// - If `m` exceeds the number of available loop-free edges
    fn stream<'a, R>(&'a self, rng: &'a mut R) -> impl Iterator<Item = Edge> + 'a
    where
        R: Rng,
    {
        let m = self.m.expect("number of edges of Gnm was not set");
        let end = self.n * self.n.saturating_sub(1);
        assert!(m as u64 <= end || m == 0, "G(n,m) requested more edges than exist");

        GnmGenerator::new(rng, self.n, m as u64, end)
    }
}

/// Given `n` nodes and a total edge space of size `end`, this iterator
/// produces exactly `m` uniformly random and distinct edge ranks without
/// replacement.
///
/// The algorithm used is based on:
/// > *V. Batagelj and U. Brandes. Efficient Generation of Large Random
/// > Networks. Physical Review E 71.3 (2005): 036113.*
///
/// The implementation avoids full shuffling by using a partial mapping
/// (hash-based sampling) to simulate an in-place permutation.
pub struct GnmGenerator<'a, R>
where
    R: Rng,
{
    n: u64,
    rem: u64,
    cur: u64,
    end: u64,
    map: FxHashMap<u64, u64>,
    rng: &'a mut R,
}

impl<'a, R> GnmGenerator<'a, R>
where
    R: Rng,
{
    fn new(rng: &'a mut R, n: u64, m: u64, end: u64) -> Self {
        Self {
            n,
            rem: m,
            cur: 0,
            end,
            map: FxHashMap::with_capacity_and_hasher(m as usize, Default::default()),
            rng,
        }
    }

    /// Selects the next unique edge rank by emulating a Fisher-Yates
    /// shuffle on-the-fly with a sparse remapping table.
    fn next_step(&mut self) -> Option<u64> {
        if self.rem == 0 {
            return None;
        }

        // Draw a rank and resolve it through the remapping table
        let drawn = self.rng.random_range(self.cur..self.end);
        let rank = *self.map.get(&drawn).unwrap_or(&drawn);

        // Store the displaced front element for later draws
        let front = *self.map.get(&self.cur).unwrap_or(&self.cur);
        self.map.insert(drawn, front);

        self.cur += 1;
        self.rem -= 1;

        Some(rank)
    }
}

impl<'a, R> Iterator for GnmGenerator<'a, R>
where
    R: Rng,
{
    type Item = Edge;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_step()
            .map(|x| Edge::from_u64_no_loops(x, self.n))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.rem as usize, Some(self.rem as usize))
    }
}

impl<'a, R> ExactSizeIterator for GnmGenerator<'a, R> where R: Rng {}
