/*!
# Node Representation

Nodes are numbered `0` to `n - 1` and represented as plain `u32`. As most
real-world networks do not exceed `2^32` nodes, this saves space compared to
`u64`/`usize` while keeping indexing casts cheap.
*/

use stream_bitset::bitset::BitSetImpl;

/// A node of a graph, 0-indexed.
pub type Node = u32;

/// There can be at most `2^32 - 1` nodes in a graph.
pub type NumNodes = Node;

/// Sentinel for "no node". Used by matchings and parent arrays instead of
/// carrying `Option<Node>` through tight loops.
pub const INVALID_NODE: Node = Node::MAX;

/// BitSet for nodes.
pub type NodeBitSet = BitSetImpl<Node>;
