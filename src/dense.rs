//! Dense graphs as rows of adjacency bitsets
use crate::bitset::{self, words_needed, Block};
use crate::error::CanonError;
use crate::perm::Permutation;

/// A graph on the vertices `0..n`, stored as `n` adjacency bitsets
///
/// Bit `j` of row `i` is set iff there is an arc from `i` to `j`. An
/// undirected edge is a pair of opposite arcs. The block type `B` only
/// affects memory layout and speed, never the results of canonical
/// labelling.
///
/// # Example
///
/// ```rust
/// use canon_pet::dense::DenseGraph;
///
/// let g = DenseGraph::<u64>::from_edges(3, [(0, 1), (1, 2)]).unwrap();
/// assert!(g.adjacent(1, 0));
/// assert!(!g.adjacent(0, 2));
/// assert_eq!(g.degree(1), 2);
/// ```
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DenseGraph<B: Block = usize> {
    n: usize,
    m: usize,
    rows: Vec<B>,
}

impl<B: Block> DenseGraph<B> {
    /// Graph with `n` vertices and no edges
    pub fn new(n: usize) -> Self {
        let m = words_needed(n, B::BITS);
        Self {
            n,
            m,
            rows: vec![B::ZERO; n * m],
        }
    }

    /// Undirected graph from a list of edges
    pub fn from_edges<I>(n: usize, edges: I) -> Result<Self, CanonError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut g = Self::new(n);
        for (u, v) in edges {
            g.add_edge(u, v)?;
        }
        Ok(g)
    }

    /// Directed graph from a list of arcs
    pub fn from_arcs<I>(n: usize, arcs: I) -> Result<Self, CanonError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut g = Self::new(n);
        for (u, v) in arcs {
            g.add_arc(u, v)?;
        }
        Ok(g)
    }

    fn check_vertex(&self, v: usize) -> Result<(), CanonError> {
        if v < self.n {
            Ok(())
        } else {
            Err(CanonError::InvalidVertexIndex {
                vertex: v,
                n: self.n,
            })
        }
    }

    /// Add the arc `u -> v`
    pub fn add_arc(&mut self, u: usize, v: usize) -> Result<(), CanonError> {
        self.check_vertex(u)?;
        self.check_vertex(v)?;
        let m = self.m;
        bitset::insert(&mut self.rows[u * m..(u + 1) * m], v);
        Ok(())
    }

    /// Add the undirected edge `u -- v`
    pub fn add_edge(&mut self, u: usize, v: usize) -> Result<(), CanonError> {
        self.add_arc(u, v)?;
        self.add_arc(v, u)
    }

    /// Number of vertices
    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of blocks per row
    pub fn m(&self) -> usize {
        self.m
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Adjacency bitset of `v`
    #[inline(always)]
    pub fn row(&self, v: usize) -> &[B] {
        &self.rows[v * self.m..(v + 1) * self.m]
    }

    /// All rows, concatenated
    pub fn rows(&self) -> &[B] {
        &self.rows
    }

    #[inline(always)]
    pub fn adjacent(&self, u: usize, v: usize) -> bool {
        bitset::contains(self.row(u), v)
    }

    /// Number of arcs leaving `v`, including a possible self-loop
    pub fn degree(&self, v: usize) -> usize {
        bitset::count(self.row(v))
    }

    /// Out-neighbours of `v` in ascending order
    pub fn neighbors(&self, v: usize) -> bitset::Ones<'_, B> {
        bitset::iter_ones(self.row(v))
    }

    /// All arcs `(u, v)`, ordered by source and then target
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.n).flat_map(move |u| self.neighbors(u).map(move |v| (u, v)))
    }

    /// Total number of arcs
    pub fn arc_count(&self) -> usize {
        bitset::count(&self.rows)
    }

    /// Whether every arc has its reverse, i.e. the graph is undirected
    pub fn is_symmetric(&self) -> bool {
        self.edges().all(|(u, v)| self.adjacent(v, u))
    }

    /// The first arc without a reverse
    pub(crate) fn first_asymmetry(&self) -> Option<(usize, usize)> {
        self.edges().find(|&(u, v)| !self.adjacent(v, u))
    }

    /// The graph with all arcs reversed
    pub fn transpose(&self) -> Self {
        let mut res = Self::new(self.n);
        let m = self.m;
        for (u, v) in self.edges() {
            bitset::insert(&mut res.rows[v * m..(v + 1) * m], u);
        }
        res
    }

    /// Relabel according to `lab`: vertex `i` of the result is vertex
    /// `lab[i]` of `self`
    pub fn relabel(&self, lab: &Permutation) -> Self {
        debug_assert_eq!(lab.len(), self.n);
        let mut res = Self::new(self.n);
        self.relabel_into(lab.images(), &mut res.rows);
        res
    }

    /// Write the rows of the graph relabelled by `lab` into `out`
    pub(crate) fn relabel_into(&self, lab: &[usize], out: &mut [B]) {
        let m = self.m;
        debug_assert_eq!(out.len(), self.rows.len());
        let pos = crate::perm::inv_perm(lab);
        bitset::clear(out);
        for (i, &old) in lab.iter().enumerate() {
            let row = &mut out[i * m..(i + 1) * m];
            for w in self.neighbors(old) {
                bitset::insert(row, pos[w]);
            }
        }
    }

    /// Whether `perm` maps the arc set onto itself
    pub fn is_automorphism(&self, perm: &Permutation) -> bool {
        perm.len() == self.n
            && self.edges().all(|(u, v)| self.adjacent(perm[u], perm[v]))
    }

    /// The same graph with a different block type
    pub fn to_word_size<C: Block>(&self) -> DenseGraph<C> {
        let mut res = DenseGraph::<C>::new(self.n);
        let m = res.m;
        for (u, v) in self.edges() {
            bitset::insert(&mut res.rows[u * m..(u + 1) * m], v);
        }
        res
    }
}

/// Width in bits of the native machine word
///
/// This is the block width of the default [DenseGraph] and the natural
/// choice for callers building compatible bitsets themselves.
pub fn native_word_size() -> usize {
    <usize as Block>::BITS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(n: usize) -> DenseGraph<u8> {
        DenseGraph::from_edges(n, (1..n).map(|i| (i - 1, i))).unwrap()
    }

    #[test]
    fn construct() {
        let g = path(10);
        assert_eq!(g.n(), 10);
        assert_eq!(g.m(), 2);
        assert!(g.adjacent(8, 9));
        assert!(g.adjacent(9, 8));
        assert!(!g.adjacent(0, 9));
        assert_eq!(g.degree(0), 1);
        assert_eq!(g.degree(5), 2);
        assert_eq!(Vec::from_iter(g.neighbors(5)), [4, 6]);
        assert_eq!(g.arc_count(), 18);
        assert!(g.is_symmetric());
    }

    #[test]
    fn invalid_vertex() {
        let err = DenseGraph::<u64>::from_edges(3, [(0, 1), (1, 3)]);
        assert_eq!(
            err,
            Err(CanonError::InvalidVertexIndex { vertex: 3, n: 3 })
        );
    }

    #[test]
    fn directed() {
        let g = DenseGraph::<u32>::from_arcs(3, [(0, 1), (1, 2)]).unwrap();
        assert!(!g.is_symmetric());
        assert_eq!(g.first_asymmetry(), Some((0, 1)));
        let t = g.transpose();
        assert!(t.adjacent(1, 0));
        assert!(t.adjacent(2, 1));
        assert_eq!(t.arc_count(), 2);
    }

    #[test]
    fn relabel() {
        let g = path(4);
        let lab = Permutation::from_images(vec![1, 3, 0, 2]).unwrap();
        let h = g.relabel(&lab);
        let expected =
            DenseGraph::from_edges(4, [(0, 2), (0, 3), (1, 3)]).unwrap();
        assert_eq!(h, expected);
    }

    #[test]
    fn automorphism() {
        let g = path(4);
        let rev = Permutation::from_images(vec![3, 2, 1, 0]).unwrap();
        assert!(g.is_automorphism(&rev));
        let swap = Permutation::from_images(vec![1, 0, 2, 3]).unwrap();
        assert!(!g.is_automorphism(&swap));
    }

    #[test]
    fn word_size() {
        let g = path(70);
        let h: DenseGraph<u128> = g.to_word_size();
        assert_eq!(h.m(), 1);
        assert!(g.edges().eq(h.edges()));
        let back: DenseGraph<u8> = h.to_word_size();
        assert_eq!(g, back);
    }

    #[test]
    fn empty() {
        let g = DenseGraph::<usize>::new(0);
        assert!(g.is_empty());
        assert_eq!(g.m(), 0);
        assert!(g.is_symmetric());
        assert_eq!(g.relabel(&Permutation::identity(0)), g);
        assert_eq!(native_word_size(), usize::BITS as usize);
    }
}
