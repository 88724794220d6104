//! Equitable partition refinement
//!
//! A partition is equitable if any two vertices in the same cell have the
//! same number of neighbours in every cell. The [Refiner] splits cells
//! until this holds, using a queue of splitter cells. All decisions only
//! depend on cell positions and neighbour counts, never on vertex
//! numbers. Refining `π(P)` on `π(G)` therefore gives `π` applied to the
//! refinement of `P` on `G`. The returned trace code has the same
//! property and serves as a node invariant in the search tree.
use std::collections::VecDeque;

use crate::bitset::{self, Block};
use crate::dense::DenseGraph;
use crate::partition::Partition;

const CODE_SEED: u64 = 0x243f_6a88_85a3_08d3;

#[inline(always)]
pub(crate) fn mix(acc: u64, x: u64) -> u64 {
    let h = (acc ^ x).wrapping_mul(0x9e37_79b9_7f4a_7c15);
    h ^ (h >> 29)
}

/// Refines ordered partitions of the vertices of a fixed graph
#[derive(Clone, Debug)]
pub struct Refiner<'a, B: Block> {
    graph: &'a DenseGraph<B>,
    // reversed arcs, only for directed graphs
    transpose: Option<DenseGraph<B>>,
    splitter: Vec<B>,
    queue: VecDeque<usize>,
    in_queue: Vec<bool>,
    keyed: Vec<(u64, usize)>,
}

impl<'a, B: Block> Refiner<'a, B> {
    pub fn new(graph: &'a DenseGraph<B>, directed: bool) -> Self {
        let transpose = if directed {
            Some(graph.transpose())
        } else {
            None
        };
        Self {
            graph,
            transpose,
            splitter: vec![B::ZERO; graph.m()],
            queue: VecDeque::new(),
            in_queue: vec![false; graph.n()],
            keyed: Vec::with_capacity(graph.n()),
        }
    }

    pub fn graph(&self) -> &DenseGraph<B> {
        self.graph
    }

    /// Refine using every cell as an initial splitter
    pub fn refine_all(&mut self, p: &mut Partition) -> u64 {
        let starts = Vec::from_iter(p.cell_starts());
        self.refine(p, &starts)
    }

    /// Refine `p` to an equitable partition
    ///
    /// `splitters` are the start positions of the cells to use as
    /// initial splitters. The partition has to be equitable with
    /// respect to all other cells. Returns the trace code of the
    /// refinement.
    pub fn refine(&mut self, p: &mut Partition, splitters: &[usize]) -> u64 {
        let n = p.len();
        debug_assert_eq!(n, self.graph.n());
        self.queue.clear();
        self.in_queue.fill(false);
        for &s in splitters {
            if !self.in_queue[s] {
                self.in_queue[s] = true;
                self.queue.push_back(s);
            }
        }

        let mut code = CODE_SEED;
        let mut ncells = p.cell_count();
        while let Some(w_start) = self.queue.pop_front() {
            if ncells == n {
                break;
            }
            self.in_queue[w_start] = false;
            let w_end = p.cell_end(w_start);
            bitset::clear(&mut self.splitter);
            for &v in &p.lab()[w_start..w_end] {
                bitset::insert(&mut self.splitter, v);
            }
            code = mix(code, w_start as u64);

            let mut start = 0;
            while start < n {
                let end = p.cell_end(start);
                if end - start > 1 {
                    if let Some(cell_code) = self.split_cell(p, start, end) {
                        code = mix(code, cell_code);
                        ncells = p.cell_count();
                    }
                }
                start = end;
            }
        }
        p.debug_check();
        mix(code, p.cell_count() as u64)
    }

    fn split_key(&self, v: usize) -> u64 {
        let out = bitset::intersection_count(self.graph.row(v), &self.splitter);
        match &self.transpose {
            None => out as u64,
            Some(t) => {
                let inc = bitset::intersection_count(t.row(v), &self.splitter);
                (out as u64) * (self.graph.n() as u64 + 1) + inc as u64
            }
        }
    }

    // split the cell `start..end` by the number of neighbours in the
    // current splitter
    fn split_cell(
        &mut self,
        p: &mut Partition,
        start: usize,
        end: usize,
    ) -> Option<u64> {
        self.keyed.clear();
        for &v in &p.lab()[start..end] {
            let key = self.split_key(v);
            self.keyed.push((key, v));
        }
        let first = self.keyed[0].0;
        if self.keyed.iter().all(|(k, _)| *k == first) {
            return None;
        }
        // stable, so ties keep their relative order
        self.keyed.sort_by_key(|&(k, _)| k);
        let keyed = std::mem::take(&mut self.keyed);
        let code = self.split_sorted(p, start, &keyed);
        self.keyed = keyed;
        Some(code)
    }

    // rewrite the cell at `start` from vertices sorted by key and split it
    // at key changes
    fn split_sorted(
        &mut self,
        p: &mut Partition,
        start: usize,
        keyed: &[(u64, usize)],
    ) -> u64 {
        let end = start + keyed.len();
        for (dst, &(_, v)) in p.lab_mut()[start..end].iter_mut().zip(keyed) {
            *dst = v;
        }
        let mut code = mix(start as u64, keyed.len() as u64);
        let mut fragments = Vec::new();
        let mut frag_start = start;
        for i in 1..=keyed.len() {
            if i == keyed.len() || keyed[i].0 != keyed[i - 1].0 {
                let frag_end = start + i;
                p.set_cell_end(frag_start, frag_end);
                code = mix(code, keyed[i - 1].0);
                code = mix(code, (frag_end - frag_start) as u64);
                fragments.push((frag_start, frag_end - frag_start));
                frag_start = frag_end;
            }
        }

        if self.in_queue[start] {
            for &(s, _) in &fragments[1..] {
                self.enqueue(s);
            }
        } else {
            // the largest fragment is implied by the others
            let largest = fragments
                .iter()
                .enumerate()
                .fold(0, |best, (i, f)| {
                    if f.1 > fragments[best].1 {
                        i
                    } else {
                        best
                    }
                });
            for (i, &(s, _)) in fragments.iter().enumerate() {
                if i != largest {
                    self.enqueue(s);
                }
            }
        }
        code
    }

    fn enqueue(&mut self, s: usize) {
        if !self.in_queue[s] {
            self.in_queue[s] = true;
            self.queue.push_back(s);
        }
    }

    /// Split cells by the number of arcs among each vertex's
    /// out-neighbours, then refine again
    ///
    /// This distinguishes vertices of regular graphs that equitable
    /// refinement alone cannot separate. Returns `None` if no cell was
    /// split.
    pub fn apply_vertex_invariant(&mut self, p: &mut Partition) -> Option<u64> {
        let n = p.len();
        let mut split = false;
        let mut code = CODE_SEED;
        let mut start = 0;
        while start < n {
            let end = p.cell_end(start);
            if end - start > 1 {
                let mut keyed = Vec::from_iter(
                    p.lab()[start..end]
                        .iter()
                        .map(|&v| (self.arcs_among_neighbours(v), v)),
                );
                let first = keyed[0].0;
                if keyed.iter().any(|(k, _)| *k != first) {
                    keyed.sort_by_key(|&(k, _)| k);
                    self.in_queue.fill(false);
                    code = mix(code, self.split_sorted(p, start, &keyed));
                    split = true;
                }
            }
            start = end;
        }
        if !split {
            return None;
        }
        Some(mix(code, self.refine_all(p)))
    }

    fn arcs_among_neighbours(&self, v: usize) -> u64 {
        let row = self.graph.row(v);
        self.graph
            .neighbors(v)
            .filter(|&u| u != v)
            .map(|u| bitset::intersection_count(row, self.graph.row(u)) as u64)
            .sum()
    }
}

/// The equitable refinement of `p`
pub fn equitable_refinement<B: Block>(
    graph: &DenseGraph<B>,
    p: &Partition,
    directed: bool,
) -> Partition {
    let mut p = p.clone();
    Refiner::new(graph, directed).refine_all(&mut p);
    p
}

/// Whether every vertex in a cell has the same number of (out- and
/// in-) neighbours in every other cell
pub fn is_equitable<B: Block>(
    graph: &DenseGraph<B>,
    p: &Partition,
    directed: bool,
) -> bool {
    let transpose = graph.transpose();
    let cells = Vec::from_iter(p.cells());
    cells.iter().all(|c| {
        cells.iter().all(|d| {
            let counts = |g: &DenseGraph<B>, v: usize| {
                d.iter().filter(|&&w| g.adjacent(v, w)).count()
            };
            let out = counts(graph, c[0]);
            let inc = counts(&transpose, c[0]);
            c.iter().all(|&v| {
                counts(graph, v) == out
                    && (!directed || counts(&transpose, v) == inc)
            })
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perm::Permutation;
    use rand::prelude::*;
    use rand_xoshiro::Xoshiro256Plus;

    fn log_init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn random_graph(
        rng: &mut impl Rng,
        n: usize,
        p: f64,
        directed: bool,
    ) -> DenseGraph<u64> {
        let mut g = DenseGraph::new(n);
        for u in 0..n {
            let start = if directed { 0 } else { u + 1 };
            for v in start..n {
                if u != v && rng.gen_bool(p) {
                    if directed {
                        g.add_arc(u, v).unwrap();
                    } else {
                        g.add_edge(u, v).unwrap();
                    }
                }
            }
        }
        g
    }

    fn cells(p: &Partition) -> Vec<Vec<usize>> {
        p.cells()
            .map(|c| {
                let mut c = c.to_vec();
                c.sort();
                c
            })
            .collect()
    }

    #[test]
    fn path() {
        log_init();

        let g = DenseGraph::<u8>::from_edges(4, [(0, 1), (1, 2), (2, 3)])
            .unwrap();
        let p = equitable_refinement(&g, &Partition::unit(4), false);
        assert_eq!(cells(&p), [vec![0, 3], vec![1, 2]]);
    }

    #[test]
    fn star() {
        log_init();

        let g = DenseGraph::<u8>::from_edges(5, (1..5).map(|i| (0, i)))
            .unwrap();
        let p = equitable_refinement(&g, &Partition::unit(5), false);
        // leaves have fewer neighbours, so they come first
        assert_eq!(cells(&p), [vec![1, 2, 3, 4], vec![0]]);
    }

    #[test]
    fn ties_keep_their_order() {
        log_init();

        let g = DenseGraph::<u8>::from_edges(5, (1..5).map(|i| (0, i)))
            .unwrap();
        let p = equitable_refinement(&g, &Partition::unit(5), false);
        assert_eq!(p.lab(), [1, 2, 3, 4, 0]);

        let start = Partition::from_cells(5, &[[4, 2, 0, 3, 1]]).unwrap();
        let p = equitable_refinement(&g, &start, false);
        assert_eq!(p.lab(), [4, 2, 3, 1, 0]);

        let start = Partition::from_cells(5, &[vec![3, 0, 1], vec![4, 2]]).unwrap();
        let p = equitable_refinement(&g, &start, false);
        assert_eq!(p.lab(), [3, 1, 0, 4, 2]);
    }

    #[test]
    fn regular_stays_unit() {
        log_init();

        let cycle = DenseGraph::<u16>::from_edges(6, (0..6).map(|i| (i, (i + 1) % 6)))
            .unwrap();
        let mut p = Partition::unit(6);
        Refiner::new(&cycle, false).refine_all(&mut p);
        assert_eq!(p.cell_count(), 1);
    }

    #[test]
    fn individualized() {
        log_init();

        let cycle = DenseGraph::<u16>::from_edges(6, (0..6).map(|i| (i, (i + 1) % 6)))
            .unwrap();
        let mut refiner = Refiner::new(&cycle, false);
        let mut p = Partition::unit(6);
        refiner.refine_all(&mut p);
        let pos = p.individualize(0);
        refiner.refine(&mut p, &[pos]);
        assert_eq!(
            cells(&p),
            [vec![0], vec![3], vec![2, 4], vec![1, 5]]
        );
        assert!(is_equitable(&cycle, &p, false));
    }

    #[test]
    fn directed_in_counts() {
        log_init();

        // 0 -> 1 -> 2: all three vertices are distinguishable
        let g = DenseGraph::<u8>::from_arcs(3, [(0, 1), (1, 2)]).unwrap();
        let p = equitable_refinement(&g, &Partition::unit(3), true);
        assert!(p.is_discrete());
        assert!(is_equitable(&g, &p, true));
    }

    #[test]
    fn vertex_invariant() {
        log_init();

        // a triangle next to a hexagon is 2-regular
        let mut g = DenseGraph::<u8>::from_edges(
            9,
            [(0, 1), (1, 2), (2, 0)],
        )
        .unwrap();
        for i in 0..6 {
            g.add_edge(3 + i, 3 + (i + 1) % 6).unwrap();
        }
        let mut refiner = Refiner::new(&g, false);
        let mut p = Partition::unit(9);
        refiner.refine_all(&mut p);
        assert_eq!(p.cell_count(), 1);
        assert!(refiner.apply_vertex_invariant(&mut p).is_some());
        assert_eq!(cells(&p), [vec![3, 4, 5, 6, 7, 8], vec![0, 1, 2]]);
        assert!(refiner.apply_vertex_invariant(&mut p).is_none());
    }

    #[test]
    fn random_equitable_and_equivariant() {
        log_init();

        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        for n in 1..30 {
            for directed in [false, true] {
                let g = random_graph(&mut rng, n, 0.3, directed);
                let mut p = Partition::unit(n);
                let code = Refiner::new(&g, directed).refine_all(&mut p);
                assert!(is_equitable(&g, &p, directed));

                // relabel and refine again
                let mut images = Vec::from_iter(0..n);
                images.shuffle(&mut rng);
                let lab = Permutation::from_images(images).unwrap();
                let h = g.relabel(&lab);
                let mut q = Partition::unit(n);
                let other_code = Refiner::new(&h, directed).refine_all(&mut q);
                assert_eq!(code, other_code);
                let pos = crate::perm::inv_perm(lab.images());
                let mapped = Vec::from_iter(p.cells().map(|c| {
                    let mut c = Vec::from_iter(c.iter().map(|&v| pos[v]));
                    c.sort();
                    c
                }));
                assert_eq!(mapped, cells(&q));
            }
        }
    }

    #[test]
    fn deterministic() {
        let mut rng = Xoshiro256Plus::seed_from_u64(1);
        let g = random_graph(&mut rng, 25, 0.2, false);
        let p1 = equitable_refinement(&g, &Partition::unit(25), false);
        let p2 = equitable_refinement(&g, &Partition::unit(25), false);
        assert_eq!(p1, p2);
    }
}
