//! Individualisation-refinement search
//!
//! The search tree is traversed depth first with an explicit stack of
//! nodes. The node at index `d` is at depth `d`, its parent at `d - 1`.
//! Each node holds an equitable partition. The children of a node
//! individualise the vertices of its first non-singleton cell, the
//! leaves are discrete partitions.
//!
//! Three kinds of pruning keep the tree small:
//!
//! * Children in the same orbit as an explored sibling under the known
//!   automorphisms fixing the node's path are skipped.
//! * Nodes whose invariants differ from the first path and compare
//!   greater than the best path cannot lead to the canonical leaf or to
//!   new automorphisms.
//! * A leaf equivalent to the first or best leaf proves that the rest of
//!   the subtree below the common ancestor is an automorphic image of an
//!   explored one, so the search jumps back to that ancestor.
use std::cmp::Ordering;

use log::{debug, trace};

use crate::autom_group::Automorphisms;
use crate::bitset::Block;
use crate::certificate::{Leaf, LeafSelector, Verdict};
use crate::dense::DenseGraph;
use crate::error::CanonError;
use crate::options::Options;
use crate::partition::Partition;
use crate::refine::{mix, Refiner};

/// State of the search after a step
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SearchState {
    /// Descended to an internal node or returned from a subtree
    Exploring,
    /// Reached and processed a leaf
    Discrete,
    /// A child was discarded without descending into it
    Pruned,
    /// The whole tree has been traversed
    Done,
}

/// Counters collected during the search
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SearchStats {
    /// Search tree nodes, including the root and leaves
    pub nodes: usize,
    pub leaves: usize,
    /// Children skipped due to node invariants
    pub pruned_invariant: usize,
    /// Children skipped due to known automorphisms
    pub pruned_orbit: usize,
    /// Number of jumps back to a common ancestor
    pub backjumps: usize,
    pub max_depth: usize,
}

// what to do next at the node on top of the stack
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Next {
    Child(usize),
    // candidate in the orbit of an explored sibling
    Skipped,
    Exhausted,
}

#[derive(Clone, Debug)]
struct Node {
    partition: Partition,
    code: u64,
    // individualised to get here from the parent
    vertex: Option<usize>,
    // vertices of the target cell in ascending order, empty at leaves
    candidates: Vec<usize>,
    next: usize,
    explored: Vec<usize>,
    on_first_path: bool,
    // invariants agree with the first path down to here
    eq_first: bool,
    // comparison of invariants with the best path down to here
    cmp_best: Ordering,
    // number of generators and stabiliser orbits computed from them
    orbits: Option<(usize, Vec<usize>)>,
}

impl Node {
    fn new(partition: Partition, code: u64, vertex: Option<usize>) -> Self {
        let candidates = match partition.first_nonsingleton() {
            Some((start, end)) => {
                let mut c = partition.lab()[start..end].to_vec();
                c.sort_unstable();
                c
            }
            None => Vec::new(),
        };
        Self {
            partition,
            code,
            vertex,
            candidates,
            next: 0,
            explored: Vec::new(),
            on_first_path: true,
            eq_first: true,
            cmp_best: Ordering::Equal,
            orbits: None,
        }
    }

    fn is_leaf(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Outcome of a complete search
#[derive(Clone, Debug)]
pub(crate) struct SearchResult<B: Block> {
    pub(crate) best: Leaf<B>,
    pub(crate) automorphisms: Automorphisms,
    pub(crate) stats: SearchStats,
}

/// The search over the tree of refined partitions of one graph
///
/// Usually driven to completion by [canonicalize](crate::canonicalize),
/// but it can also be advanced one transition at a time with
/// [step](Search::step).
pub struct Search<'a, B: Block> {
    graph: &'a DenseGraph<B>,
    refiner: Refiner<'a, B>,
    invariant_depth: usize,
    stack: Vec<Node>,
    selector: LeafSelector<B>,
    automorphisms: Automorphisms,
    first_path: Vec<usize>,
    first_codes: Vec<u64>,
    best_codes: Vec<u64>,
    stats: SearchStats,
}

impl<'a, B: Block> Search<'a, B> {
    /// Set up the search and refine the root partition
    pub fn new(
        graph: &'a DenseGraph<B>,
        options: &Options,
    ) -> Result<Self, CanonError> {
        let mut partition = options.initial_partition(graph.n())?;
        let mut refiner = Refiner::new(graph, options.directed);
        let mut code = refiner.refine_all(&mut partition);
        if options.invariant_depth > 0 && !partition.is_discrete() {
            if let Some(c) = refiner.apply_vertex_invariant(&mut partition) {
                code = mix(code, c);
            }
        }
        let root = Node::new(partition, code, None);
        let mut search = Self {
            graph,
            refiner,
            invariant_depth: options.invariant_depth,
            stack: Vec::with_capacity(graph.n() + 1),
            selector: LeafSelector::new(),
            automorphisms: Automorphisms::new(graph.n()),
            first_path: Vec::new(),
            first_codes: Vec::new(),
            best_codes: Vec::new(),
            stats: SearchStats {
                nodes: 1,
                ..Default::default()
            },
        };
        let root_is_leaf = root.is_leaf();
        search.stack.push(root);
        if root_is_leaf {
            search.process_leaf();
        }
        Ok(search)
    }

    /// Traverse the whole tree
    pub(crate) fn run(mut self) -> SearchResult<B> {
        while self.step() != SearchState::Done {}
        debug!("Search finished: {:?}", self.stats);
        let Some(best) = self.selector.into_best() else {
            unreachable!("every search tree has at least one leaf")
        };
        SearchResult {
            best,
            automorphisms: self.automorphisms,
            stats: self.stats,
        }
    }

    /// Advance the search by one transition
    pub fn step(&mut self) -> SearchState {
        if self.stack.is_empty() {
            return SearchState::Done;
        }
        match self.next_candidate() {
            Next::Child(v) => self.descend(v),
            Next::Skipped => SearchState::Pruned,
            Next::Exhausted => {
                self.finish_node();
                if self.stack.is_empty() {
                    SearchState::Done
                } else {
                    SearchState::Exploring
                }
            }
        }
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    // vertices individualised along the current path
    fn path(&self) -> Vec<usize> {
        self.stack.iter().filter_map(|n| n.vertex).collect()
    }

    fn next_candidate(&mut self) -> Next {
        let fixed = self.path();
        let ngens = self.automorphisms.generators().len();
        let automorphisms = &self.automorphisms;
        let Some(node) = self.stack.last_mut() else {
            return Next::Exhausted;
        };
        let stale = !matches!(&node.orbits, Some((n, _)) if *n == ngens);
        if stale {
            node.orbits = Some((ngens, automorphisms.stabilizer_orbits(&fixed)));
        }
        let Some((_, orbits)) = &node.orbits else {
            unreachable!()
        };
        let Some(&v) = node.candidates.get(node.next) else {
            return Next::Exhausted;
        };
        node.next += 1;
        if node.explored.iter().any(|&w| orbits[w] == orbits[v]) {
            trace!("Skipping {v}, equivalent to an explored vertex");
            self.stats.pruned_orbit += 1;
            return Next::Skipped;
        }
        node.explored.push(v);
        Next::Child(v)
    }

    fn descend(&mut self, v: usize) -> SearchState {
        let depth = self.stack.len();
        let Some(parent) = self.stack.last() else {
            unreachable!()
        };
        let mut partition = parent.partition.clone();
        let pos = partition.individualize(v);
        let mut code = self.refiner.refine(&mut partition, &[pos]);
        if depth < self.invariant_depth && !partition.is_discrete() {
            if let Some(c) = self.refiner.apply_vertex_invariant(&mut partition) {
                code = mix(code, c);
            }
        }

        let mut child = Node::new(partition, code, Some(v));
        if self.selector.first().is_some() {
            child.on_first_path =
                parent.on_first_path && self.first_path.get(depth - 1) == Some(&v);
            child.eq_first =
                parent.eq_first && self.first_codes.get(depth) == Some(&code);
            child.cmp_best = match parent.cmp_best {
                Ordering::Equal => match self.best_codes.get(depth) {
                    Some(best) => code.cmp(best),
                    None => Ordering::Greater,
                },
                ord => ord,
            };
            if !child.eq_first && child.cmp_best == Ordering::Greater {
                self.stats.pruned_invariant += 1;
                return SearchState::Pruned;
            }
        }

        self.stats.nodes += 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);
        let is_leaf = child.is_leaf();
        self.stack.push(child);
        if is_leaf {
            self.process_leaf();
            SearchState::Discrete
        } else {
            SearchState::Exploring
        }
    }

    // handle the leaf on top of the stack and pop it
    fn process_leaf(&mut self) {
        self.stats.leaves += 1;
        let Some(node) = self.stack.last() else {
            unreachable!()
        };
        let labeling = node.partition.to_labeling();
        let leaf = Leaf {
            certificate: self.graph.relabel(&labeling),
            labeling,
            codes: self.stack.iter().map(|n| n.code).collect(),
            path: self.path(),
        };
        match self.selector.offer(leaf) {
            Verdict::First => {
                self.first_path = self.path();
                self.first_codes = self.stack.iter().map(|n| n.code).collect();
                self.best_codes = self.first_codes.clone();
                for node in &mut self.stack {
                    node.on_first_path = true;
                    node.eq_first = true;
                    node.cmp_best = Ordering::Equal;
                }
                self.stack.pop();
            }
            Verdict::NewBest => {
                trace!("New best leaf along {:?}", self.path());
                self.best_codes = self.stack.iter().map(|n| n.code).collect();
                for node in &mut self.stack {
                    node.cmp_best = Ordering::Equal;
                }
                self.stack.pop();
            }
            Verdict::EquivalentToFirst(perm) => {
                self.automorphisms.register(self.graph, perm);
                let Some(first) = self.selector.first() else {
                    unreachable!()
                };
                let depth = first.common_depth(&self.path());
                self.backjump(depth);
            }
            Verdict::EquivalentToBest(perm) => {
                self.automorphisms.register(self.graph, perm);
                let Some(best) = self.selector.best() else {
                    unreachable!()
                };
                let depth = best.common_depth(&self.path());
                self.backjump(depth);
            }
            Verdict::Worse => {
                self.stack.pop();
            }
        }
    }

    // abandon everything below the node at `depth`
    fn backjump(&mut self, depth: usize) {
        trace!(
            "Jumping back from depth {} to {depth}",
            self.stack.len() - 1
        );
        self.stats.backjumps += 1;
        self.stack.truncate(depth + 1);
    }

    // pop an exhausted node, accounting for the group order on the
    // first path
    fn finish_node(&mut self) {
        let Some(node) = self.stack.pop() else {
            return;
        };
        if !node.on_first_path {
            return;
        }
        let depth = self.stack.len();
        let next = self.first_path[depth];
        let orbits = self
            .automorphisms
            .stabilizer_orbits(&self.first_path[..depth]);
        let orbit_size = node
            .candidates
            .iter()
            .filter(|&&w| orbits[w] == orbits[next])
            .count();
        trace!("Orbit of size {orbit_size} at depth {depth}");
        self.automorphisms.multiply_group_order(orbit_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn search<B: Block>(g: &DenseGraph<B>, options: &Options) -> SearchResult<B> {
        Search::new(g, options).unwrap().run()
    }

    fn order(result: &SearchResult<impl Block>) -> f64 {
        result.automorphisms.group_order_lower_bound()
    }

    fn complete(n: usize) -> DenseGraph<u64> {
        let edges = (0..n).flat_map(|i| (i + 1..n).map(move |j| (i, j)));
        DenseGraph::from_edges(n, edges).unwrap()
    }

    #[test]
    fn states() {
        log_init();

        let g = complete(3);
        let mut search = Search::new(&g, &Options::default()).unwrap();
        let mut states = Vec::new();
        loop {
            let state = search.step();
            states.push(state);
            if state == SearchState::Done {
                break;
            }
        }
        assert!(states.contains(&SearchState::Discrete));
        assert_eq!(search.step(), SearchState::Done);
        assert!(search.stats().leaves >= 2);
    }

    #[test]
    fn orbit_pruning_is_reported() {
        log_init();

        let g = complete(4);
        let mut search = Search::new(&g, &Options::default()).unwrap();
        let mut pruned = 0;
        loop {
            match search.step() {
                SearchState::Done => break,
                SearchState::Pruned => pruned += 1,
                _ => {}
            }
        }
        let stats = *search.stats();
        assert!(stats.pruned_orbit > 0);
        // no node invariant distinguishes the vertices of K4
        assert_eq!(stats.pruned_invariant, 0);
        assert_eq!(pruned, stats.pruned_orbit);
    }

    #[test]
    fn complete_graphs() {
        log_init();

        let mut factorial = 1.;
        for n in 1..=8 {
            factorial *= n as f64;
            let res = search(&complete(n), &Options::default());
            assert_eq!(order(&res), factorial);
            assert_eq!(res.automorphisms.num_orbits(), 1);
            // pruning keeps the tree small
            assert!(res.stats.leaves <= n * n);
        }
    }

    #[test]
    fn empty_graphs() {
        log_init();

        let res = search(&DenseGraph::<u8>::new(0), &Options::default());
        assert_eq!(res.best.labeling.len(), 0);
        assert_eq!(order(&res), 1.);

        let res = search(&DenseGraph::<u8>::new(10), &Options::default());
        assert_eq!(order(&res), 3628800.);
    }

    #[test]
    fn rigid() {
        log_init();

        // asymmetric tree on 7 vertices
        let g = DenseGraph::<u32>::from_edges(
            7,
            [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (2, 6)],
        )
        .unwrap();
        let res = search(&g, &Options::default());
        assert_eq!(order(&res), 1.);
        assert!(res.automorphisms.generators().is_empty());
    }

    #[test]
    fn without_vertex_invariant() {
        log_init();

        // 3-cube
        let g = DenseGraph::<u8>::from_edges(
            8,
            (0..8usize).flat_map(|v| {
                [1, 2, 4].into_iter().filter_map(move |b| {
                    let w = v ^ b;
                    (v < w).then_some((v, w))
                })
            }),
        )
        .unwrap();
        for depth in [0, 1, 3] {
            let res = search(&g, &Options::default().invariant_depth(depth));
            assert_eq!(order(&res), 48.);
        }
    }
}
