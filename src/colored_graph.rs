//! Conversion between petgraph graphs and vertex-coloured dense graphs
//!
//! Node weights become ordered colour classes. Self-loops are folded
//! into the node weights and parallel edges are merged into a single
//! edge whose weight is the sorted list of individual weights. The most
//! common edge weight is left implicit. Every edge with another weight
//! is subdivided by an auxiliary vertex, coloured by the weight.
use std::cmp::Ordering;
use std::hash::Hash;
use std::marker::PhantomData;

use ahash::RandomState;
use itertools::izip;
use petgraph::{
    graph::{Graph, IndexType},
    visit::EdgeRef,
    EdgeType,
};

use crate::dense::DenseGraph;
use crate::perm::{apply_perm, inv_perm};

#[cfg(feature = "stable")]
type HashMap<K, V> = indexmap::IndexMap<K, V, RandomState>;
#[cfg(feature = "stable")]
fn sort<T: Ord>(slice: &mut [T]) {
    slice.sort()
}
#[cfg(feature = "stable")]
fn sort_by<T, F>(slice: &mut [T], cmp: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    slice.sort_by(cmp)
}
#[cfg(feature = "stable")]
fn sort_by_key<T, K, F>(slice: &mut [T], f: F)
where
    F: FnMut(&T) -> K,
    K: Ord,
{
    slice.sort_by_key(f)
}

#[cfg(not(feature = "stable"))]
type HashMap<K, V> = ahash::AHashMap<K, V, RandomState>;
#[cfg(not(feature = "stable"))]
fn sort<T: Ord>(slice: &mut [T]) {
    slice.sort_unstable()
}
#[cfg(not(feature = "stable"))]
fn sort_by<T, F>(slice: &mut [T], cmp: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    slice.sort_unstable_by(cmp)
}
#[cfg(not(feature = "stable"))]
fn sort_by_key<T, K, F>(slice: &mut [T], f: F)
where
    F: FnMut(&T) -> K,
    K: Ord,
{
    slice.sort_unstable_by_key(f)
}

/// A petgraph graph prepared for canonical labelling
#[derive(Debug, Clone)]
pub(crate) struct ColoredGraph<N, E, D> {
    pub(crate) graph: DenseGraph,
    /// Ordered colour classes, first those of the original nodes, then
    /// those of the auxiliary vertices
    pub(crate) colors: Vec<Vec<usize>>,
    /// Node weights, sorted, with self-loop weights attached
    weights: Vec<N>,
    edges: HashMap<(usize, usize), Vec<E>>,
    dir: PhantomData<D>,
}

impl<N, E, D> ColoredGraph<N, E, D> {
    /// Number of original (non-auxiliary) vertices
    pub(crate) fn node_count(&self) -> usize {
        self.weights.len()
    }
}

// sort the node weights and return the new position of each node
fn relabel_to_contiguous_node_weights<N: Ord>(nodes: &mut [N]) -> Vec<usize> {
    let mut new_ord = Vec::from_iter(0..nodes.len());
    sort_by(&mut new_ord, |&i, &j| nodes[i].cmp(&nodes[j]));
    let renumber = inv_perm(&new_ord);
    apply_perm(nodes, renumber.clone());
    for n in nodes.windows(2) {
        debug_assert!(n[0] <= n[1]);
    }
    renumber
}

// split sorted weights into runs of equal elements
fn color_classes<N: Eq>(weights: &[N]) -> Vec<Vec<usize>> {
    let mut classes: Vec<Vec<usize>> = Vec::new();
    for (i, w) in weights.iter().enumerate() {
        match classes.last_mut() {
            Some(class) if weights[class[0]] == *w => class.push(i),
            _ => classes.push(vec![i]),
        }
    }
    classes
}

impl<N, E, Ty, Ix> From<Graph<N, E, Ty, Ix>> for ColoredGraph<(N, Vec<E>), E, Ty>
where
    Ty: EdgeType,
    Ix: IndexType,
    N: Ord,
    E: Hash + Ord,
{
    fn from(g: Graph<N, E, Ty, Ix>) -> Self {
        use petgraph::visit::NodeIndexable;
        let is_directed = g.is_directed();
        let edges = Vec::from_iter(
            g.edge_references()
                .map(|e| (g.to_index(e.source()), g.to_index(e.target()))),
        );
        let (nodes, e) = g.into_nodes_edges();
        let mut node_weights =
            Vec::from_iter(nodes.into_iter().map(|n| (n.weight, Vec::new())));

        let mut edge_weights: HashMap<_, Vec<E>> = HashMap::default();
        for (mut edge, wt) in izip!(edges, e.into_iter().map(|e| e.weight)) {
            if edge.0 == edge.1 {
                node_weights[edge.0].1.push(wt);
            } else {
                if !is_directed && edge.0 > edge.1 {
                    std::mem::swap(&mut edge.0, &mut edge.1)
                }
                edge_weights.entry(edge).or_default().push(wt);
            }
        }
        for v in &mut node_weights {
            sort(&mut v.1);
        }
        for v in edge_weights.values_mut() {
            sort(v);
        }
        let relabel = relabel_to_contiguous_node_weights(&mut node_weights);
        let edge_weights: HashMap<_, _> = edge_weights
            .into_iter()
            .map(|(e, wt)| {
                let mut e = (relabel[e.0], relabel[e.1]);
                if !is_directed && e.0 > e.1 {
                    std::mem::swap(&mut e.0, &mut e.1)
                }
                (e, wt)
            })
            .collect();

        // the most frequent edge weight is implicit, every other one
        // gets its own auxiliary vertex colour
        let mut edge_weight_counts: HashMap<&[E], u32> = HashMap::default();
        for v in edge_weights.values() {
            *edge_weight_counts.entry(v).or_default() += 1;
        }
        let mut edge_weight_counts = Vec::from_iter(edge_weight_counts);
        sort(&mut edge_weight_counts);
        let max_pos = edge_weight_counts
            .iter()
            .enumerate()
            .max_by_key(|(_n, (_k, v))| v)
            .map(|(n, _)| n);
        if let Some(max_pos) = max_pos {
            edge_weight_counts.remove(max_pos);
        }
        let aux_vertex_type: HashMap<_, _> = edge_weight_counts
            .into_iter()
            .enumerate()
            .map(|(n, (k, _))| (k, n))
            .collect();

        let mut num_aux = vec![0; aux_vertex_type.len()];
        for w in edge_weights.values() {
            if let Some(&aux_type) = aux_vertex_type.get(w.as_slice()) {
                num_aux[aux_type] += 1;
            }
        }
        let num_nodes = node_weights.len();
        let total_num_aux: usize = num_aux.iter().sum();

        let mut colors = color_classes(&node_weights);
        let mut aux_vx_idx = Vec::with_capacity(num_aux.len());
        let mut next_idx = num_nodes;
        for &count in &num_aux {
            aux_vx_idx.push(next_idx);
            colors.push(Vec::from_iter(next_idx..next_idx + count));
            next_idx += count;
        }

        let mut graph = DenseGraph::new(num_nodes + total_num_aux);
        let mut connect = |source: usize, target: usize| {
            // all indices are below the vertex count by construction
            let res = if is_directed {
                graph.add_arc(source, target)
            } else {
                graph.add_edge(source, target)
            };
            debug_assert!(res.is_ok());
        };
        for (&(source, target), wt) in &edge_weights {
            debug_assert_ne!(source, target);
            match aux_vertex_type.get(wt.as_slice()) {
                Some(&aux_type) => {
                    let aux = aux_vx_idx[aux_type];
                    connect(source, aux);
                    connect(aux, target);
                    aux_vx_idx[aux_type] += 1;
                }
                None => connect(source, target),
            }
        }

        Self {
            graph,
            colors,
            weights: node_weights,
            edges: edge_weights,
            dir: PhantomData,
        }
    }
}

impl<N, E, D> ColoredGraph<(N, Vec<E>), E, D> {
    /// Rebuild a petgraph graph, placing node `lab[i]` at position `i`
    ///
    /// `lab` has to list all original nodes before any auxiliary vertex.
    pub(crate) fn into_graph<Ty, Ix>(self, lab: &[usize]) -> Graph<N, E, Ty, Ix>
    where
        Ty: EdgeType,
        Ix: IndexType,
        E: Ord,
    {
        into_graph(self.weights, self.edges, lab)
    }
}

fn into_graph<N, E, Ty, Ix>(
    node_weights: Vec<(N, Vec<E>)>,
    edge_weights: HashMap<(usize, usize), Vec<E>>,
    lab: &[usize],
) -> Graph<N, E, Ty, Ix>
where
    Ty: EdgeType,
    Ix: IndexType,
    E: Ord,
{
    use petgraph::visit::NodeIndexable;

    let num_edges = edge_weights.values().map(Vec::len).sum::<usize>()
        + node_weights.iter().map(|(_, l)| l.len()).sum::<usize>();
    let mut res = Graph::with_capacity(node_weights.len(), num_edges);
    let relabel = inv_perm(lab);
    let mut edges = Vec::with_capacity(num_edges);
    let is_directed = Ty::is_directed();

    // nodes + self-loops
    let mut node_weights =
        Vec::from_iter(izip!(relabel.iter().copied(), node_weights));
    sort_by_key(&mut node_weights, |e| e.0);
    for (n, i) in node_weights.iter().map(|(i, _w)| i).enumerate() {
        debug_assert_eq!(n, *i)
    }
    for (_, (w, loops)) in node_weights {
        for w in loops {
            edges.push((res.node_count(), res.node_count(), w))
        }
        res.add_node(w);
    }

    // edges
    for ((source, target), weights) in edge_weights {
        let mut source = relabel[source];
        let mut target = relabel[target];
        if !is_directed && source > target {
            std::mem::swap(&mut source, &mut target);
        }
        for w in weights {
            edges.push((source, target, w));
        }
    }
    sort(&mut edges);
    for (source, target, weight) in edges {
        let source = res.from_index(source);
        let target = res.from_index(target);
        res.add_edge(source, target, weight);
    }

    res
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fmt::Debug;

    use log::debug;
    use petgraph::{
        algo::isomorphism::is_isomorphic,
        graph::{DiGraph, Graph, IndexType, UnGraph},
        Directed, EdgeType, Undirected,
    };
    use testing::GraphIter;

    fn log_init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn tst_conv<N, E, Ty, Ix>(g: Graph<N, E, Ty, Ix>)
    where
        N: Clone + Debug + Ord,
        E: Clone + Debug + Ord + Hash,
        Ty: Debug + EdgeType,
        Ix: IndexType,
    {
        debug!("Initial graph: {g:#?}");
        let c = ColoredGraph::from(g.clone());
        debug!("Coloured graph: {c:#?}");
        let covered: usize = c.colors.iter().map(Vec::len).sum();
        assert_eq!(covered, c.graph.n());
        assert!(c.graph.is_symmetric() || Ty::is_directed());
        let lab = Vec::from_iter(0..c.graph.n());
        let gg: Graph<N, E, Ty, Ix> = c.into_graph(&lab);
        debug!("Final graph: {gg:#?}");
        assert!(is_isomorphic(&g, &gg));
    }

    #[test]
    fn simple_conversion() {
        log_init();

        tst_conv(Graph::<(), (), _>::new_undirected());
        tst_conv(UnGraph::<(), ()>::from_edges([(0, 1), (2, 0)]));
        tst_conv(UnGraph::<(), i32>::from_edges([(0, 1, -1), (2, 0, 1)]));
        tst_conv(DiGraph::<(), ()>::from_edges([
            (0, 1),
            (1, 1),
            (0, 2),
            (2, 0),
        ]));
        tst_conv(DiGraph::<(), u32>::from_edges([
            (0, 1, 0),
            (1, 1, 0),
            (0, 2, 0),
            (2, 0, 1),
        ]));
    }

    #[test]
    fn colors() {
        log_init();

        use petgraph::visit::NodeIndexable;
        let mut g = UnGraph::<u8, u8>::from_edges([
            (0, 1, 0),
            (1, 2, 0),
            (2, 3, 0),
            (3, 0, 7),
        ]);
        *g.node_weight_mut(g.from_index(2)).unwrap() = 1;
        let c = ColoredGraph::from(g);
        assert_eq!(c.node_count(), 4);
        // three nodes of weight 0, one of weight 1, one auxiliary vertex
        assert_eq!(c.colors, [vec![0, 1, 2], vec![3], vec![4]]);
        assert_eq!(c.graph.degree(4), 2);
        assert_eq!(c.graph.arc_count(), 2 * 5);
    }

    #[test]
    fn random_conversion_undirected() {
        log_init();
        for g in GraphIter::<Undirected>::default().take(1000) {
            tst_conv(g);
        }
    }

    #[test]
    fn random_conversion_directed() {
        log_init();
        for g in GraphIter::<Directed>::default().take(700) {
            tst_conv(g);
        }
    }

    #[test]
    fn asym_conversion() {
        log_init();

        let g = UnGraph::<(), ()>::from_edges([(0, 1), (1, 0)]);
        tst_conv(g);
    }
}
