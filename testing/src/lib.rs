use std::marker::PhantomData;

use petgraph::{
    algo::connected_components,
    graph::{Graph, IndexType},
    visit::EdgeRef,
    EdgeType,
};
use rand::{
    distributions::Uniform,
    prelude::*
};
use rand_distr::Normal;
use rand_xoshiro::Xoshiro256Plus;

/// Random connected graphs with loops and small node and edge weights
pub struct GraphIter<Ty: EdgeType> {
    rng: Xoshiro256Plus,
    node_distr: Uniform<usize>,
    node_wt_distr: Uniform<u8>,
    pub edge_wt_distr: Uniform<u8>,
    edge_distr: Normal<f64>,
    edge_type: PhantomData<Ty>,
}

impl<Ty: EdgeType> Default for GraphIter<Ty> {
    fn default() -> Self {
        Self {
            rng: Xoshiro256Plus::seed_from_u64(0),
            node_distr: Uniform::from(1..10),
            node_wt_distr: Uniform::from(0..3),
            edge_wt_distr: Uniform::from(0..3),
            edge_distr: Normal::new(0.5, 1.0).unwrap(),
            edge_type: PhantomData
        }
    }
}

impl<Ty: EdgeType> Iterator for GraphIter<Ty> {
    type Item = Graph<u8, u8, Ty>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut rng = &mut self.rng;
        let mut g = Graph::default();
        let nnodes = self.node_distr.sample(&mut rng);
        for _ in 0..nnodes {
            g.add_node(self.node_wt_distr.sample(&mut rng));
        }
        for i in 0..nnodes {
            let start = if Ty::is_directed() { 0 } else { i };
            for j in start..nnodes {
                let nedges = self.edge_distr.sample(&mut rng)
                    .clamp(0.0, 1.0)
                    .round() as u64;
                for _ in 0..nedges {
                    use petgraph::visit::NodeIndexable;
                    let source = g.from_index(i);
                    let target = g.from_index(j);
                    g.add_edge(source, target, self.edge_wt_distr.sample(&mut rng));
                }
            }
        }
        if connected_components(&g) > 1 {
            return self.next()
        }
        Some(g)
    }
}

/// Shuffle the node indices and the edge order of a graph
pub fn randomize_labels<N, E, Ty, Ix>(
    g: Graph<N, E, Ty, Ix>,
    rng: &mut impl Rng,
) -> Graph<N, E, Ty, Ix>
where
    Ty: EdgeType,
    Ix: IndexType,
{
    use petgraph::visit::NodeIndexable;

    let mut new_pos = Vec::from_iter(0..g.node_count());
    new_pos.shuffle(rng);
    let edges = Vec::from_iter(
        g.edge_references()
            .map(|e| (new_pos[e.source().index()], new_pos[e.target().index()])),
    );
    let (nodes, raw_edges) = g.into_nodes_edges();
    let mut nodes = Vec::from_iter(
        new_pos.iter().copied().zip(nodes.into_iter().map(|n| n.weight)),
    );
    nodes.sort_unstable_by_key(|(pos, _)| *pos);

    let mut res = Graph::with_capacity(nodes.len(), edges.len());
    for (_, w) in nodes {
        res.add_node(w);
    }
    let mut edges = Vec::from_iter(
        edges.into_iter().zip(raw_edges.into_iter().map(|e| e.weight)),
    );
    edges.shuffle(rng);
    for ((mut source, mut target), w) in edges {
        if !Ty::is_directed() && rng.gen() {
            std::mem::swap(&mut source, &mut target);
        }
        let source = res.from_index(source);
        let target = res.from_index(target);
        res.add_edge(source, target, w);
    }
    res
}
