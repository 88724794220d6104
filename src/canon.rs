use std::fmt::Debug;
use std::hash::Hash;

use log::debug;
use petgraph::{
    graph::{Graph, IndexType},
    EdgeType,
};

use crate::autom::AutomStats;
use crate::autom_group::Automorphisms;
use crate::bitset::Block;
use crate::colored_graph::ColoredGraph;
use crate::dense::DenseGraph;
use crate::error::CanonError;
use crate::options::Options;
use crate::perm::Permutation;
use crate::search::{Search, SearchResult, SearchStats};

/// Canonical labelling of a graph together with its automorphism group
#[derive(Clone, Debug, PartialEq)]
pub struct Canon<B: Block = usize> {
    labeling: Permutation,
    canonical_graph: DenseGraph<B>,
    generators: Vec<Permutation>,
    orbits: Vec<Vec<usize>>,
    stats: AutomStats,
    search_stats: SearchStats,
}

impl<B: Block> Canon<B> {
    /// Canonical position -> vertex of the input graph
    pub fn labeling(&self) -> &Permutation {
        &self.labeling
    }

    /// The input graph relabelled by [labeling](Self::labeling)
    ///
    /// Isomorphic inputs (with the same colours) give identical
    /// canonical graphs.
    pub fn canonical_graph(&self) -> &DenseGraph<B> {
        &self.canonical_graph
    }

    pub fn into_canonical_graph(self) -> DenseGraph<B> {
        self.canonical_graph
    }

    /// Generators of the automorphism group
    pub fn generators(&self) -> &[Permutation] {
        &self.generators
    }

    /// Orbits of the automorphism group, each sorted, ordered by their
    /// smallest vertex
    pub fn orbits(&self) -> &[Vec<usize>] {
        &self.orbits
    }

    /// Smallest vertex in the orbit of `v`
    pub fn orbit_of(&self, v: usize) -> Option<usize> {
        self.orbits
            .iter()
            .find(|orbit| orbit.binary_search(&v).is_ok())
            .map(|orbit| orbit[0])
    }

    pub fn stats(&self) -> AutomStats {
        self.stats
    }

    pub fn search_stats(&self) -> &SearchStats {
        &self.search_stats
    }

    /// The order of the automorphism group
    pub fn grpsize(&self) -> f64 {
        self.stats.grpsize()
    }

    /// Change the block type of the canonical graph
    pub fn into_word_size<C: Block>(self) -> Canon<C> {
        Canon {
            canonical_graph: self.canonical_graph.to_word_size(),
            labeling: self.labeling,
            generators: self.generators,
            orbits: self.orbits,
            stats: self.stats,
            search_stats: self.search_stats,
        }
    }
}

impl<B: Block> From<SearchResult<B>> for Canon<B> {
    fn from(res: SearchResult<B>) -> Self {
        let SearchResult {
            best,
            automorphisms,
            stats: search_stats,
        } = res;
        let stats = AutomStats::from(&automorphisms);
        let orbits = automorphisms.orbits();
        Self {
            labeling: best.labeling,
            canonical_graph: best.certificate,
            generators: automorphisms.into_generators(),
            orbits,
            stats,
            search_stats,
        }
    }
}

impl From<&Automorphisms> for AutomStats {
    fn from(a: &Automorphisms) -> Self {
        let (grpsize_base, grpsize_exp) = a.group_order_parts();
        Self {
            grpsize_base,
            grpsize_exp,
            num_orbits: a.num_orbits(),
            num_generators: a.generators().len(),
        }
    }
}

/// Find the canonical labelling and the automorphism group of a graph
///
/// # Example
///
/// ```rust
/// use canon_pet::{canonicalize, DenseGraph, Options};
///
/// // two labellings of the path with three vertices
/// let g1 = DenseGraph::<u8>::from_edges(3, [(0, 1), (1, 2)]).unwrap();
/// let g2 = DenseGraph::<u8>::from_edges(3, [(0, 1), (0, 2)]).unwrap();
///
/// let c1 = canonicalize(&g1, &Options::default()).unwrap();
/// let c2 = canonicalize(&g2, &Options::default()).unwrap();
/// assert_eq!(c1.canonical_graph(), c2.canonical_graph());
/// assert_eq!(c1.grpsize(), 2.);
/// assert_eq!(c1.orbits(), [vec![0, 2], vec![1]]);
/// ```
pub fn canonicalize<B: Block>(
    graph: &DenseGraph<B>,
    options: &Options,
) -> Result<Canon<B>, CanonError> {
    options.validate(graph.n())?;
    if !options.directed {
        if let Some((u, v)) = graph.first_asymmetry() {
            return Err(CanonError::InvalidGraph(format!(
                "arc {u} -> {v} has no reverse arc in an undirected graph"
            )));
        }
    }
    debug!(
        "Canonical labelling of graph with {} vertices and {} arcs, word size {:?}",
        graph.n(),
        graph.arc_count(),
        options.word_size
    );
    let canon = match options.word_size {
        None => search(graph, options)?,
        Some(8) => search(&graph.to_word_size::<u8>(), options)?.into_word_size(),
        Some(16) => search(&graph.to_word_size::<u16>(), options)?.into_word_size(),
        Some(32) => search(&graph.to_word_size::<u32>(), options)?.into_word_size(),
        Some(64) => search(&graph.to_word_size::<u64>(), options)?.into_word_size(),
        Some(128) => {
            search(&graph.to_word_size::<u128>(), options)?.into_word_size()
        }
        Some(bits) => {
            return Err(CanonError::InvalidOptions(format!(
                "unsupported word size {bits}"
            )))
        }
    };
    debug!(
        "Automorphism group of order {}, {} orbits, {} generators",
        canon.grpsize(),
        canon.orbits().len(),
        canon.generators().len()
    );
    Ok(canon)
}

fn search<B: Block>(
    graph: &DenseGraph<B>,
    options: &Options,
) -> Result<Canon<B>, CanonError> {
    Ok(Search::new(graph, options)?.run().into())
}

/// Find the canonical labelling for a graph
pub trait IntoCanon {
    fn into_canon(self) -> Self;
}

/// Try to find the canonical labelling for a graph
pub trait TryIntoCanon {
    type Error;

    fn try_into_canon(self) -> Result<Self, Self::Error>
    where
        Self: Sized;
}

/// Try to find the canonical labelling for a graph with custom options
///
/// Directedness and vertex colours follow from the graph itself, so
/// `options.directed` is ignored and `options.vertex_colors` has to be
/// `None`.
pub trait TryIntoCanonWith {
    type Error;

    fn try_into_canon_with(self, options: &Options) -> Result<Self, Self::Error>
    where
        Self: Sized;
}

impl<N, E, Ty: EdgeType, Ix: IndexType> IntoCanon for Graph<N, E, Ty, Ix>
where
    Graph<N, E, Ty, Ix>: TryIntoCanon,
    <Graph<N, E, Ty, Ix> as TryIntoCanon>::Error: Debug,
{
    fn into_canon(self) -> Self {
        self.try_into_canon().unwrap()
    }
}

impl<N, E, Ty: EdgeType, Ix: IndexType> TryIntoCanon for Graph<N, E, Ty, Ix>
where
    N: Ord,
    E: Hash + Ord,
{
    type Error = CanonError;

    fn try_into_canon(self) -> Result<Self, Self::Error> {
        self.try_into_canon_with(&Options::default())
    }
}

impl<N, E, Ty, Ix> TryIntoCanonWith for Graph<N, E, Ty, Ix>
where
    N: Ord,
    E: Hash + Ord,
    Ty: EdgeType,
    Ix: IndexType,
{
    type Error = CanonError;

    fn try_into_canon_with(self, options: &Options) -> Result<Self, Self::Error> {
        if options.vertex_colors.is_some() {
            return Err(CanonError::InvalidOptions(
                "vertex colours of petgraph graphs are given by the node weights"
                    .to_owned(),
            ));
        }
        if self.node_count() == 0 {
            return Ok(self);
        }
        let g = ColoredGraph::from(self);
        let options = options
            .clone()
            .directed(Ty::is_directed())
            .vertex_colors(g.colors.clone());
        let canon = canonicalize(&g.graph, &options)?;
        Ok(g.into_graph(canon.labeling().images()))
    }
}
