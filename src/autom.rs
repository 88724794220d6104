use std::hash::Hash;

use crate::canon::canonicalize;
use crate::colored_graph::ColoredGraph;
use crate::error::CanonError;
use crate::options::Options;

use petgraph::{
    graph::{Graph, IndexType},
    EdgeType,
};

/// Information on automorphism group of a graph
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug)]
pub struct AutomStats {
    /// The size of the automorphism group is approximately `grpsize_base` * 10.pow(`grpsize_exp`)
    pub grpsize_base: f64,
    /// The size of the automorphism group is approximately `grpsize_base` * 10.pow(`grpsize_exp`)
    pub grpsize_exp: u32,
    /// Number of orbits of the automorphism group
    pub num_orbits: usize,
    /// Number of generators
    pub num_generators: usize,
}

impl Default for AutomStats {
    fn default() -> Self {
        Self {
            grpsize_base: 1.,
            grpsize_exp: 0,
            num_orbits: 0,
            num_generators: 0,
        }
    }
}

impl AutomStats {
    /// The size of the automorphism group
    pub fn grpsize(&self) -> f64 {
        self.grpsize_base * 10f64.powi(self.grpsize_exp as i32)
    }
}

/// Statistics for a graph's automorphism group
pub trait TryIntoAutomStats {
    type Error;

    fn try_into_autom_stats(self) -> Result<AutomStats, Self::Error>;
}

impl<N, E, Ty, Ix> TryIntoAutomStats for Graph<N, E, Ty, Ix>
where
    N: Ord,
    E: Hash + Ord,
    Ty: EdgeType,
    Ix: IndexType,
{
    type Error = CanonError;

    fn try_into_autom_stats(self) -> Result<AutomStats, Self::Error> {
        let g = ColoredGraph::from(self);
        let options = Options::default()
            .directed(Ty::is_directed())
            .vertex_colors(g.colors.clone());
        let canon = canonicalize(&g.graph, &options)?;
        // orbits of auxiliary vertices stand for edges
        let num_nodes = g.node_count();
        let num_orbits = canon
            .orbits()
            .iter()
            .filter(|orbit| orbit[0] < num_nodes)
            .count();
        Ok(AutomStats {
            num_orbits,
            ..canon.stats()
        })
    }
}
