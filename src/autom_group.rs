//! Accumulation of automorphisms found during the search
use log::{trace, warn};
use petgraph::unionfind::UnionFind;

use crate::bitset::Block;
use crate::dense::DenseGraph;
use crate::perm::Permutation;

/// Generators, orbits, and order of a (partially discovered)
/// automorphism group
#[derive(Clone, Debug)]
pub struct Automorphisms {
    n: usize,
    generators: Vec<Permutation>,
    orbits: UnionFind<usize>,
    grpsize_base: f64,
    grpsize_exp: u32,
}

impl Automorphisms {
    /// The trivial group on `n` points
    pub fn new(n: usize) -> Self {
        Self {
            n,
            generators: Vec::new(),
            orbits: UnionFind::new(n),
            grpsize_base: 1.,
            grpsize_exp: 0,
        }
    }

    /// Add an automorphism of `graph` to the generators
    ///
    /// Returns `false` without changing anything if `perm` is the
    /// identity, already a generator, or not an automorphism.
    pub fn register<B: Block>(
        &mut self,
        graph: &DenseGraph<B>,
        perm: Permutation,
    ) -> bool {
        if perm.len() != self.n || perm.is_identity() {
            return false;
        }
        if !graph.is_automorphism(&perm) {
            warn!("Rejecting non-automorphism {perm}");
            return false;
        }
        if self.generators.contains(&perm) {
            return false;
        }
        trace!("New generator {perm}");
        for v in 0..self.n {
            self.orbits.union(v, perm[v]);
        }
        self.generators.push(perm);
        true
    }

    /// Generators in the order they were registered
    pub fn generators(&self) -> &[Permutation] {
        &self.generators
    }

    pub fn into_generators(self) -> Vec<Permutation> {
        self.generators
    }

    /// Smallest vertex in the orbit of `v`
    pub fn orbit_of(&self, v: usize) -> usize {
        (0..=v)
            .find(|&w| self.orbits.equiv(v, w))
            .unwrap_or(v)
    }

    /// All orbits, sorted by their smallest vertex
    pub fn orbits(&self) -> Vec<Vec<usize>> {
        orbits_from_labels(&self.orbits.clone().into_labeling())
    }

    pub fn num_orbits(&self) -> usize {
        let labels = self.orbits.clone().into_labeling();
        labels.iter().enumerate().filter(|(v, &l)| *v == l).count()
    }

    /// Orbits of the subgroup generated by those generators fixing each
    /// of `fixed`
    ///
    /// The result maps every vertex to a representative of its orbit.
    pub fn stabilizer_orbits(&self, fixed: &[usize]) -> Vec<usize> {
        let mut orbits = UnionFind::new(self.n);
        for g in self.generators.iter().filter(|g| g.fixes(fixed)) {
            for v in 0..self.n {
                orbits.union(v, g[v]);
            }
        }
        orbits.into_labeling()
    }

    /// Multiply the group order by `factor`
    pub fn multiply_group_order(&mut self, factor: usize) {
        self.grpsize_base *= factor as f64;
        while self.grpsize_base >= 1e10 {
            self.grpsize_base /= 1e10;
            self.grpsize_exp += 10;
        }
    }

    /// The group order as `(base, exp)`, meaning `base * 10^exp`
    pub fn group_order_parts(&self) -> (f64, u32) {
        (self.grpsize_base, self.grpsize_exp)
    }

    /// A lower bound on the order of the automorphism group
    ///
    /// After a completed search this is the exact order (up to floating
    /// point accuracy).
    pub fn group_order_lower_bound(&self) -> f64 {
        self.grpsize_base * 10f64.powi(self.grpsize_exp as i32)
    }
}

pub(crate) fn orbits_from_labels(labels: &[usize]) -> Vec<Vec<usize>> {
    let mut index = vec![usize::MAX; labels.len()];
    let mut orbits: Vec<Vec<usize>> = Vec::new();
    for (v, &l) in labels.iter().enumerate() {
        if index[l] == usize::MAX {
            index[l] = orbits.len();
            orbits.push(Vec::new());
        }
        orbits[index[l]].push(v);
    }
    orbits
}
