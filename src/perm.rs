use std::fmt::{self, Display};
use std::ops::Index;

/// A permutation of `0..n`
///
/// Automorphisms map each vertex `v` to its image `self[v]`. Labellings
/// map each canonical position `i` to the original vertex `self[i]`.
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Permutation(Vec<usize>);

impl Permutation {
    pub fn identity(n: usize) -> Self {
        Self(Vec::from_iter(0..n))
    }

    /// Wrap `images` if it is a permutation of `0..images.len()`
    pub fn from_images(images: Vec<usize>) -> Option<Self> {
        let mut seen = vec![false; images.len()];
        for &i in &images {
            if i >= images.len() || std::mem::replace(&mut seen[i], true) {
                return None;
            }
        }
        Some(Self(images))
    }

    pub(crate) fn from_images_unchecked(images: Vec<usize>) -> Self {
        debug_assert!(Self::from_images(images.clone()).is_some());
        Self(images)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_identity(&self) -> bool {
        self.0.iter().enumerate().all(|(i, &j)| i == j)
    }

    pub fn images(&self) -> &[usize] {
        &self.0
    }

    pub fn into_images(self) -> Vec<usize> {
        self.0
    }

    pub fn apply(&self, v: usize) -> usize {
        self.0[v]
    }

    pub fn inverse(&self) -> Self {
        Self(inv_perm(&self.0))
    }

    /// The permutation `v -> self[other[v]]`
    pub fn compose(&self, other: &Self) -> Self {
        debug_assert_eq!(self.len(), other.len());
        Self(other.0.iter().map(|&v| self.0[v]).collect())
    }

    /// The permutation mapping `from[i]` to `to[i]` for all `i`
    ///
    /// Two labellings with identical relabelled graphs are related by
    /// an automorphism of this form.
    pub fn between(from: &Self, to: &Self) -> Self {
        debug_assert_eq!(from.len(), to.len());
        let mut images = vec![0; from.len()];
        for (&f, &t) in from.0.iter().zip(&to.0) {
            images[f] = t;
        }
        Self(images)
    }

    /// Whether all of `points` are mapped to themselves
    pub fn fixes(&self, points: &[usize]) -> bool {
        points.iter().all(|&p| self.0[p] == p)
    }

    /// Disjoint cycles of length at least two, each starting with its
    /// smallest element
    pub fn cycles(&self) -> Vec<Vec<usize>> {
        let mut seen = vec![false; self.len()];
        let mut cycles = Vec::new();
        for start in 0..self.len() {
            if seen[start] || self.0[start] == start {
                continue;
            }
            let mut cycle = vec![start];
            seen[start] = true;
            let mut next = self.0[start];
            while next != start {
                seen[next] = true;
                cycle.push(next);
                next = self.0[next];
            }
            cycles.push(cycle);
        }
        cycles
    }
}

impl Index<usize> for Permutation {
    type Output = usize;

    fn index(&self, index: usize) -> &usize {
        &self.0[index]
    }
}

impl AsRef<[usize]> for Permutation {
    fn as_ref(&self) -> &[usize] {
        &self.0
    }
}

// cycle notation without fixed points, e.g. (0 3)(1 2)
impl Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cycles = self.cycles();
        if cycles.is_empty() {
            return write!(f, "()");
        }
        for cycle in cycles {
            write!(f, "(")?;
            for (n, v) in cycle.iter().enumerate() {
                if n > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{v}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

pub(crate) fn inv_perm(perm: &[usize]) -> Vec<usize> {
    let mut relabel = vec![0; perm.len()];
    for (new, &old) in perm.iter().enumerate() {
        relabel[old] = new;
    }
    relabel
}

/// Move `slice[i]` to position `new_pos[i]`, in place
pub(crate) fn apply_perm<T>(slice: &mut [T], mut new_pos: Vec<usize>) {
    const CORRECT_POS: usize = usize::MAX;
    for idx in 0..slice.len() {
        let mut next_idx = new_pos[idx];
        if next_idx == CORRECT_POS {
            continue;
        }
        while next_idx != idx {
            slice.swap(idx, next_idx);
            next_idx = std::mem::replace(&mut new_pos[next_idx], CORRECT_POS);
        }
    }
}
