//! Selection of the canonical leaf
//!
//! Every leaf of the search tree is a discrete partition, i.e. a
//! labelling. Its key is the sequence of node invariants along its path
//! followed by the graph relabelled accordingly (the certificate). The
//! canonical labelling is the leaf with the smallest key. Leaves with
//! equal keys are related by an automorphism.
use std::cmp::Ordering;

use crate::bitset::Block;
use crate::dense::DenseGraph;
use crate::perm::Permutation;

/// A leaf of the search tree
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Leaf<B: Block> {
    /// Canonical position -> vertex
    pub labeling: Permutation,
    /// Node invariants from the root down to the leaf
    pub codes: Vec<u64>,
    /// Individualised vertices from the root down to the leaf
    pub path: Vec<usize>,
    /// The graph relabelled by `labeling`
    pub certificate: DenseGraph<B>,
}

impl<B: Block> Leaf<B> {
    /// Compare keys, smaller is better
    pub fn cmp_key(&self, other: &Self) -> Ordering {
        self.codes
            .cmp(&other.codes)
            .then_with(|| self.certificate.rows().cmp(other.certificate.rows()))
    }

    /// Length of the common prefix of the two paths, i.e. the depth of
    /// the deepest common ancestor
    pub fn common_depth(&self, path: &[usize]) -> usize {
        self.path
            .iter()
            .zip(path)
            .take_while(|(a, b)| a == b)
            .count()
    }
}

/// What a new leaf means for the search
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The very first leaf
    First,
    /// Strictly better than the previous best leaf
    NewBest,
    /// Same key as the first leaf; the automorphism maps the first
    /// leaf's labelling onto the new one
    EquivalentToFirst(Permutation),
    /// Same key as the best leaf
    EquivalentToBest(Permutation),
    Worse,
}

/// Keeps the first leaf and the best leaf seen so far
#[derive(Clone, Debug)]
pub struct LeafSelector<B: Block> {
    first: Option<Leaf<B>>,
    best: Option<Leaf<B>>,
}

impl<B: Block> Default for LeafSelector<B> {
    fn default() -> Self {
        Self {
            first: None,
            best: None,
        }
    }
}

impl<B: Block> LeafSelector<B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first(&self) -> Option<&Leaf<B>> {
        self.first.as_ref()
    }

    pub fn best(&self) -> Option<&Leaf<B>> {
        self.best.as_ref()
    }

    pub fn into_best(self) -> Option<Leaf<B>> {
        self.best
    }

    /// Compare a new leaf to the stored ones
    ///
    /// The best leaf is only replaced if the new one is strictly
    /// better, so the first of several equivalent leaves is kept.
    pub fn offer(&mut self, leaf: Leaf<B>) -> Verdict {
        let Some(first) = &self.first else {
            self.first = Some(leaf.clone());
            self.best = Some(leaf);
            return Verdict::First;
        };
        if leaf.cmp_key(first) == Ordering::Equal {
            return Verdict::EquivalentToFirst(Permutation::between(
                &first.labeling,
                &leaf.labeling,
            ));
        }
        let Some(best) = &self.best else {
            unreachable!("best leaf is set together with first leaf")
        };
        match leaf.cmp_key(best) {
            Ordering::Less => {
                self.best = Some(leaf);
                Verdict::NewBest
            }
            Ordering::Equal => Verdict::EquivalentToBest(Permutation::between(
                &best.labeling,
                &leaf.labeling,
            )),
            Ordering::Greater => Verdict::Worse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(
        g: &DenseGraph<u8>,
        lab: &[usize],
        codes: &[u64],
    ) -> Leaf<u8> {
        let labeling = Permutation::from_images(lab.to_vec()).unwrap();
        Leaf {
            certificate: g.relabel(&labeling),
            labeling,
            codes: codes.to_vec(),
            path: lab.to_vec(),
        }
    }

    #[test]
    fn selection() {
        // path 0 - 1 - 2
        let g = DenseGraph::from_edges(3, [(0, 1), (1, 2)]).unwrap();
        let mut sel = LeafSelector::new();

        assert_eq!(sel.offer(leaf(&g, &[1, 0, 2], &[5])), Verdict::First);

        // reversal of the first
        let v = sel.offer(leaf(&g, &[1, 2, 0], &[5]));
        assert_eq!(
            v,
            Verdict::EquivalentToFirst(
                Permutation::from_images(vec![2, 1, 0]).unwrap()
            )
        );

        // 0 - 2 - 1 has a smaller certificate than 1 - 0 - 2
        assert_eq!(sel.offer(leaf(&g, &[0, 2, 1], &[5])), Verdict::NewBest);

        // larger codes always lose
        assert_eq!(sel.offer(leaf(&g, &[0, 1, 2], &[6])), Verdict::Worse);

        // smaller codes always win
        assert_eq!(sel.offer(leaf(&g, &[0, 1, 2], &[4])), Verdict::NewBest);
        assert!(matches!(
            sel.offer(leaf(&g, &[2, 1, 0], &[4])),
            Verdict::EquivalentToBest(_)
        ));
        assert_eq!(sel.best().unwrap().labeling.images(), [0, 1, 2]);
    }

    #[test]
    fn ties_keep_first() {
        let g = DenseGraph::<u8>::new(2);
        let mut sel = LeafSelector::new();
        sel.offer(leaf(&g, &[0, 1], &[1]));
        sel.offer(leaf(&g, &[1, 0], &[0]));
        assert!(matches!(
            sel.offer(leaf(&g, &[0, 1], &[0])),
            Verdict::EquivalentToBest(_)
        ));
        assert_eq!(sel.best().unwrap().labeling.images(), [1, 0]);
    }

    #[test]
    fn common_depth() {
        let g = DenseGraph::<u8>::new(3);
        let l = leaf(&g, &[0, 1, 2], &[]);
        assert_eq!(l.common_depth(&[0, 1, 2]), 3);
        assert_eq!(l.common_depth(&[0, 2]), 1);
        assert_eq!(l.common_depth(&[1]), 0);
    }
}
