//! Ordered vertex partitions
use crate::error::CanonError;
use crate::perm::Permutation;

/// An ordered partition of `0..n` into non-empty cells
///
/// `lab` lists the vertices cell by cell. For each position `s` where a
/// cell starts, `cell_end[s]` is the (exclusive) position where it
/// ends. Other entries of `cell_end` are stale and never read.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Partition {
    lab: Vec<usize>,
    cell_end: Vec<usize>,
}

impl Partition {
    /// All vertices in a single cell
    pub fn unit(n: usize) -> Self {
        Self {
            lab: Vec::from_iter(0..n),
            cell_end: vec![n; n],
        }
    }

    /// Partition with the given cells, in the given order
    ///
    /// The cells must be non-empty and contain every vertex in `0..n`
    /// exactly once.
    pub fn from_cells<C: AsRef<[usize]>>(
        n: usize,
        cells: &[C],
    ) -> Result<Self, CanonError> {
        use CanonError::InvalidOptions;
        let mut seen = vec![false; n];
        let mut lab = Vec::with_capacity(n);
        let mut cell_end = vec![0; n];
        for (idx, cell) in cells.iter().enumerate() {
            let cell = cell.as_ref();
            if cell.is_empty() {
                return Err(InvalidOptions(format!("colour class {idx} is empty")));
            }
            let start = lab.len();
            for &v in cell {
                if v >= n {
                    return Err(InvalidOptions(format!(
                        "colour class {idx} contains vertex {v}, but the graph has only {n} vertices"
                    )));
                }
                if std::mem::replace(&mut seen[v], true) {
                    return Err(InvalidOptions(format!(
                        "vertex {v} appears in more than one colour class"
                    )));
                }
                lab.push(v);
            }
            cell_end[start] = lab.len();
        }
        if lab.len() != n {
            return Err(InvalidOptions(format!(
                "colour classes cover {} vertices, but the graph has {n}",
                lab.len()
            )));
        }
        Ok(Self { lab, cell_end })
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.lab.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lab.is_empty()
    }

    /// Vertices in partition order
    pub fn lab(&self) -> &[usize] {
        &self.lab
    }

    pub(crate) fn lab_mut(&mut self) -> &mut [usize] {
        &mut self.lab
    }

    /// End of the cell starting at position `start`
    #[inline(always)]
    pub fn cell_end(&self, start: usize) -> usize {
        self.cell_end[start]
    }

    pub(crate) fn set_cell_end(&mut self, start: usize, end: usize) {
        self.cell_end[start] = end;
    }

    /// Start positions of all cells, in order
    pub fn cell_starts(&self) -> CellStarts<'_> {
        CellStarts {
            partition: self,
            next: 0,
        }
    }

    /// The cells, in order
    pub fn cells(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.cell_starts()
            .map(move |s| &self.lab[s..self.cell_end[s]])
    }

    pub fn cell_count(&self) -> usize {
        self.cell_starts().count()
    }

    /// Whether all cells are singletons
    pub fn is_discrete(&self) -> bool {
        self.cell_starts().all(|s| self.cell_end[s] == s + 1)
    }

    /// Start and end of the first cell with more than one vertex
    pub fn first_nonsingleton(&self) -> Option<(usize, usize)> {
        self.cell_starts()
            .map(|s| (s, self.cell_end[s]))
            .find(|(s, e)| e - s > 1)
    }

    /// Split `v` off its cell, placing it as a singleton in front of the
    /// remaining vertices
    ///
    /// Returns the position of the new singleton cell. Panics if `v` is
    /// out of range.
    pub fn individualize(&mut self, v: usize) -> usize {
        let pos = self
            .lab
            .iter()
            .position(|&w| w == v)
            .expect("vertex in partition");
        let start = self
            .cell_starts()
            .take_while(|&s| s <= pos)
            .last()
            .expect("position inside a cell");
        let end = self.cell_end[start];
        debug_assert!(end - start > 1, "individualising a singleton cell");
        self.lab[start..=pos].rotate_right(1);
        self.cell_end[start] = start + 1;
        self.cell_end[start + 1] = end;
        start
    }

    /// The labelling defined by a discrete partition
    pub fn to_labeling(&self) -> Permutation {
        debug_assert!(self.is_discrete());
        Permutation::from_images_unchecked(self.lab.clone())
    }

    /// Check that the cells partition `0..n` (debug builds only)
    pub(crate) fn debug_check(&self) {
        if cfg!(debug_assertions) {
            let mut seen = vec![false; self.len()];
            for &v in &self.lab {
                assert!(!std::mem::replace(&mut seen[v], true));
            }
            let mut covered = 0;
            for s in self.cell_starts() {
                assert!(self.cell_end[s] > s);
                covered += self.cell_end[s] - s;
            }
            assert_eq!(covered, self.len());
        }
    }
}

pub struct CellStarts<'a> {
    partition: &'a Partition,
    next: usize,
}

impl<'a> Iterator for CellStarts<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.partition.len() {
            return None;
        }
        let start = self.next;
        self.next = self.partition.cell_end[start];
        Some(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit() {
        let p = Partition::unit(4);
        assert_eq!(p.cell_count(), 1);
        assert_eq!(Vec::from_iter(p.cells()), [[0, 1, 2, 3]]);
        assert_eq!(p.first_nonsingleton(), Some((0, 4)));
        assert!(!p.is_discrete());
        assert!(Partition::unit(1).is_discrete());
        assert!(Partition::unit(0).is_discrete());
        assert_eq!(Partition::unit(0).cell_count(), 0);
    }

    #[test]
    fn from_cells() {
        let p = Partition::from_cells(5, &[vec![3, 1], vec![0], vec![4, 2]])
            .unwrap();
        assert_eq!(p.lab(), [3, 1, 0, 4, 2]);
        assert_eq!(
            Vec::from_iter(p.cells()),
            [&[3, 1][..], &[0][..], &[4, 2][..]]
        );
        assert_eq!(p.first_nonsingleton(), Some((0, 2)));
    }

    #[test]
    fn invalid_cells() {
        assert!(matches!(
            Partition::from_cells(3, &[vec![0, 1]]),
            Err(CanonError::InvalidOptions(_))
        ));
        assert!(matches!(
            Partition::from_cells(3, &[vec![0, 1], vec![1, 2]]),
            Err(CanonError::InvalidOptions(_))
        ));
        assert!(matches!(
            Partition::from_cells(3, &[vec![0, 1, 2], vec![]]),
            Err(CanonError::InvalidOptions(_))
        ));
        assert!(matches!(
            Partition::from_cells(2, &[vec![0, 2]]),
            Err(CanonError::InvalidOptions(_))
        ));
    }

    #[test]
    fn individualize() {
        let mut p = Partition::from_cells(5, &[vec![0], vec![1, 2, 3, 4]])
            .unwrap();
        let pos = p.individualize(3);
        assert_eq!(pos, 1);
        assert_eq!(
            Vec::from_iter(p.cells()),
            [&[0][..], &[3][..], &[1, 2, 4][..]]
        );
        p.debug_check();
        p.individualize(4);
        p.individualize(2);
        assert!(p.is_discrete());
        assert_eq!(p.to_labeling().images(), [0, 3, 4, 2, 1]);
    }
}
