use crate::error::CanonError;
use crate::partition::Partition;

/// Block widths accepted for [Options::word_size]
pub const SUPPORTED_WORD_SIZES: [usize; 5] = [8, 16, 32, 64, 128];

/// Options for canonical labelling
///
/// # Example
///
/// ```rust
/// use canon_pet::Options;
///
/// let options = Options::default()
///     .directed(true)
///     .vertex_colors(vec![vec![0, 2], vec![1]])
///     .word_size(32);
/// assert!(options.is_directed());
/// ```
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Options {
    /// Treat the adjacency rows as arcs instead of undirected edges
    pub directed: bool,
    /// Ordered colour classes
    ///
    /// Automorphisms have to map each class onto itself and the
    /// canonical labelling lists the classes in the given order.
    pub vertex_colors: Option<Vec<Vec<usize>>>,
    /// Search depth up to which the extra vertex invariant is applied
    ///
    /// The invariant costs O(n²) per search node, but splits cells of
    /// regular graphs that refinement alone leaves intact. 0 disables it.
    pub invariant_depth: usize,
    /// Block width used during the search
    ///
    /// `None` keeps the block type of the input graph. Only affects
    /// performance.
    pub word_size: Option<usize>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            directed: false,
            vertex_colors: None,
            invariant_depth: 1,
            word_size: None,
        }
    }
}

impl Options {
    pub fn directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    pub fn vertex_colors(mut self, colors: Vec<Vec<usize>>) -> Self {
        self.vertex_colors = Some(colors);
        self
    }

    pub fn invariant_depth(mut self, depth: usize) -> Self {
        self.invariant_depth = depth;
        self
    }

    pub fn word_size(mut self, bits: usize) -> Self {
        self.word_size = Some(bits);
        self
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Check the options against a graph with `n` vertices
    pub fn validate(&self, n: usize) -> Result<(), CanonError> {
        if let Some(bits) = self.word_size {
            if !SUPPORTED_WORD_SIZES.contains(&bits) {
                return Err(CanonError::InvalidOptions(format!(
                    "unsupported word size {bits}, expected one of {SUPPORTED_WORD_SIZES:?}"
                )));
            }
        }
        self.initial_partition(n).map(|_| ())
    }

    /// The partition the search starts from
    pub(crate) fn initial_partition(
        &self,
        n: usize,
    ) -> Result<Partition, CanonError> {
        match &self.vertex_colors {
            Some(colors) => Partition::from_cells(n, colors),
            None => Ok(Partition::unit(n)),
        }
    }
}
