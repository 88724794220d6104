pub use crate::autom::TryIntoAutomStats;
pub use crate::canon::{canonicalize, IntoCanon, TryIntoCanon, TryIntoCanonWith};
pub use crate::cmp::IsIdentical;
pub use crate::dense::DenseGraph;
pub use crate::graph::{CanonDiGraph, CanonGraph, CanonUnGraph};
pub use crate::options::Options;
