//! Canonical graph labelling.
//!
//! Finds [canonical
//! labellings](https://en.wikipedia.org/wiki/Graph_canonization) and
//! automorphism groups of graphs with an
//! individualisation-refinement search. Graphs are either dense
//! bitset adjacency matrices ([DenseGraph]) or
//! [petgraph](https://github.com/petgraph/petgraph) graphs with
//! arbitrary node and edge weights.
//!
//! # Example
//!
//! ```rust
//! use petgraph::graph::UnGraph;
//! use canon_pet::prelude::*;
//!
//! // Two different vertex labellings for the tree graph with two edges
//! let g1 = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2)]);
//! let g2 = UnGraph::<(), ()>::from_edges([(0, 1), (0, 2)]);
//!
//! // There are two equivalent labellings
//! let automorphism_info = g1.clone().try_into_autom_stats().unwrap();
//! assert_eq!(automorphism_info.grpsize(), 2.);
//!
//! // The canonical forms are identical
//! let c1 = g1.clone().into_canon();
//! let c2 = g2.clone().into_canon();
//! assert!(c1.is_identical(&c2));
//!
//! // Alternatively, we can use a dedicated `struct` for canonically
//! // labelled graphs
//! let c1 = CanonGraph::from(g1);
//! let c2 = CanonGraph::from(g2);
//! assert_eq!(c1, c2);
//! ```
//!
//! The search itself works on [DenseGraph]s and also reports the
//! labelling and the automorphism group:
//!
//! ```rust
//! use canon_pet::{canonicalize, DenseGraph, Options};
//!
//! // the 4-cycle
//! let g = DenseGraph::<u32>::from_edges(4, [(0, 1), (1, 2), (2, 3), (3, 0)])
//!     .unwrap();
//! let canon = canonicalize(&g, &Options::default()).unwrap();
//! assert_eq!(canon.grpsize(), 8.);
//! assert_eq!(canon.orbits().len(), 1);
//! for gen in canon.generators() {
//!     assert!(g.is_automorphism(gen));
//! }
//! assert_eq!(&g.relabel(canon.labeling()), canon.canonical_graph());
//! ```
//!
//! # Features
//!
//! * `serde-1`: Enables serialisation of
//!              [CanonGraph](graph::CanonGraph), [DenseGraph],
//!              [Permutation], [AutomStats](autom::AutomStats), and
//!              [Options] using [serde](https://crates.io/crates/serde).
//!
//! * `stable`: Ensures deterministic behaviour when node or edge
//!             weights are distinguishable, but compare equal.
//!
//! To enable features `feature1`, `feature2` add the following to
//! your Cargo.toml:
//! ```toml
//! [dependencies]
//! canon-pet = { version = "0.1", features = ["feature1", "feature2"] }
//! ```
pub mod autom;
pub mod autom_group;
pub mod bitset;
pub mod canon;
pub mod certificate;
mod cmp;
mod colored_graph;
pub mod dense;
pub mod error;
pub mod graph;
pub mod options;
pub mod partition;
pub mod perm;
pub mod prelude;
pub mod refine;
pub mod search;

pub use canon::{canonicalize, Canon, IntoCanon, TryIntoCanon, TryIntoCanonWith};
pub use cmp::IsIdentical;
pub use dense::{native_word_size, DenseGraph};
pub use error::CanonError;
pub use options::Options;
pub use perm::Permutation;
pub use search::SearchStats;
