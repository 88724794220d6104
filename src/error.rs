use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum CanonError {
    #[error("Vertex {vertex} out of range for graph with {n} vertices")]
    InvalidVertexIndex { vertex: usize, n: usize },
    #[error("Invalid graph: {0}")]
    InvalidGraph(String),
    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}
