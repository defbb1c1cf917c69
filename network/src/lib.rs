//! Address generation and routing of a pipelined radix-`R` NTT network.
//!
//! The network runs `S` stages over `N = R^S` points with `PSI` butterfly
//! units working in parallel. Intermediate data lives in a double-buffered
//! store of `PSI x R` banks, interleaving the GLWE polynomials and
//! decomposition levels of a bootstrapping. Points are modelled as
//! [Coordinate]s carrying provenance [Tag]s, so that a whole forward and
//! backward run can be checked without any arithmetic.

pub mod boundary;
pub mod butterfly;
pub mod config;
pub mod coordinate;
pub mod error;
pub mod orchestrator;
pub mod router;
pub mod store;
pub mod tags;

#[cfg(test)]
mod tests;

pub use boundary::*;
pub use butterfly::*;
pub use config::*;
pub use coordinate::*;
pub use error::*;
pub use orchestrator::*;
pub use router::*;
pub use store::*;
pub use tags::*;
