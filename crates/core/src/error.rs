//! Construction-time error types.
//!
//! Every failure this crate can report is a configuration error caught before
//! the first access is processed. Protocol violations discovered *after*
//! construction (a shepherd population above its bound, an empty candidate
//! list) are contract breaches between the policy and its caller, not
//! recoverable conditions, and panic instead — see the victim-selection
//! documentation on [`crate::cache::policies::ShepherdPolicy`].

use thiserror::Error;

/// Errors rejected when a cache or policy is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A geometry parameter was zero.
    #[error("cache geometry must be non-zero (size_bytes={size_bytes}, line_bytes={line_bytes}, ways={ways})")]
    ZeroGeometry {
        /// Configured total capacity in bytes.
        size_bytes: usize,
        /// Configured line size in bytes.
        line_bytes: usize,
        /// Configured associativity.
        ways: usize,
    },

    /// The capacity does not divide into a whole number of sets of `ways` lines.
    #[error("size_bytes={size_bytes} does not hold a whole number of {ways}-way sets of {line_bytes}-byte lines")]
    MisalignedGeometry {
        /// Configured total capacity in bytes.
        size_bytes: usize,
        /// Configured line size in bytes.
        line_bytes: usize,
        /// Configured associativity.
        ways: usize,
    },

    /// The shepherd region must hold at least one way and strictly fewer than
    /// the associativity, or no main region would remain to graduate into.
    #[error("shepherd region of {shepherd_ways} ways must satisfy 1 <= shepherd_ways < ways ({ways})")]
    ShepherdRegion {
        /// Configured shepherd-region capacity.
        shepherd_ways: usize,
        /// Configured associativity.
        ways: usize,
    },
}
