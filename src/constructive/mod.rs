//! Constructive heuristics for building the initial route partition.
//!
//! - [`clarke_wright`] — Clarke-Wright savings algorithm (1964), O(n² log n)

mod clarke_wright;

pub use clarke_wright::clarke_wright_savings;
