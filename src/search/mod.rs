//! Search for perfect cyclic difference sets
//!
//! A set of k residues modulo v = k(k - 1) + 1 is a perfect difference set
//! when every nonzero residue appears exactly once as a difference of two of
//! its elements. Sets are built by depth-first search over increasing
//! elements, starting from the canonical prefix 0, 1:
//! - `candidate`: which sizes k can have a solution at all
//! - `provisional`: the partial set and its backtracking search
//! - `parallel`: fan-out of one size into subtrees searched concurrently

pub mod candidate;
pub mod config;
pub mod parallel;
pub mod provisional;
pub mod result;

#[allow(unused_imports)]
pub use config::SearchConfig;
#[allow(unused_imports)]
pub use parallel::{ParallelConfig, SkipCutoff, run_parallel_search};
#[allow(unused_imports)]
pub use provisional::{ProvisionalSet, is_difference_set};
#[allow(unused_imports)]
pub use result::{RunSummary, SearchStatus, Solution};
