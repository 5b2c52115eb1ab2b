//! Query interpretation.
//!
//! - [`pattern`] - Abbreviated search strings to match predicates
//! - [`state`] - The compound `name#member@menu` query behind one search field
//! - [`candidates`] - Incremental filtering of the catalog as the query grows

pub mod candidates;
pub mod pattern;
pub mod state;

pub use candidates::{filter_incremental, CandidateIndex};
pub use pattern::{
    compile_exact_case_insensitive, compile_exact_case_sensitive, compile_fuzzy, normalize_stars,
    MatchPredicate,
};
pub use state::{QueryMode, QueryState};
