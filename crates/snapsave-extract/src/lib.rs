//! Turns recovered proxy markup into ranked media candidates.

pub mod platforms;
pub mod query;
pub mod rank;
pub mod text;

pub use platforms::snapsave::{fix_thumbnail, progress_address};
pub use query::{Document, Lookup, Node};
pub use rank::{Scored, best, rank, resolution_score, tier_score};
pub use text::Boilerplate;
