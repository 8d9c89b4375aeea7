//! Path-ignore evaluation: per-directory rule files, layered scopes,
//! and the filtered tree walk built on top of them.

pub mod filter;
pub mod pattern;
pub mod ruleset;

pub use filter::TreeFilter;
pub use pattern::IgnoreRule;
pub use ruleset::{IgnoreSet, IGNORE_FILE_NAME};
