//! Converts a code repository into a single LLM prompt, filtering the
//! tree through layered, per-directory ignore rule files along the way.

pub mod config;
pub mod generate;
pub mod ignore;
pub mod traits;

pub use config::{load_config, load_config_from, Config, CONFIG_FILE_NAME, DEFAULT_CONFIG_KEY};
pub use generate::Generator;
pub use ignore::{IgnoreRule, IgnoreSet, TreeFilter, IGNORE_FILE_NAME};
pub use traits::GenerateOperation;
