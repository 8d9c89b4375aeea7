use crate::Config;
use anyhow::Error;

/// Trait for the 'generate' operation.
pub trait GenerateOperation {
    /// Runs the generation process based on the provided configuration.
    ///
    /// # Returns
    /// A `Result` containing a tuple of (generated prompt, per-file
    /// error messages) on success, or an `anyhow::Error` on critical
    /// failure.
    fn run(&self, config: &Config) -> Result<(String, Vec<String>), Error>;
}
