//! The primary function for generating prompts from a code repository
//! based on a given `Config`: scanning the tree through the ignore
//! filter, reading the surviving files, and stitching the results into
//! a single delimited prompt body.

use crate::config::{Config, CONFIG_FILE_NAME};
use crate::ignore::{IgnoreSet, TreeFilter};
use crate::traits::GenerateOperation;
use anyhow::{Context, Error};
use log::debug;
use rayon::prelude::*;
use std::fs;
use std::path::Path;

/// Struct for implementing the [`GenerateOperation`] trait.
#[derive(Default)]
pub struct Generator;

impl GenerateOperation for Generator {
    fn run(&self, config: &Config) -> Result<(String, Vec<String>), Error> {
        let path = config.path.as_deref().unwrap_or(".");
        let repo_path = Path::new(path);
        let delimiter = config.delimiter.as_deref().unwrap_or("```");

        // Patterns applied at the root scope ahead of any rule file:
        // config ignores, the tool's own artifacts, language defaults.
        let mut extra = config.ignore.clone().unwrap_or_default();
        if let Some(output) = config.output.as_deref() {
            extra.push(format!("/{}", output));
        }
        extra.push(format!("/{}", CONFIG_FILE_NAME));
        if let Some(language) = config.language.as_deref() {
            extra.extend(
                default_ignore_lines(language)
                    .iter()
                    .map(|line| line.to_string()),
            );
        }

        let rules = if config.use_rules.unwrap_or(true) {
            IgnoreSet::load_with(repo_path, &extra)
        } else {
            IgnoreSet::from_patterns(repo_path, &extra)
        }
        .with_context(|| format!("'{}' is not a readable directory", path))?;
        let filter = TreeFilter::with_rules(rules);

        let mut prompt = String::new();
        if let Some(prompts) = &config.prompts {
            for line in prompts {
                prompt.push_str(line);
                prompt.push('\n');
            }
            prompt.push('\n');
        }

        let files = filter.files();
        let sections: Vec<(String, Option<String>)> = files
            .par_iter()
            .map(|relative| {
                let display = relative.to_string_lossy().replace('\\', "/");
                match fs::read_to_string(filter.root().join(relative)) {
                    Ok(contents) => (
                        format!("{delimiter}{display}\n{contents}\n{delimiter}\n\n"),
                        None,
                    ),
                    Err(e) => {
                        debug!("failed to read {}: {}", display, e);
                        (
                            format!("{delimiter}{display}\n[Error reading file]\n{delimiter}\n\n"),
                            Some(format!("could not read '{}': {}", display, e)),
                        )
                    }
                }
            })
            .collect();

        let mut errors = Vec::new();
        for (section, error) in sections {
            prompt.push_str(&section);
            if let Some(error) = error {
                errors.push(error);
            }
        }

        Ok((prompt, errors))
    }
}

/// Returns the default pattern lines to ignore for the given language.
fn default_ignore_lines(language: &str) -> &'static [&'static str] {
    match language.to_lowercase().as_str() {
        "rust" => &["target/", "*.rs.bk", "Cargo.lock"],
        "python" => &["*.pyc", "__pycache__/", "venv/"],
        "javascript" | "typescript" => &["node_modules/", "*.min.js", "dist/"],
        "java" => &["*.class", "*.jar", "target/"],
        "c++" => &["*.o", "*.obj", "*.exe", "build/"],
        "go" => &["*.out", "*.test", "vendor/"],
        "php" => &["*.log", "vendor/", "composer.lock"],
        _ => &[],
    }
}
