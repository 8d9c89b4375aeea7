//! Filtered enumeration of a directory tree.
//!
//! The filter layers two vetoes over a recursive walk: a fixed rule
//! that excludes any directory whose name starts with `.`, and the
//! verdicts of the loaded rule set. A vetoed directory is pruned
//! without descending; unreadable directories contribute nothing.

use crate::ignore::ruleset::{absolute, IgnoreSet};
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use walkdir::{DirEntry, WalkDir};

/// Walks a root directory and exposes the entries that survive
/// filtering. Holds at most one rule set at a time; changing the root
/// swaps it wholesale.
pub struct TreeFilter {
    root: PathBuf,
    rules: Option<IgnoreSet>,
}

impl TreeFilter {
    /// Builds a filter for `root`, loading its ignore files. When no
    /// rule set can be loaded the filter still works and nothing beyond
    /// dot-directories is excluded.
    pub fn new(root: &Path) -> Self {
        let rules = IgnoreSet::load(root);
        if rules.is_none() {
            debug!(
                "no rule set for {}; filtering dot-directories only",
                root.display()
            );
        }
        let root = absolute(root).unwrap_or_else(|| root.to_path_buf());
        Self { root, rules }
    }

    /// Builds a filter around an already-loaded rule set.
    pub fn with_rules(rules: IgnoreSet) -> Self {
        Self {
            root: rules.root().to_path_buf(),
            rules: Some(rules),
        }
    }

    /// Replaces the current root, discarding the previous rule set and
    /// loading the new root's ignore files.
    pub fn set_root(&mut self, root: &Path) {
        self.rules = IgnoreSet::load(root);
        self.root = absolute(root).unwrap_or_else(|| root.to_path_buf());
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The rule set in effect, if one was loaded.
    pub fn rules(&self) -> Option<&IgnoreSet> {
        self.rules.as_ref()
    }

    /// Lists the files under the root that survive filtering, relative
    /// to the root and sorted by file name.
    pub fn files(&self) -> Vec<PathBuf> {
        self.collect_files(None)
    }

    /// Like [`TreeFilter::files`], stopping early once `cancel` is set.
    /// A cancelled walk returns the entries gathered so far.
    pub fn files_until(&self, cancel: &AtomicBool) -> Vec<PathBuf> {
        self.collect_files(Some(cancel))
    }

    fn collect_files(&self, cancel: Option<&AtomicBool>) -> Vec<PathBuf> {
        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| self.keep(entry));

        for entry in walker {
            if cancel.map_or(false, |flag| flag.load(Ordering::Relaxed)) {
                break;
            }
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(&self.root) {
                files.push(relative.to_path_buf());
            }
        }
        files
    }

    fn keep(&self, entry: &DirEntry) -> bool {
        // The walk root is exempt from both vetoes.
        if entry.depth() == 0 {
            return true;
        }
        let is_dir = entry.file_type().is_dir();
        if is_dir && entry.file_name().to_string_lossy().starts_with('.') {
            return false;
        }
        match &self.rules {
            Some(rules) => !rules.is_ignored(entry.path(), is_dir),
            None => true,
        }
    }
}
