//! Discovers per-directory ignore files under a root and evaluates the
//! layered rule set they contribute.
//!
//! Rules live in a flat list ordered by the depth of the directory that
//! contributed them (shallower first, lexicographic at equal depth,
//! file order within one file). Evaluation scans the whole list and
//! lets the last matching rule decide, which is how deeper files and
//! negations override what came before them.

use crate::ignore::pattern::IgnoreRule;
use log::debug;
use std::ffi::OsStr;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Name of the per-directory rule file the scanner honours.
pub const IGNORE_FILE_NAME: &str = ".gitignore";

/// An ordered, immutable set of rules gathered from every ignore file
/// under one root directory.
#[derive(Debug)]
pub struct IgnoreSet {
    root: PathBuf,
    rules: Vec<IgnoreRule>,
}

impl IgnoreSet {
    /// Loads every ignore file under `root`. Returns `None` when the
    /// root is missing or not a directory; unreadable ignore files are
    /// skipped and contribute no rules.
    pub fn load(root: &Path) -> Option<Self> {
        Self::build(root, &[], true)
    }

    /// Like [`IgnoreSet::load`], with extra pattern lines compiled at
    /// the root scope ahead of any discovered file.
    pub fn load_with(root: &Path, extra_patterns: &[String]) -> Option<Self> {
        Self::build(root, extra_patterns, true)
    }

    /// Builds a set from caller-supplied pattern lines only, without
    /// reading any rule files.
    pub fn from_patterns(root: &Path, patterns: &[String]) -> Option<Self> {
        Self::build(root, patterns, false)
    }

    fn build(root: &Path, extra_patterns: &[String], discover: bool) -> Option<Self> {
        if !root.is_dir() {
            return None;
        }
        let root = absolute(root)?;

        let mut rules = Vec::new();
        for line in extra_patterns {
            if let Some(rule) = IgnoreRule::parse(line, "") {
                rules.push(rule);
            }
        }

        if discover {
            for (scope, file) in discover_ignore_files(&root) {
                let contents = match fs::read_to_string(&file) {
                    Ok(contents) => contents,
                    Err(e) => {
                        debug!("skipping unreadable {}: {}", file.display(), e);
                        continue;
                    }
                };
                for line in contents.lines() {
                    if let Some(rule) = IgnoreRule::parse(line, &scope) {
                        rules.push(rule);
                    }
                }
            }
        }

        Some(Self { root, rules })
    }

    /// The resolved absolute root this set evaluates against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The compiled rules in evaluation order.
    pub fn rules(&self) -> impl Iterator<Item = &IgnoreRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the verdict for a candidate path. `is_dir` says whether
    /// the candidate is a directory; it is supplied by the caller so
    /// the candidate need not exist on disk. Paths outside the root and
    /// the root itself are never ignored.
    pub fn is_ignored(&self, candidate: &Path, is_dir: bool) -> bool {
        self.last_match(candidate, is_dir)
            .map_or(false, |rule| !rule.is_negation())
    }

    /// The rule that decides a candidate's verdict, if any matches at
    /// all. Later rules override earlier ones, so the last match wins.
    pub fn last_match(&self, candidate: &Path, is_dir: bool) -> Option<&IgnoreRule> {
        if self.rules.is_empty() {
            return None;
        }
        let relative = self.relativize(candidate)?;
        if relative.is_empty() {
            return None;
        }

        let mut winner = None;
        for rule in &self.rules {
            let scoped = match scoped_candidate(&relative, rule.scope()) {
                Some(scoped) => scoped,
                None => continue,
            };
            if rule.matches(scoped, is_dir) {
                winner = Some(rule);
            }
        }
        winner
    }

    /// Root-relative, forward-slash form of a candidate path. `None`
    /// when the candidate is outside the root or cannot be normalized.
    fn relativize(&self, candidate: &Path) -> Option<String> {
        let relative = candidate.strip_prefix(&self.root).ok()?;
        slash_join(relative)
    }
}

/// Narrows a root-relative path to a rule's scope directory. Returns
/// the remainder to test against the rule's matcher, or `None` when the
/// path lies outside the scope.
fn scoped_candidate<'a>(relative: &'a str, scope: &str) -> Option<&'a str> {
    if scope.is_empty() {
        return Some(relative);
    }
    if relative == scope {
        return Some("");
    }
    relative
        .strip_prefix(scope)
        .and_then(|rest| rest.strip_prefix('/'))
}

/// Finds every ignore file under `root`, shallowest containing
/// directory first, lexicographic within one depth. Subtrees that fail
/// to enumerate are skipped.
fn discover_ignore_files(root: &Path) -> Vec<(String, PathBuf)> {
    let mut found: Vec<(usize, String, PathBuf)> = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() || entry.file_name() != OsStr::new(IGNORE_FILE_NAME) {
            continue;
        }
        let scope = entry
            .path()
            .parent()
            .and_then(|dir| dir.strip_prefix(root).ok())
            .and_then(slash_join);
        if let Some(scope) = scope {
            let depth = entry.depth().saturating_sub(1);
            found.push((depth, scope, entry.into_path()));
        }
    }
    found.sort_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)));
    found
        .into_iter()
        .map(|(_, scope, path)| (scope, path))
        .collect()
}

/// Joins a relative path's components with forward slashes; empty for
/// an empty path, `None` for paths that escape upward.
fn slash_join(relative: &Path) -> Option<String> {
    let mut joined = String::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                if !joined.is_empty() {
                    joined.push('/');
                }
                joined.push_str(&part.to_string_lossy());
            }
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(joined)
}

/// Resolves a path to an absolute form without touching symlinks.
pub(crate) fn absolute(path: &Path) -> Option<PathBuf> {
    if path.is_absolute() {
        Some(path.to_path_buf())
    } else {
        std::env::current_dir().ok().map(|cwd| cwd.join(path))
    }
}
