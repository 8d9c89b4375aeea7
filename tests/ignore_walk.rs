use pluck::{IgnoreSet, TreeFilter, IGNORE_FILE_NAME};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, "content").unwrap();
}

fn walked(root: &Path) -> Vec<String> {
    TreeFilter::new(root)
        .files()
        .iter()
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .collect()
}

#[test]
fn single_rule_file_scenario() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join(IGNORE_FILE_NAME), "*.tmp\n!keep.tmp\nbuild/\n").unwrap();
    touch(root, "a.tmp");
    touch(root, "keep.tmp");
    touch(root, "build/output.bin");
    touch(root, "src/main.txt");

    let files = walked(root);
    assert!(files.contains(&"keep.tmp".to_string()));
    assert!(files.contains(&"src/main.txt".to_string()));
    assert!(!files.contains(&"a.tmp".to_string()));
    assert!(!files.iter().any(|f| f.starts_with("build")));

    // The same verdicts hold when querying the rule set directly.
    let rules = IgnoreSet::load(root).unwrap();
    assert!(rules.is_ignored(&root.join("a.tmp"), false));
    assert!(rules.is_ignored(&root.join("build"), true));
    assert!(rules.is_ignored(&root.join("build/output.bin"), false));
    assert!(!rules.is_ignored(&root.join("keep.tmp"), false));
    assert!(!rules.is_ignored(&root.join("src/main.txt"), false));
}

#[test]
fn nested_rule_files_layer_over_each_other() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join(IGNORE_FILE_NAME), "*.log\n/dist\n").unwrap();
    touch(root, "app.log");
    touch(root, "dist/bundle.js");
    touch(root, "sub/dist/bundle.js");
    touch(root, "sub/trace.log");
    touch(root, "sub/keep.log");
    fs::write(root.join("sub").join(IGNORE_FILE_NAME), "!keep.log\n").unwrap();

    let files = walked(root);
    // The anchored /dist only applies at the root of its scope.
    assert!(!files.iter().any(|f| f.starts_with("dist/")));
    assert!(files.contains(&"sub/dist/bundle.js".to_string()));
    // The nested negation overrides the root *.log rule inside `sub`.
    assert!(files.contains(&"sub/keep.log".to_string()));
    assert!(!files.contains(&"sub/trace.log".to_string()));
    assert!(!files.contains(&"app.log".to_string()));
}

#[test]
fn scoped_rules_do_not_leak_into_siblings() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    touch(root, "sub/foo");
    touch(root, "other/foo");
    fs::write(root.join("sub").join(IGNORE_FILE_NAME), "foo\n").unwrap();

    let files = walked(root);
    assert!(!files.contains(&"sub/foo".to_string()));
    assert!(files.contains(&"other/foo".to_string()));
}

#[test]
fn double_star_rules_apply_at_any_depth() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join(IGNORE_FILE_NAME), "**/temp\n").unwrap();
    touch(root, "temp");
    touch(root, "a/temp");
    touch(root, "a/b/temp");
    touch(root, "a/temperature");

    let files = walked(root);
    assert!(!files.contains(&"temp".to_string()));
    assert!(!files.contains(&"a/temp".to_string()));
    assert!(!files.contains(&"a/b/temp".to_string()));
    assert!(files.contains(&"a/temperature".to_string()));
}

#[test]
fn reloading_a_root_reproduces_the_same_listing() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join(IGNORE_FILE_NAME), "*.bak\nlogs/\n").unwrap();
    touch(root, "notes.txt");
    touch(root, "old.bak");
    touch(root, "logs/app.log");

    assert_eq!(walked(root), walked(root));
}
