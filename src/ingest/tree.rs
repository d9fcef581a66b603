//! Directory walking and tree rendering

use super::error::RetrievalError;
use super::patterns::ExclusionSet;
use ignore::WalkBuilder;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

const TREE_HEADER: &str = "Directory structure:";

#[derive(Debug, Default)]
struct DirNode {
    dirs: BTreeMap<String, DirNode>,
    files: Vec<String>,
}

impl DirNode {
    fn insert(&mut self, components: &[String], is_dir: bool) {
        match components {
            [] => {}
            [name] if !is_dir => self.files.push(name.clone()),
            [name] => {
                self.dirs.entry(name.clone()).or_default();
            }
            [head, rest @ ..] => self
                .dirs
                .entry(head.clone())
                .or_default()
                .insert(rest, is_dir),
        }
    }

    fn render(&self, prefix: &str, out: &mut String) {
        let mut files: Vec<&String> = self.files.iter().collect();
        files.sort_by_key(|name| name.to_lowercase());
        let mut dirs: Vec<(&String, &DirNode)> = self.dirs.iter().collect();
        dirs.sort_by_key(|(name, _)| name.to_lowercase());

        let total = files.len() + dirs.len();
        let mut index = 0;

        for name in files {
            index += 1;
            let connector = if index == total { "└── " } else { "├── " };
            out.push_str(&format!("{}{}{}\n", prefix, connector, name));
        }

        for (name, node) in dirs {
            index += 1;
            let last = index == total;
            let connector = if last { "└── " } else { "├── " };
            out.push_str(&format!("{}{}{}/\n", prefix, connector, name));
            let child_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
            node.render(&child_prefix, out);
        }
    }
}

/// Walks `root` and renders its file structure as an indented tree.
///
/// `.gitignore` rules are honoured, hidden files are kept, the `.git`
/// directory and every exclusion pattern are skipped. More than
/// `max_entries` files and directories is an error.
pub fn render_tree(
    root: &Path,
    display_name: &str,
    exclusions: &ExclusionSet,
    max_entries: usize,
) -> Result<String, RetrievalError> {
    if !root.exists() {
        return Err(RetrievalError::NotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(RetrievalError::NotADirectory(root.to_path_buf()));
    }

    let overrides = exclusions.to_overrides(root)?;
    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(false)
        .require_git(false)
        .parents(false)
        .overrides(overrides)
        .filter_entry(|entry| entry.file_name() != ".git")
        .build();

    let mut tree = DirNode::default();
    let mut entries = 0usize;

    for result in walker {
        let entry = result?;
        if entry.depth() == 0 {
            continue;
        }

        entries += 1;
        if entries > max_entries {
            return Err(RetrievalError::TooLarge { limit: max_entries });
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let components: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
        tree.insert(&components, is_dir);
    }

    debug!(root = %root.display(), entries, "Repository walk completed");

    let mut out = format!("{}\n└── {}/\n", TREE_HEADER, display_name);
    tree.render("    ", &mut out);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_repo() -> TempDir {
        let dir = TempDir::new().unwrap();
        let base = dir.path();

        fs::create_dir_all(base.join("src/handlers")).unwrap();
        fs::create_dir_all(base.join("node_modules/left-pad")).unwrap();
        fs::create_dir_all(base.join(".github/workflows")).unwrap();
        fs::write(base.join("README.md"), "# shop").unwrap();
        fs::write(base.join("Cargo.toml"), "[package]\nname = \"shop\"\n").unwrap();
        fs::write(base.join("src/main.rs"), "fn main() {}").unwrap();
        fs::write(base.join("src/handlers/auth.rs"), "").unwrap();
        fs::write(base.join("node_modules/left-pad/index.js"), "").unwrap();
        fs::write(base.join("logo.png"), [0u8, 1, 2]).unwrap();
        fs::write(base.join("server.log"), "started").unwrap();
        fs::write(base.join(".github/workflows/ci.yml"), "on: push").unwrap();

        dir
    }

    #[test]
    fn test_render_tree_layout() {
        let dir = create_test_repo();
        let tree = render_tree(dir.path(), "shop", &ExclusionSet::default(), 100).unwrap();

        let expected = "\
Directory structure:
└── shop/
    ├── Cargo.toml
    ├── README.md
    ├── .github/
    │   └── workflows/
    │       └── ci.yml
    └── src/
        ├── main.rs
        └── handlers/
            └── auth.rs
";
        assert_eq!(tree, expected);
    }

    #[test]
    fn test_exclusions_are_applied() {
        let dir = create_test_repo();
        let tree = render_tree(dir.path(), "shop", &ExclusionSet::default(), 100).unwrap();

        assert!(!tree.contains("node_modules"));
        assert!(!tree.contains("logo.png"));
        assert!(!tree.contains("server.log"));
    }

    #[test]
    fn test_empty_exclusion_set_keeps_everything() {
        let dir = create_test_repo();
        let tree = render_tree(dir.path(), "shop", &ExclusionSet::new(Vec::<String>::new()), 100)
            .unwrap();

        assert!(tree.contains("node_modules/"));
        assert!(tree.contains("logo.png"));
    }

    #[test]
    fn test_gitignore_is_honoured() {
        let dir = create_test_repo();
        fs::write(dir.path().join(".gitignore"), "target/\n").unwrap();
        fs::create_dir_all(dir.path().join("target/debug")).unwrap();
        fs::write(dir.path().join("target/debug/shop"), "").unwrap();

        let tree = render_tree(dir.path(), "shop", &ExclusionSet::default(), 100).unwrap();

        assert!(!tree.contains("target"));
        assert!(tree.contains(".gitignore"));
    }

    #[test]
    fn test_git_directory_is_skipped() {
        let dir = create_test_repo();
        fs::create_dir_all(dir.path().join(".git/objects")).unwrap();
        fs::write(dir.path().join(".git/HEAD"), "ref: refs/heads/main").unwrap();

        let tree = render_tree(dir.path(), "shop", &ExclusionSet::default(), 100).unwrap();

        assert!(!tree.contains(".git/"));
        assert!(!tree.contains("HEAD"));
    }

    #[test]
    fn test_same_directory_yields_same_tree() {
        let dir = create_test_repo();
        let first = render_tree(dir.path(), "shop", &ExclusionSet::default(), 100).unwrap();
        let second = render_tree(dir.path(), "shop", &ExclusionSet::default(), 100).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_entry_limit() {
        let dir = create_test_repo();
        let err = render_tree(dir.path(), "shop", &ExclusionSet::default(), 3).unwrap_err();
        assert!(matches!(err, RetrievalError::TooLarge { limit: 3 }));
    }

    #[test]
    fn test_missing_root() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = render_tree(&missing, "nope", &ExclusionSet::default(), 100).unwrap_err();
        assert!(matches!(err, RetrievalError::NotFound(_)));
    }

    #[test]
    fn test_root_is_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "content").unwrap();
        let err = render_tree(&file, "file.txt", &ExclusionSet::default(), 100).unwrap_err();
        assert!(matches!(err, RetrievalError::NotADirectory(_)));
    }
}
