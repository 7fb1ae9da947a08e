//! Source tree fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::core::manifest::MANIFEST_NAME;
use crate::core::workspace::Workspace;
use crate::util::config::CONFIG_NAME;

/// A throwaway project root with a `src/` tree.
///
/// Directories are given `/`-separated and relative to `src/`.
pub struct TreeFixture {
    dir: TempDir,
}

impl TreeFixture {
    /// Create an empty project with an existing `src/` directory.
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        TreeFixture { dir }
    }

    /// Project root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of a source-relative directory.
    pub fn src_path(&self, rel_dir: &str) -> PathBuf {
        let mut path = self.root().join("src");
        for seg in rel_dir.split('/').filter(|s| !s.is_empty()) {
            path.push(seg);
        }
        path
    }

    /// Write a source (or any) file into `rel_dir`.
    pub fn source(&self, rel_dir: &str, file: &str) -> &Self {
        self.file(rel_dir, file, &sources::translation_unit(file))
    }

    /// Write the manifest of `rel_dir`.
    pub fn manifest(&self, rel_dir: &str, contents: &str) -> &Self {
        self.file(rel_dir, MANIFEST_NAME, contents)
    }

    /// Write an arbitrary file into `rel_dir`.
    pub fn file(&self, rel_dir: &str, file: &str, contents: &str) -> &Self {
        let dir = self.src_path(rel_dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file), contents).unwrap();
        self
    }

    /// Write `trellis.toml` at the project root.
    pub fn config(&self, contents: &str) -> &Self {
        fs::write(self.root().join(CONFIG_NAME), contents).unwrap();
        self
    }

    /// Open the workspace for this tree.
    pub fn workspace(&self) -> Workspace {
        Workspace::open(self.root(), None).unwrap()
    }
}

impl Default for TreeFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Prebuilt trees.
pub mod trees {
    use super::TreeFixture;

    /// `lib/a`, `lib/b` (depends on `a`), and `lib/b/test`.
    pub fn library_with_test() -> TreeFixture {
        let tree = TreeFixture::new();
        tree.source("lib/a", "a.cpp")
            .source("lib/a", "a.hpp")
            .source("lib/b", "b.cpp")
            .manifest("lib/b", "DEPENDS := a\n")
            .source("lib/b/test", "test_b.cpp");
        tree
    }

    /// A small layout shaped like a real interpreter project: shared
    /// libraries, an executable with tests and a script, and a stray
    /// header-only directory.
    pub fn application() -> TreeFixture {
        let tree = TreeFixture::new();
        tree.source("common", "term.cpp")
            .source("common", "term.hpp")
            .source("common/test", "test_terms.cpp")
            .source("common/test", "test_sha1.cpp")
            .source("interp", "interpreter.cpp")
            .manifest("interp", "DEPENDS := common\n")
            .source("interp/test", "test_interp.cpp")
            .source("main", "main.cpp")
            .manifest("main", "EXE := prologcoin\nDEPENDS := interp common\nRUN_ARGS := --help\n")
            .source("main/test", "test_main.cpp")
            .source("main/script", "setup_startup.cpp")
            .manifest("main/script", "RUN_ARGS := --boot\n")
            .source("headers_only", "flags.hpp");
        tree
    }
}

/// Source file templates.
pub mod sources {
    /// Minimal content for a file, chosen by extension.
    pub fn translation_unit(file: &str) -> String {
        let stem = file.split('.').next().unwrap_or(file);
        if file.ends_with(".hpp") || file.ends_with(".h") {
            format!("#pragma once\nint {stem}();\n")
        } else {
            format!("int {stem}() {{ return 0; }}\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_writes_into_src() {
        let tree = TreeFixture::new();
        tree.source("lib/a", "a.cpp").manifest("lib/a", "DEPENDS := x\n");

        assert!(tree.src_path("lib/a").join("a.cpp").is_file());
        assert!(tree.src_path("lib/a").join(MANIFEST_NAME).is_file());
        assert!(tree.workspace().source_dir().ends_with("src"));
    }

    #[test]
    fn test_translation_unit_templates() {
        assert!(sources::translation_unit("a.hpp").starts_with("#pragma once"));
        assert!(sources::translation_unit("a.cpp").contains("int a()"));
    }
}
