//! Filesystem utilities.
//!
//! Besides a write helper this module hosts the lexical path
//! resolver used to embed portable references between points of the tree.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Separator used for every path string the generator emits.
pub const SEPARATOR: char = '/';

/// Express `from` relative to the directory `to`.
///
/// Both paths are split on `sep` and compared segment by segment. The
/// common-prefix scan never consumes the last segment of `from`, so a path
/// whose final component matches the corresponding component of `to` still
/// walks up one level. Every unmatched segment of `to` yields a `..` token,
/// then the unmatched segments of `from` are appended.
///
/// Purely lexical: no existence checks, no normalization. Callers pass
/// absolute, already-normalized paths without trailing separators.
pub fn relative_with(from: &str, to: &str, sep: char) -> String {
    let from_parts: Vec<&str> = from.split(sep).collect();
    let to_parts: Vec<&str> = to.split(sep).collect();

    let mut common = 0;
    while common + 1 < from_parts.len()
        && common < to_parts.len()
        && from_parts[common] == to_parts[common]
    {
        common += 1;
    }

    let mut rel = String::new();
    for _ in common..to_parts.len() {
        rel.push_str("..");
        rel.push(sep);
    }

    let mut sep_buf = [0u8; 4];
    rel.push_str(&from_parts[common..].join(sep.encode_utf8(&mut sep_buf)));
    rel
}

/// [`relative_with`] over filesystem paths, using [`SEPARATOR`].
pub fn relative(from: &Path, to: &Path) -> String {
    relative_with(&to_slash(from), &to_slash(to), SEPARATOR)
}

/// Render a path with forward slashes and no trailing separator.
pub fn to_slash(path: &Path) -> String {
    let s = path.to_string_lossy().replace('\\', "/");
    match s.trim_end_matches('/') {
        "" if s.starts_with('/') => "/".to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }
    }
    fs::write(path, contents).with_context(|| format!("failed to write file: {}", path.display()))
}

/// Canonicalize a path, but don't fail if it doesn't exist yet.
/// Returns the path as-is if canonicalization fails.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_walks_up_from_reference() {
        assert_eq!(
            relative_with("/work/src/core/a.cpp", "/work/bin", '/'),
            "../src/core/a.cpp"
        );
        assert_eq!(
            relative_with("/work/src/core", "/work/bin/debug", '/'),
            "../../src/core"
        );
    }

    #[test]
    fn test_relative_backslash_style() {
        assert_eq!(
            relative_with(r"C:\proj\src\x.cpp", r"C:\proj\bin", '\\'),
            r"..\src\x.cpp"
        );
    }

    #[test]
    fn test_relative_never_shares_last_segment() {
        // Identical paths still walk up once and come back down.
        assert_eq!(relative_with("/a/b", "/a/b", '/'), "../b");
        // `to` ending in the same name as `from` is not treated as shared.
        assert_eq!(relative_with("/a/x", "/a/x/y", '/'), "../../x");
    }

    #[test]
    fn test_relative_empty_when_nothing_remains() {
        assert_eq!(relative_with("/a/b/", "/a/b", '/'), "");
    }

    #[test]
    fn test_relative_round_trip() {
        let cases = [
            ("/r/src/lib/a/a.cpp", "/r/bin"),
            ("/r/src", "/r/bin/debug/x"),
            ("/r/out/release/lib_a", "/r/bin"),
            ("/r/bin", "/r/bin"),
        ];
        for (from, to) in cases {
            let rel = relative_with(from, to, '/');
            let joined = lexical_join(to, &rel);
            assert_eq!(joined, from, "relative({from}, {to}) = {rel}");
        }
    }

    fn lexical_join(base: &str, rel: &str) -> String {
        let mut parts: Vec<&str> = base.split('/').collect();
        for seg in rel.split('/').filter(|s| !s.is_empty()) {
            if seg == ".." {
                parts.pop();
            } else {
                parts.push(seg);
            }
        }
        parts.join("/")
    }

    #[test]
    fn test_to_slash_strips_trailing_separator() {
        assert_eq!(to_slash(Path::new("/a/b/")), "/a/b");
        assert_eq!(to_slash(Path::new("/")), "/");
        assert_eq!(to_slash(Path::new(r"C:\a\b")), "C:/a/b");
    }

    #[test]
    fn test_relative_on_paths() {
        let rel = relative(Path::new("/proj/third_party/inc"), Path::new("/proj/bin"));
        assert_eq!(rel, "../third_party/inc");
    }
}
