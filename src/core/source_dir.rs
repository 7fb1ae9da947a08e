//! Immediate file listing of one directory, partitioned by extension.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// How a file participates in a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Compiled translation unit.
    Source,
    /// Header, listed but not compiled.
    Header,
    Other,
}

/// Extension sets used to partition files.
#[derive(Debug, Clone)]
pub struct Extensions {
    pub source: Vec<String>,
    pub header: Vec<String>,
}

impl Extensions {
    pub fn classify(&self, path: &Path) -> FileKind {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return FileKind::Other;
        };
        let matches = |set: &[String]| set.iter().any(|s| s.eq_ignore_ascii_case(ext));
        if matches(&self.source) {
            FileKind::Source
        } else if matches(&self.header) {
            FileKind::Header
        } else {
            FileKind::Other
        }
    }
}

impl Default for Extensions {
    fn default() -> Self {
        Extensions {
            source: ["cpp", "cc", "cxx", "c"].map(String::from).to_vec(),
            header: ["hpp", "hh", "hxx", "h"].map(String::from).to_vec(),
        }
    }
}

/// The files directly inside a directory (subdirectories are not followed).
///
/// Each partition is sorted by file name. Recomputed on every scan.
#[derive(Debug, Clone, Default)]
pub struct SourceDirectory {
    pub path: PathBuf,
    pub sources: Vec<PathBuf>,
    pub headers: Vec<PathBuf>,
    pub others: Vec<PathBuf>,
}

impl SourceDirectory {
    /// List `path` and partition its files.
    pub fn read(path: &Path, extensions: &Extensions) -> io::Result<Self> {
        let mut dir = SourceDirectory {
            path: path.to_path_buf(),
            ..Default::default()
        };

        for entry in fs::read_dir(path)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file = entry.path();
            match extensions.classify(&file) {
                FileKind::Source => dir.sources.push(file),
                FileKind::Header => dir.headers.push(file),
                FileKind::Other => dir.others.push(file),
            }
        }

        dir.sources.sort();
        dir.headers.sort();
        dir.others.sort();
        Ok(dir)
    }

    /// A directory is a target directory iff it directly holds a compiled source.
    pub fn is_target_dir(&self) -> bool {
        !self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partition_by_extension() {
        let tmp = TempDir::new().unwrap();
        for name in ["b.cpp", "a.CPP", "x.hpp", "ripemd160.h", "notes.txt", "Makefile"] {
            fs::write(tmp.path().join(name), "").unwrap();
        }
        fs::create_dir(tmp.path().join("nested.cpp")).unwrap();

        let dir = SourceDirectory::read(tmp.path(), &Extensions::default()).unwrap();
        let names = |files: &[PathBuf]| -> Vec<String> {
            files
                .iter()
                .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
                .collect()
        };

        assert_eq!(names(&dir.sources), vec!["a.CPP", "b.cpp"]);
        assert_eq!(names(&dir.headers), vec!["ripemd160.h", "x.hpp"]);
        assert_eq!(names(&dir.others), vec!["Makefile", "notes.txt"]);
        assert!(dir.is_target_dir());
    }

    #[test]
    fn test_headers_only_is_not_a_target() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("only.hpp"), "").unwrap();
        let dir = SourceDirectory::read(tmp.path(), &Extensions::default()).unwrap();
        assert!(!dir.is_target_dir());
    }
}
