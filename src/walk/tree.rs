// src/walk/tree.rs
// =============================================================================
// This module implements the tree walk that feeds the audit.
//
// How it works:
// 1. walkdir visits every entry below the root, children before parents.
//    Subdirectories are visited before the files next to them, so the files
//    of a subdirectory come before the files of its parent.
// 2. Directories, symlinks (when not followed) and filtered files are skipped
// 3. Each remaining regular file is read fully into memory
// 4. Anything that goes wrong for one entry becomes a SkippedEntry
//
// The walker holds no state across files. Each Document owns its bytes and
// is dropped by the caller once it has been audited.
// =============================================================================

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// A file found under the root, with its full content.
#[derive(Debug)]
pub struct Document {
    /// Path as walked (the root joined with the relative path)
    pub path: PathBuf,
    /// Path relative to the scan root
    pub relative_path: PathBuf,
    pub content: Vec<u8>,
}

/// An entry the walker could not turn into a Document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub path: Option<PathBuf>,
    pub reason: String,
}

impl fmt::Display for SkippedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {}", path.display(), self.reason),
            None => f.write_str(&self.reason),
        }
    }
}

impl From<walkdir::Error> for SkippedEntry {
    fn from(err: walkdir::Error) -> Self {
        let reason = if let Some(ancestor) = err.loop_ancestor() {
            format!("symbolic link cycle back to {}", ancestor.display())
        } else if let Some(io) = err.io_error() {
            io.to_string()
        } else {
            err.to_string()
        };

        SkippedEntry {
            path: err.path().map(Path::to_path_buf),
            reason,
        }
    }
}

/// Walks a directory tree and yields its documents.
#[derive(Debug, Clone)]
pub struct TreeWalker {
    root: PathBuf,
    follow_links: bool,
    // Lowercase, without the leading dot. Empty means "every file".
    extensions: Vec<String>,
    // Canonical paths that are never yielded (e.g. the report itself)
    excluded: Vec<PathBuf>,
}

impl TreeWalker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            follow_links: false,
            extensions: Vec::new(),
            excluded: Vec::new(),
        }
    }

    /// Follow symbolic links. Cycles are then reported as skipped entries.
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Only yield files whose extension is in `extensions` (case-insensitive).
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        self
    }

    /// Never yield `path`. Paths that do not exist yet are ignored.
    pub fn exclude(mut self, path: &Path) -> Self {
        if let Ok(canonical) = fs::canonicalize(path) {
            self.excluded.push(canonical);
        }
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lazily walks the tree.
    ///
    /// Each call starts a new walk. Files are read one at a time as the
    /// iterator advances.
    pub fn documents(&self) -> impl Iterator<Item = Result<Document, SkippedEntry>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(self.follow_links)
            .contents_first(true)
            .sort_by(|a, b| {
                b.file_type()
                    .is_dir()
                    .cmp(&a.file_type().is_dir())
                    .then_with(|| a.file_name().cmp(b.file_name()))
            })
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) => self.load(entry),
                Err(err) => Some(Err(SkippedEntry::from(err))),
            })
    }

    // Returns None for entries that are not documents at all
    fn load(&self, entry: DirEntry) -> Option<Result<Document, SkippedEntry>> {
        if !entry.file_type().is_file() {
            if entry.path_is_symlink() {
                debug!("not following symbolic link {}", entry.path().display());
            }
            return None;
        }

        if !self.wants(entry.path()) {
            return None;
        }

        if self.is_excluded(entry.path()) {
            debug!("excluding {}", entry.path().display());
            return None;
        }

        let path = entry.into_path();
        let relative_path = path
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.clone());

        match fs::read(&path) {
            Ok(content) => Some(Ok(Document {
                path,
                relative_path,
                content,
            })),
            Err(err) => Some(Err(SkippedEntry {
                path: Some(path),
                reason: err.to_string(),
            })),
        }
    }

    fn is_excluded(&self, path: &Path) -> bool {
        !self.excluded.is_empty()
            && fs::canonicalize(path).is_ok_and(|canonical| self.excluded.contains(&canonical))
    }

    fn wants(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }

        path.extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .is_some_and(|ext| self.extensions.contains(&ext))
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does contents_first(true) do?
//    - walkdir normally yields a directory before the things inside it
//    - With contents_first, the children come first (bottom-up)
//    - We only yield files, so that alone changes nothing we can see:
//      a/b.md would still come before a/deep/x.md
//    - Sorting directories ahead of files is what makes the files of
//      a/deep/ come out before the files of a/
//
// 2. Why Result<Document, SkippedEntry> instead of Result<Document, io::Error>?
//    - A skipped entry is not a failure of the whole walk
//    - The caller logs it and keeps going, so it only needs a path and a reason
//
// 3. Why filter_map?
//    - Directories and filtered files produce nothing (None)
//    - Everything else produces exactly one item (Some)
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn relative_paths(walker: &TreeWalker) -> Vec<String> {
        walker
            .documents()
            .map(|doc| doc.unwrap().relative_path.to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_empty_tree_yields_nothing() {
        let temp = TempDir::new().unwrap();
        assert_eq!(TreeWalker::new(temp.path()).documents().count(), 0);
    }

    #[test]
    fn test_subdirectories_finish_before_parent_files() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "b.md", "");
        write(temp.path(), "a/z.md", "");
        write(temp.path(), "a/deep/x.md", "");
        write(temp.path(), "a/b.md", "");
        write(temp.path(), "c/y.md", "");

        let walker = TreeWalker::new(temp.path());
        let expected = vec!["a/deep/x.md", "a/b.md", "a/z.md", "c/y.md", "b.md"];
        assert_eq!(relative_paths(&walker), expected);
        // Walking twice gives the same order
        assert_eq!(relative_paths(&walker), expected);

        // A plain top-down walk puts a/b.md before a/deep/x.md
        let top_down: Vec<String> = WalkDir::new(temp.path())
            .sort_by_file_name()
            .into_iter()
            .map(|entry| entry.unwrap())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| {
                entry
                    .path()
                    .strip_prefix(temp.path())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        assert_eq!(top_down, vec!["a/b.md", "a/deep/x.md", "a/z.md", "b.md", "c/y.md"]);
        assert_ne!(relative_paths(&walker), top_down);
    }

    #[test]
    fn test_documents_carry_content_and_paths() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "start/guide.md", "[x](start/guide)");

        let docs: Vec<Document> = TreeWalker::new(temp.path())
            .documents()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content, b"[x](start/guide)");
        assert_eq!(docs[0].path, temp.path().join("start").join("guide.md"));
        assert_eq!(docs[0].relative_path, Path::new("start").join("guide.md"));
    }

    #[test]
    fn test_extension_filter() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a.md", "");
        write(temp.path(), "b.MD", "");
        write(temp.path(), "c.txt", "");
        write(temp.path(), "noext", "");

        let walker = TreeWalker::new(temp.path()).extensions([".md"]);
        assert_eq!(relative_paths(&walker), vec!["a.md", "b.MD"]);
    }

    #[test]
    fn test_excluded_file_is_not_yielded() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a.md", "");
        write(temp.path(), "report.csv", "");

        let walker = TreeWalker::new(temp.path())
            .exclude(&temp.path().join("report.csv"))
            .exclude(&temp.path().join("not-there.csv"));
        assert_eq!(relative_paths(&walker), vec!["a.md"]);
    }

    #[test]
    fn test_missing_root_is_a_skipped_entry() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        let items: Vec<_> = TreeWalker::new(&missing).documents().collect();
        assert_eq!(items.len(), 1);
        let skipped = items.into_iter().next().unwrap().unwrap_err();
        assert_eq!(skipped.path.as_deref(), Some(missing.as_path()));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_not_followed_by_default() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "real/a.md", "");
        std::os::unix::fs::symlink(temp.path().join("real"), temp.path().join("link")).unwrap();

        let walker = TreeWalker::new(temp.path());
        assert_eq!(relative_paths(&walker), vec!["real/a.md"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_cycle_is_reported() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a/doc.md", "");
        std::os::unix::fs::symlink(temp.path().join("a"), temp.path().join("a").join("loop")).unwrap();

        let items: Vec<_> = TreeWalker::new(temp.path()).follow_links(true).documents().collect();
        let skipped: Vec<&SkippedEntry> = items.iter().filter_map(|item| item.as_ref().err()).collect();
        let docs = items.iter().filter(|item| item.is_ok()).count();

        assert_eq!(docs, 1);
        assert_eq!(skipped.len(), 1);
        assert!(skipped[0].reason.contains("cycle"), "{}", skipped[0]);
    }
}
