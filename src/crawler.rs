//! Site source crawler

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use arrayvec::ArrayVec;

use crate::error::{Error, Result};
use crate::types::{MAX_DEPTH, MAX_FILE_SIZE, MAX_FILES, MAX_PATH_LENGTH};

/// File extensions Jekyll renders as pages
const PAGE_EXTENSIONS: [&str; 3] = ["md", "markdown", "html"];

/// Directories that never hold source pages
const SKIPPED_DIRS: [&str; 3] = ["_site", "node_modules", "vendor"];

/// Underscore directory that still holds pages
const POSTS_DIR: &str = "_posts";

/// Site crawler that maintains fixed memory bounds
#[derive(Debug)]
pub struct Crawler {
    /// Directories left to process with their depths
    queue:      Vec<(PathBuf, usize)>,
    /// Number of pages found
    file_count: usize,
    /// Total number of directories discovered
    dir_count:  usize,
}

impl Crawler {
    /// Create a new crawler starting at the given path
    ///
    /// # Errors
    /// Returns error if path length exceeds `MAX_PATH_LENGTH`
    pub fn new(start_path: &Path) -> Result<Self> {
        Self::validate_path(start_path)?;
        Ok(Self { queue: vec![(start_path.to_path_buf(), 0)], file_count: 0, dir_count: 1 })
    }

    /// Get the current progress of the crawl
    ///
    /// Returns a tuple of:
    /// - Number of pages found so far
    /// - Maximum number of pages allowed
    /// - Number of directories discovered
    #[must_use = "Progress information should be used for monitoring"]
    pub const fn progress(&self) -> (usize, usize, usize) {
        (self.file_count, MAX_FILES, self.dir_count)
    }

    /// Whether a directory entry name is crawled
    pub fn is_crawled_dir(name: &OsStr) -> bool {
        let Some(name) = name.to_str() else {
            return false;
        };
        if name.starts_with('.') || SKIPPED_DIRS.contains(&name) {
            return false;
        }
        !name.starts_with('_') || name == POSTS_DIR
    }

    /// Whether a file is a candidate page
    pub fn is_page(path: &Path) -> bool {
        let hidden = path
            .file_name()
            .and_then(OsStr::to_str)
            .is_none_or(|name| name.starts_with('.'));
        !hidden
            && path
                .extension()
                .and_then(OsStr::to_str)
                .is_some_and(|ext| PAGE_EXTENSIONS.iter().any(|p| ext.eq_ignore_ascii_case(p)))
    }

    /// Process the next directory in the queue, returning its pages in name order
    ///
    /// # Errors
    /// Returns error if:
    /// - Directory cannot be read
    /// - Page size exceeds `MAX_FILE_SIZE`
    /// - Page count exceeds `MAX_FILES`
    /// - Directory depth exceeds `MAX_DEPTH`
    pub fn process_next(&mut self) -> Result<Option<ArrayVec<PathBuf, MAX_FILES>>> {
        let Some((dir, current_depth)) = self.queue.pop() else {
            return Ok(None);
        };

        let mut entries = fs::read_dir(&dir)?.collect::<std::io::Result<Vec<_>>>()?;
        entries.sort_by_key(fs::DirEntry::file_name);

        let mut files = ArrayVec::new();
        let mut subdirs = Vec::new();

        for entry in entries {
            let path = entry.path();
            Self::validate_path(&path)?;

            if entry.file_type()?.is_dir() {
                if !Self::is_crawled_dir(&entry.file_name()) {
                    continue;
                }
                let new_depth = current_depth + 1;
                if new_depth >= MAX_DEPTH {
                    return Err(Error::DepthExceeded);
                }
                subdirs.push((path, new_depth));
                self.dir_count += 1;
            } else if Self::is_page(&path) {
                if self.file_count >= MAX_FILES {
                    return Err(Error::FileCountExceeded);
                }
                if entry.metadata()?.len() > MAX_FILE_SIZE {
                    return Err(Error::FileSizeExceeded);
                }
                files.try_push(path).map_err(|_| Error::FileCountExceeded)?;
                self.file_count += 1;
            }
        }

        // Reversed so directories pop in name order
        self.queue.extend(subdirs.into_iter().rev());

        assert!(self.file_count <= MAX_FILES, "Page count must not exceed maximum");

        Ok(Some(files))
    }

    /// Validate a path against constraints
    fn validate_path(path: &Path) -> Result<()> {
        if path.as_os_str().len() > MAX_PATH_LENGTH {
            return Err(Error::PathTooLong);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::io::Write;

    use tempfile::TempDir;

    use super::*;

    fn crawl_all(crawler: &mut Crawler) -> Vec<PathBuf> {
        let mut all = Vec::new();
        while let Some(files) = crawler.process_next().unwrap() {
            all.extend(files);
        }
        all
    }

    #[test]
    fn test_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let mut crawler = Crawler::new(temp_dir.path()).unwrap();

        let result = crawler.process_next().unwrap();
        assert!(matches!(result, Some(files) if files.is_empty()));
        assert!(crawler.process_next().unwrap().is_none());
    }

    #[test]
    fn test_only_pages_collected() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["about.md", "index.HTML", "notes.markdown", "style.css", ".draft.md", "logo.png"] {
            File::create(temp_dir.path().join(name)).unwrap();
        }

        let mut crawler = Crawler::new(temp_dir.path()).unwrap();
        let names: Vec<_> = crawl_all(&mut crawler)
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["about.md", "index.HTML", "notes.markdown"]);
        assert_eq!(crawler.progress().0, 3);
    }

    #[test]
    fn test_skipped_directories() {
        let temp_dir = TempDir::new().unwrap();
        for dir in ["_site", "_includes", ".git", "node_modules", "_posts", "docs"] {
            fs::create_dir(temp_dir.path().join(dir)).unwrap();
            File::create(temp_dir.path().join(dir).join("page.md")).unwrap();
        }

        let mut crawler = Crawler::new(temp_dir.path()).unwrap();
        let found = crawl_all(&mut crawler);
        let parents: Vec<_> = found
            .iter()
            .map(|p| p.parent().unwrap().file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(parents, ["_posts", "docs"]);

        let (_, _, dirs) = crawler.progress();
        assert_eq!(dirs, 3);
    }

    #[test]
    fn test_file_size_limit() {
        let temp_dir = TempDir::new().unwrap();
        let mut crawler = Crawler::new(temp_dir.path()).unwrap();

        let mut f = File::create(temp_dir.path().join("large.md")).unwrap();
        #[allow(clippy::cast_possible_truncation)]
        let data = vec![b'a'; (MAX_FILE_SIZE + 1) as usize];
        f.write_all(&data).unwrap();

        match crawler.process_next() {
            Err(Error::FileSizeExceeded) => (),
            other => panic!("Expected FileSizeExceeded error, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_directories() {
        const TEST_DEPTH: usize = 3;

        let temp_dir = TempDir::new().unwrap();
        let mut dir = temp_dir.path().to_path_buf();
        for i in 0..TEST_DEPTH {
            dir = dir.join(format!("dir_{i}"));
            fs::create_dir(&dir).unwrap();
            File::create(dir.join("page.md")).unwrap();
        }

        let mut crawler = Crawler::new(temp_dir.path()).unwrap();
        assert_eq!(crawl_all(&mut crawler).len(), TEST_DEPTH);

        let (files, max_files, dirs) = crawler.progress();
        assert_eq!(files, TEST_DEPTH);
        assert_eq!(max_files, MAX_FILES);
        assert_eq!(dirs, TEST_DEPTH + 1);
    }

    #[test]
    fn test_path_too_long() {
        let long = PathBuf::from("a".repeat(MAX_PATH_LENGTH + 1));
        assert!(matches!(Crawler::new(&long), Err(Error::PathTooLong)));
    }
}
