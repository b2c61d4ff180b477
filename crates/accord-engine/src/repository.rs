//! Mapping stored file names to paths in the content-addressed repository.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Resolves a stored file name within a repository area.
///
/// Implementations need not be thread-safe; callers share one through
/// [`SharedRepository`].
pub trait Repository: Send {
    fn path_for(&mut self, area: &str, name: &str) -> Option<PathBuf>;
}

/// Repository on a local filesystem.
///
/// Files live at `root/area/aa/bb/cc/name`, where `aa`, `bb`, `cc` are the
/// first six characters of the lowercased name.
#[derive(Debug, Clone)]
pub struct FsRepository {
    root: PathBuf,
}

impl FsRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Repository for FsRepository {
    fn path_for(&mut self, area: &str, name: &str) -> Option<PathBuf> {
        if self.root.as_os_str().is_empty() || area.is_empty() || !name.is_ascii() || name.len() < 6 {
            return None;
        }
        let name = name.to_ascii_lowercase();
        Some(
            self.root
                .join(area)
                .join(&name[0..2])
                .join(&name[2..4])
                .join(&name[4..6])
                .join(&name),
        )
    }
}

/// A repository used by many workers, one resolution at a time.
#[derive(Debug)]
pub struct SharedRepository<R> {
    inner: Mutex<R>,
}

impl<R: Repository> SharedRepository<R> {
    pub const fn new(repository: R) -> Self {
        Self {
            inner: Mutex::new(repository),
        }
    }

    pub fn resolve(&self, area: &str, name: &str) -> Option<PathBuf> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .path_for(area, name)
    }
}
