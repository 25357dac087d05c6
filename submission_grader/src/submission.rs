//! This module provides the interface between the submitted source tree and the checks.
//!
//! Every file a check touches is named relative to the submission root. Anything that
//! would resolve outside of it is refused before the filesystem is read.

use crate::error::{HarnessError, HarnessResult};
use crate::fingerprint;
use is_executable::is_executable;
use std::{
    fs,
    path::{Component, Path, PathBuf},
};

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Submission {
    root: PathBuf,
}

impl Submission {
    /// Opens the submission rooted at `root`. A root that cannot be canonicalized is a
    /// harness fault.
    pub fn open(root: impl AsRef<Path>) -> HarnessResult<Self> {
        let root = root.as_ref();
        let canonical = fs::canonicalize(root).map_err(|source| HarnessError::SubmissionRoot {
            path: root.display().to_string(),
            source,
        })?;
        if !canonical.is_dir() {
            return Err(HarnessError::SubmissionRoot {
                path: root.display().to_string(),
                source: std::io::Error::other("not a directory"),
            });
        }
        Ok(Self { root: canonical })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Joins `relative` onto the root.
    ///
    /// Absolute paths and `..` components are refused lexically. Existing paths are also
    /// canonicalized so that symlinks pointing outside of the root are refused too.
    pub fn resolve(&self, relative: &str) -> HarnessResult<PathBuf> {
        let escape = || HarnessError::PathEscape {
            path: relative.to_string(),
        };
        let rel = Path::new(relative);
        if relative.is_empty()
            || rel
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(escape());
        }

        let joined = self.root.join(rel);
        if let Ok(canonical) = fs::canonicalize(&joined) {
            if !canonical.starts_with(&self.root) {
                return Err(escape());
            }
            return Ok(canonical);
        }
        Ok(joined)
    }

    /// Whether `relative` names a regular file (or a symlink to one) inside the root.
    pub fn is_file(&self, relative: &str) -> bool {
        self.resolve(relative).is_ok_and(|p| p.is_file())
    }

    pub fn is_executable(&self, relative: &str) -> bool {
        self.resolve(relative).is_ok_and(|p| is_executable(&p))
    }

    pub fn read_to_string(&self, relative: &str) -> HarnessResult<String> {
        let path = self.resolve(relative)?;
        let bytes = fs::read(&path).map_err(|source| HarnessError::FileAccess {
            path: relative.to_string(),
            source,
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn fingerprint(&self, relative: &str) -> HarnessResult<String> {
        let path = self.resolve(relative)?;
        fingerprint::fingerprint(&path).map_err(|err| match err {
            HarnessError::FileAccess { source, .. } => HarnessError::FileAccess {
                path: relative.to_string(),
                source,
            },
            other => other,
        })
    }
}
