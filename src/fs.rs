//! Read-only view of a directory tree that request paths cannot leave.

use std::io;
use std::path::{Component, Path, PathBuf};

use log::warn;
use tokio::fs::{self, File, ReadDir};

use crate::error::{OpenError, ServerError};

#[derive(Debug, Clone)]
pub struct Root {
    base: PathBuf,
}

impl Root {
    pub async fn new(dir: impl AsRef<Path>) -> Result<Self, ServerError> {
        let dir = dir.as_ref();
        let base = fs::canonicalize(dir)
            .await
            .map_err(|source| ServerError::InvalidRoot {
                path: dir.to_path_buf(),
                source,
            })?;
        let metadata = fs::metadata(&base)
            .await
            .map_err(|source| ServerError::InvalidRoot {
                path: dir.to_path_buf(),
                source,
            })?;
        if !metadata.is_dir() {
            return Err(ServerError::RootNotDirectory(base));
        }
        Ok(Self { base })
    }

    pub fn path(&self) -> &Path {
        &self.base
    }

    /// Opens `relative` below the root. Paths that would leave the root,
    /// lexically or through a symlink, are reported as [`OpenError::Escape`].
    pub async fn open(&self, relative: &str) -> Result<Entry, OpenError> {
        let mut path = self.base.clone();
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(part) => path.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    warn!("rejected path {:?}", relative);
                    return Err(OpenError::Escape);
                }
            }
        }

        let resolved = fs::canonicalize(&path).await?;
        if !resolved.starts_with(&self.base) {
            warn!("{:?} resolves outside the root to {}", relative, resolved.display());
            return Err(OpenError::Escape);
        }

        let file = File::open(&resolved).await?;
        Ok(Entry {
            file,
            path: resolved,
        })
    }
}

/// An opened filesystem entry, either a file or a directory.
#[derive(Debug)]
pub struct Entry {
    file: File,
    path: PathBuf,
}

impl Entry {
    pub async fn is_dir(&self) -> io::Result<bool> {
        Ok(self.file.metadata().await?.is_dir())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_file(self) -> File {
        self.file
    }

    /// Swaps the open descriptor for an enumeration handle on the same
    /// directory.
    pub async fn into_dir(self) -> io::Result<ReadDir> {
        let entries = fs::read_dir(&self.path).await?;
        drop(self.file);
        Ok(entries)
    }
}
