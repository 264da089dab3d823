//! Mirror module: where fetched resources end up on disk
//!
//! This module handles:
//! - Mapping a final URL and content type to a relative path
//! - Creating parent directories, turning page files into directories when needed
//! - Writing resource bodies into the output directory

mod materialize;
mod path;

pub use materialize::{convert_file_to_directory, ensure_parent_directory, write_target};
pub use path::{destination_path, relative_path, resolve_in, ContentKind, Rejection};

use crate::MirrorError;
use std::path::{Path, PathBuf};

/// A resource written to the mirror
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Absolute location of the written file
    pub path: PathBuf,
    /// Page files that were turned into directories to make room
    pub converted: Vec<PathBuf>,
}

/// The output directory tree of one crawl
#[derive(Debug, Clone)]
pub struct Mirror {
    root: PathBuf,
    index_filename: String,
}

impl Mirror {
    pub fn new(root: impl Into<PathBuf>, index_filename: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            index_filename: index_filename.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `body` at the relative destination, overwriting any previous file
    ///
    /// # Arguments
    ///
    /// * `relative` - Path produced by [`destination_path`]
    /// * `body` - Raw response bytes
    pub fn store(&self, relative: &str, body: &[u8]) -> Result<StoredFile, MirrorError> {
        let destination = resolve_in(&self.root, relative);

        let converted = ensure_parent_directory(&destination, &self.root, &self.index_filename)
            .map_err(|source| MirrorError::Materialize {
                path: destination.clone(),
                source,
            })?;

        let path = write_target(&destination, &self.index_filename);
        std::fs::write(&path, body)?;

        Ok(StoredFile { path, converted })
    }
}
