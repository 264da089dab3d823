//! Directory creation for mirrored files
//!
//! A URL can be both a page and the path prefix of other pages
//! (`/guide.v1` saved as a file, then `/guide.v1/setup` discovered). A
//! filesystem path cannot be a file and a directory at once, so when a
//! directory is needed where a page file already sits, the file is turned
//! into a directory and the page moves inside it under the index file name.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Creates all missing ancestors of `path`
///
/// When an ancestor already exists as a plain file, every file-shaped
/// ancestor between `path` and `root` (exclusive) is converted into a
/// directory holding the former file as `index_filename`. Creation is then
/// retried and its error returned.
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - The ancestors that were converted (usually none)
/// * `Err(io::Error)` - A directory could not be created
pub fn ensure_parent_directory(
    path: &Path,
    root: &Path,
    index_filename: &str,
) -> io::Result<Vec<PathBuf>> {
    let Some(parent) = path.parent() else {
        return Ok(Vec::new());
    };

    match fs::create_dir_all(parent) {
        Ok(()) => return Ok(Vec::new()),
        Err(e) => {
            tracing::debug!(
                "Creating {} failed ({}), looking for page files in the way",
                parent.display(),
                e
            );
        }
    }

    let mut converted = Vec::new();
    for ancestor in path.ancestors().skip(1) {
        if ancestor == root || !ancestor.starts_with(root) {
            break;
        }
        if ancestor.is_file() {
            convert_file_to_directory(ancestor, index_filename)?;
            converted.push(ancestor.to_path_buf());
        }
    }

    fs::create_dir_all(parent)?;
    Ok(converted)
}

/// Turns the file at `path` into a directory containing it as `index_filename`
///
/// The file is first renamed to a hidden sibling, then the directory is
/// created and the file moved in. If the directory cannot be created the
/// file is put back.
pub fn convert_file_to_directory(path: &Path, index_filename: &str) -> io::Result<()> {
    tracing::info!("Converting {} to a directory", path.display());

    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} has no file name", path.display()),
        )
    })?;
    let parked = path.with_file_name(format!(".{}.converting", file_name.to_string_lossy()));

    fs::rename(path, &parked)?;

    if let Err(e) = fs::create_dir(path) {
        if let Err(restore) = fs::rename(&parked, path) {
            tracing::warn!(
                "Could not restore {} from {}: {}",
                path.display(),
                parked.display(),
                restore
            );
        }
        return Err(e);
    }

    fs::rename(&parked, path.join(index_filename.trim_start_matches('/')))
}

/// Picks the file to write for a destination path
///
/// A destination that was converted into a directory earlier in the crawl
/// keeps its page content in the index file inside it.
pub fn write_target(destination: &Path, index_filename: &str) -> PathBuf {
    if destination.is_dir() {
        destination.join(index_filename)
    } else {
        destination.to_path_buf()
    }
}
