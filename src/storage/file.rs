use crate::storage::traits::{SessionSnapshot, SessionStorage, StorageResult};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Suffix of the file holding the frontier
const PENDING_SUFFIX: &str = ".pending.json";

/// Suffix of the file holding the visited set
const VISITED_SUFFIX: &str = ".visited.json";

/// Session storage backed by two JSON files per origin
///
/// Each file is a JSON array of URL strings, sorted so that snapshots of the
/// same state are byte-identical.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    /// Creates a store rooted at `dir`, creating the directory if needed
    pub fn new(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the frontier file for an origin key
    pub fn pending_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}{}", key, PENDING_SUFFIX))
    }

    /// Path of the visited-set file for an origin key
    pub fn visited_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}{}", key, VISITED_SUFFIX))
    }
}

impl SessionStorage for FileSessionStore {
    fn load(&self, key: &str) -> StorageResult<Option<SessionSnapshot>> {
        let Some(pending) = read_url_set(&self.pending_path(key))? else {
            return Ok(None);
        };
        let Some(visited) = read_url_set(&self.visited_path(key))? else {
            return Ok(None);
        };
        Ok(Some(SessionSnapshot { pending, visited }))
    }

    fn save(&self, key: &str, snapshot: &SessionSnapshot) -> StorageResult<()> {
        write_url_set(&self.pending_path(key), &snapshot.pending)?;
        write_url_set(&self.visited_path(key), &snapshot.visited)?;
        tracing::debug!(
            "Saved session {} ({} pending, {} visited)",
            key,
            snapshot.pending.len(),
            snapshot.visited.len()
        );
        Ok(())
    }
}

/// Reads a URL set; `Ok(None)` if the file does not exist
fn read_url_set(path: &Path) -> StorageResult<Option<HashSet<String>>> {
    let content = match fs::read(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let urls: Vec<String> = serde_json::from_slice(&content)?;
    Ok(Some(urls.into_iter().collect()))
}

/// Writes a URL set through a temporary sibling so readers never see a partial file
fn write_url_set(path: &Path, urls: &HashSet<String>) -> StorageResult<()> {
    let mut sorted: Vec<&String> = urls.iter().collect();
    sorted.sort();

    let content = serde_json::to_vec_pretty(&sorted)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
