use crate::error::{QbindError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tempfile::NamedTempFile;

/// Persistent storage for index files, addressed by relative path
/// (e.g. `META-INF/sisu/javax.inject.Named`).
pub trait IndexStore {
    /// Reads a whole index file. A missing file is `Ok(None)`.
    fn read(&self, path: &str) -> Result<Option<String>>;

    /// Replaces an index file, creating any missing parent locations.
    fn write(&self, path: &str, contents: &str) -> Result<()>;
}

/// Index files under a target directory.
#[derive(Debug, Clone)]
pub struct FsIndexStore {
    root: PathBuf,
}

impl FsIndexStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

fn index_error(path: &Path) -> impl FnOnce(io::Error) -> QbindError + '_ {
    move |source| QbindError::Index {
        path: path.to_path_buf(),
        source,
    }
}

impl IndexStore for FsIndexStore {
    fn read(&self, path: &str) -> Result<Option<String>> {
        let file = self.resolve(path);
        match fs::read_to_string(&file) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(index_error(&file)(err)),
        }
    }

    fn write(&self, path: &str, contents: &str) -> Result<()> {
        let file = self.resolve(path);
        let parent = file.parent().unwrap_or(&self.root);
        fs::create_dir_all(parent).map_err(index_error(parent))?;

        // Write beside the destination and rename into place.
        let mut tmp = NamedTempFile::new_in(parent).map_err(index_error(parent))?;
        tmp.write_all(contents.as_bytes())
            .map_err(index_error(&file))?;
        tmp.persist(&file)
            .map_err(|err| index_error(&file)(err.error))?;
        Ok(())
    }
}

/// Volatile store, handy for dry runs.
#[derive(Debug, Default)]
pub struct MemoryIndexStore {
    files: RwLock<BTreeMap<String, String>>,
}

impl MemoryIndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> Vec<String> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

impl IndexStore for MemoryIndexStore {
    fn read(&self, path: &str) -> Result<Option<String>> {
        Ok(self
            .files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned())
    }

    fn write(&self, path: &str, contents: &str) -> Result<()> {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_string(), contents.to_string());
        Ok(())
    }
}

impl<S: IndexStore + ?Sized> IndexStore for &S {
    fn read(&self, path: &str) -> Result<Option<String>> {
        (**self).read(path)
    }

    fn write(&self, path: &str, contents: &str) -> Result<()> {
        (**self).write(path, contents)
    }
}
