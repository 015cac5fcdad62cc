use super::FileSystem;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

#[derive(Debug, Clone)]
enum MockEntry {
    File(String),
    Directory,
    Unreadable,
}

/// In-memory file system used by tests
pub struct MockFileSystem {
    files: RwLock<HashMap<PathBuf, MockEntry>>,
    root: PathBuf,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::with_root(PathBuf::from("/mock"))
    }

    pub fn with_root(root: PathBuf) -> Self {
        let fs = Self {
            files: RwLock::new(HashMap::new()),
            root,
        };
        let root = fs.root.clone();
        fs.add_dir(root);
        fs
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) {
        self.insert(path.as_ref(), MockEntry::File(content.to_string()));
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        self.insert(path.as_ref(), MockEntry::Directory);
    }

    /// Registers a file that exists but fails to read with `PermissionDenied`
    pub fn add_unreadable(&self, path: impl AsRef<Path>) {
        self.insert(path.as_ref(), MockEntry::Unreadable);
    }

    pub fn remove_file(&self, path: impl AsRef<Path>) {
        let path = self.normalize_path(path.as_ref());
        self.files.write().unwrap().remove(&path);
    }

    fn insert(&self, path: &Path, entry: MockEntry) {
        let path = self.normalize_path(path);
        let mut files = self.files.write().unwrap();

        if let Some(parent) = path.parent() {
            let mut current = PathBuf::new();
            for component in parent.components() {
                current.push(component);
                files.entry(current.clone()).or_insert(MockEntry::Directory);
            }
        }

        files.insert(path, entry);
    }

    fn normalize_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        let path = self.normalize_path(path);
        self.files.read().unwrap().contains_key(&path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        let path = self.normalize_path(path);
        matches!(
            self.files.read().unwrap().get(&path),
            Some(MockEntry::Directory)
        )
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let path = self.normalize_path(path);
        match self.files.read().unwrap().get(&path) {
            Some(MockEntry::File(content)) => Ok(content.clone()),
            Some(MockEntry::Directory) => Err(io::Error::new(
                io::ErrorKind::Other,
                format!("Not a file: {:?}", path),
            )),
            Some(MockEntry::Unreadable) => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("Permission denied: {:?}", path),
            )),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found: {:?}", path),
            )),
        }
    }
}
