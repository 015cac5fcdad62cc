//! FileSystem trait definition

use std::io;
use std::path::Path;

/// Abstraction over the read-only file operations buildpacks need.
///
/// Reads return `std::io::Result` rather than an opaque error so callers can
/// tell a missing file (`ErrorKind::NotFound`) apart from a genuine fault.
pub trait FileSystem: Send + Sync {
    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Read file contents as string
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}
