//! Filesystem primitives consumed by the snapshot builder and executor

use std::ffi::OsString;
use std::io;
use std::path::Path;

/// The raw filesystem operations the sync engine relies on
pub trait FileSystem {
    /// Names of the direct children of a directory, in listing order
    fn list_directory(&self, path: &Path) -> io::Result<Vec<OsString>>;

    fn is_file(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// True for a symbolic link itself, whatever it points at
    fn is_symlink(&self, path: &Path) -> bool;

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Truncate and overwrite a file
    fn write_file(&self, path: &Path, content: &[u8]) -> io::Result<()>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Remove a directory; fails if it is not empty
    fn remove_empty_dir(&self, path: &Path) -> io::Result<()>;

    /// Create a single directory; fails if it already exists
    fn create_dir(&self, path: &Path) -> io::Result<()>;

    fn copy_file(&self, src: &Path, dst: &Path) -> io::Result<()>;
}

/// `FileSystem` backed by the local disk
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn list_directory(&self, path: &Path) -> io::Result<Vec<OsString>> {
        std::fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.file_name()))
            .collect()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_symlink(&self, path: &Path) -> bool {
        std::fs::symlink_metadata(path)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn remove_empty_dir(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_dir(path)
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir(path)
    }

    fn copy_file(&self, src: &Path, dst: &Path) -> io::Result<()> {
        std::fs::copy(src, dst).map(|_| ())
    }
}
