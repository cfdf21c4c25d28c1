//! Named resource loading into byte buffers

use std::io;
use std::path::{Path, PathBuf};

/// Reads a named resource into memory
pub trait ResourceLoader {
    /// Read the whole resource at `path`
    fn read_binary_file(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Loads resources from the filesystem beneath a root directory
#[derive(Debug, Clone)]
pub struct FsResourceLoader {
    root: PathBuf,
}

impl FsResourceLoader {
    /// Create a loader that resolves relative paths against `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory relative paths are resolved against
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl ResourceLoader for FsResourceLoader {
    fn read_binary_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        let full_path = self.resolve(path);
        log::trace!("Reading resource {}", full_path.display());
        std::fs::read(full_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_relative_to_root() {
        let dir = std::env::temp_dir().join(format!("gamert-loader-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("shaders")).unwrap();
        std::fs::write(dir.join("shaders/a.spv"), [3u8, 2, 0x23, 7]).unwrap();

        let loader = FsResourceLoader::new(&dir);
        let bytes = loader.read_binary_file(Path::new("shaders/a.spv")).unwrap();

        assert_eq!(bytes, vec![3, 2, 0x23, 7]);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let loader = FsResourceLoader::new("/nonexistent-root");
        let err = loader.read_binary_file(Path::new("nope.spv")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
