//! Provider rooted at a host directory.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Error;
use crate::metadata::Metadata;
use crate::path::{base, clean};

use super::{Provider, ProviderArc, ReadSeek};

struct OsFs {
    root: PathBuf,
}

impl fmt::Debug for OsFs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OsFs").field("root", &self.root).finish()
    }
}

impl OsFs {
    fn resolve(&self, path: &str) -> PathBuf {
        // Rooting the path before cleaning is what prevents `..` escape:
        // any `..` cancels inside the absolute form instead of walking
        // above `/`.
        let cleaned = clean(&format!("/{}", path));
        self.root.join(cleaned.strip_prefix('/').unwrap_or(&cleaned))
    }
}

impl Provider for OsFs {
    fn open(&self, path: &str) -> Result<Box<dyn ReadSeek>, Error> {
        let host = self.resolve(path);
        let file = fs::File::open(&host).map_err(|e| Error::from_io(e, path))?;
        let md = file.metadata().map_err(|e| Error::from_io(e, path))?;
        if md.is_dir() {
            return Err(Error::IsADirectory(path.to_string()));
        }
        Ok(Box::new(file))
    }

    fn lstat(&self, path: &str) -> Result<Metadata, Error> {
        let host = self.resolve(path);
        let md = fs::symlink_metadata(&host).map_err(|e| Error::from_io(e, path))?;
        Ok(Metadata::from_std(base(path), &md, host))
    }

    fn stat(&self, path: &str) -> Result<Metadata, Error> {
        let host = self.resolve(path);
        let md = fs::metadata(&host).map_err(|e| Error::from_io(e, path))?;
        Ok(Metadata::from_std(base(path), &md, host))
    }

    fn read_dir(&self, path: &str) -> Result<Vec<Metadata>, Error> {
        let host = self.resolve(path);
        let mut entries = Vec::new();
        for entry in fs::read_dir(&host).map_err(|e| Error::from_io(e, path))? {
            let entry = entry.map_err(|e| Error::from_io(e, path))?;
            let md = entry.metadata().map_err(|e| Error::from_io(e, path))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            entries.push(Metadata::from_std(name, &md, entry.path()));
        }
        entries.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(entries)
    }

    fn describe(&self) -> String {
        format!("os({})", self.root.display())
    }
}

/// Binds a provider rooted at the host directory `root`, without validating
/// that it exists.
pub fn os(root: impl AsRef<Path>) -> ProviderArc {
    Arc::new(OsFs {
        root: root.as_ref().to_path_buf(),
    })
}

/// Like [`os`], but validates that `root` exists and is a directory before
/// constructing the provider.
pub fn safe_os(root: impl AsRef<Path>) -> Result<ProviderArc, Error> {
    let root = root.as_ref();
    let md = fs::metadata(root).map_err(|e| Error::Config(format!("{}: {}", root.display(), e)))?;
    if !md.is_dir() {
        return Err(Error::Config(format!("{} is not a directory", root.display())));
    }
    Ok(os(root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/file.txt"), b"hello").unwrap();
        dir
    }

    #[test]
    fn open_reads_file_content() {
        let dir = fixture();
        let fs_ = os(dir.path());
        let mut buf = String::new();
        fs_.open("/sub/file.txt").unwrap().read_to_string(&mut buf).unwrap();
        assert_eq!(buf, "hello");
    }

    #[test]
    fn open_on_directory_fails() {
        let dir = fixture();
        let fs_ = os(dir.path());
        match fs_.open("/sub") {
            Err(Error::IsADirectory(_)) => {}
            other => panic!("expected IsADirectory, got {other:?}"),
        }
    }

    #[test]
    fn dotdot_cannot_escape_root() {
        let dir = fixture();
        let fs_ = os(dir.path());
        assert!(fs_.lstat("/../../../etc/passwd").is_err());
    }

    #[test]
    fn read_dir_is_sorted_and_has_origin_path() {
        let dir = fixture();
        let fs_ = os(dir.path());
        let entries = fs_.read_dir("/").unwrap();
        assert_eq!(entries[0].name(), "sub");
        assert!(entries[0].origin_path().is_some());
    }

    #[test]
    fn safe_os_rejects_missing_root() {
        assert!(safe_os("/definitely/does/not/exist").is_err());
    }
}
