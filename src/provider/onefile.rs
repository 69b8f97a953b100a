//! Single-file provider: presents exactly one host file under a chosen name.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Error;
use crate::metadata::Metadata;
use crate::path::clean;

use super::{Provider, ProviderArc, ReadSeek};

struct OneFileFs {
    host_path: PathBuf,
    name: String,
}

impl fmt::Debug for OneFileFs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OneFileFs")
            .field("host_path", &self.host_path)
            .field("name", &self.name)
            .finish()
    }
}

impl OneFileFs {
    fn entry_path(&self) -> String {
        format!("/{}", self.name)
    }

    fn file_metadata(&self) -> Result<Metadata, Error> {
        let md = fs::metadata(&self.host_path).map_err(|e| Error::from_io(e, &self.entry_path()))?;
        Ok(Metadata::from_std(self.name.clone(), &md, self.host_path.clone()))
    }
}

impl Provider for OneFileFs {
    fn open(&self, path: &str) -> Result<Box<dyn ReadSeek>, Error> {
        let p = clean(path);
        if p == self.entry_path() {
            let file = fs::File::open(&self.host_path).map_err(|e| Error::from_io(e, path))?;
            return Ok(Box::new(file));
        }
        if p == "/" {
            return Err(Error::IsADirectory(p));
        }
        Err(Error::NotFound(p))
    }

    fn lstat(&self, path: &str) -> Result<Metadata, Error> {
        let p = clean(path);
        if p == "/" {
            return Ok(Metadata::synthetic_dir("/"));
        }
        if p == self.entry_path() {
            return self.file_metadata();
        }
        Err(Error::NotFound(p))
    }

    fn read_dir(&self, path: &str) -> Result<Vec<Metadata>, Error> {
        let p = clean(path);
        if p != "/" {
            return Err(Error::NotFound(p));
        }
        Ok(vec![self.file_metadata()?])
    }

    fn describe(&self) -> String {
        format!("onefile({}:{})", self.host_path.display(), self.name)
    }
}

/// Presents the single host file `host_path` at `/<name>`.
pub fn one_file(host_path: impl AsRef<Path>, name: impl Into<String>) -> ProviderArc {
    Arc::new(OneFileFs {
        host_path: host_path.as_ref().to_path_buf(),
        name: name.into(),
    })
}

/// Like [`one_file`], but validates that `host_path` exists and is a
/// regular file before binding.
pub fn safe_one_file(host_path: impl AsRef<Path>, name: impl Into<String>) -> Result<ProviderArc, Error> {
    let host_path = host_path.as_ref();
    let md = fs::metadata(host_path).map_err(|e| Error::Config(format!("{}: {}", host_path.display(), e)))?;
    if !md.is_file() {
        return Err(Error::Config(format!("{} is not a regular file", host_path.display())));
    }
    Ok(one_file(host_path, name))
}
