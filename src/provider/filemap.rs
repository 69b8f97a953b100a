//! Host-file map provider: a `path -> host file path` map presented as a
//! directory tree, structurally identical to the content-map provider
//! except that leaves are lazy handles to real host files.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::Error;
use crate::metadata::Metadata;
use crate::path::{base, clean, filename};

use super::map::synthesize_read_dir;
use super::{Provider, ProviderArc, ReadSeek};

struct FileMapFs {
    entries: HashMap<String, PathBuf>,
}

impl fmt::Debug for FileMapFs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileMapFs").field("entries", &self.entries.len()).finish()
    }
}

impl FileMapFs {
    fn leaf_metadata(&self, key: &str, host: &PathBuf) -> Result<Metadata, Error> {
        let md = fs::metadata(host).map_err(|e| Error::from_io(e, key))?;
        Ok(Metadata::from_std(base(&format!("/{}", key)), &md, host.clone()))
    }
}

impl Provider for FileMapFs {
    fn open(&self, path: &str) -> Result<Box<dyn ReadSeek>, Error> {
        let p = clean(path);
        let key = filename(&p);
        if let Some(host) = self.entries.get(key) {
            let file = fs::File::open(host).map_err(|e| Error::from_io(e, path))?;
            return Ok(Box::new(file));
        }
        match self.read_dir(&p) {
            Ok(_) => Err(Error::IsADirectory(p)),
            Err(e) => Err(e),
        }
    }

    fn lstat(&self, path: &str) -> Result<Metadata, Error> {
        let p = clean(path);
        let key = filename(&p);
        if let Some(host) = self.entries.get(key) {
            return self.leaf_metadata(key, host);
        }
        self.read_dir(&p).map(|_| Metadata::synthetic_dir(base(&p)))
    }

    fn read_dir(&self, path: &str) -> Result<Vec<Metadata>, Error> {
        synthesize_read_dir(&self.entries, path, |key, host| {
            self.leaf_metadata(key, host).unwrap_or_else(|_| Metadata::synthetic_file(base(&format!("/{}", key)), 0))
        })
    }

    fn describe(&self) -> String {
        format!("filemap({})", self.entries.len())
    }
}

/// Binds an in-memory `path -> host file` map as a provider.
pub fn file_map(entries: HashMap<String, PathBuf>) -> ProviderArc {
    Arc::new(FileMapFs { entries })
}

/// Like [`file_map`], additionally checking every referenced host file
/// exists before binding.
pub fn safe_file_map(entries: HashMap<String, PathBuf>) -> Result<ProviderArc, Error> {
    for (key, host) in &entries {
        if !host.exists() {
            return Err(Error::Config(format!("{}: {} does not exist", key, host.display())));
        }
    }
    Ok(file_map(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn open_reads_host_file_content() {
        let dir = tempfile::tempdir().unwrap();
        let host = dir.path().join("payload.bin");
        fs::write(&host, b"content").unwrap();

        let fs_ = file_map(HashMap::from([("renamed.bin".to_string(), host)]));
        let mut buf = String::new();
        fs_.open("/renamed.bin").unwrap().read_to_string(&mut buf).unwrap();
        assert_eq!(buf, "content");
    }

    #[test]
    fn lstat_renames_base_name() {
        let dir = tempfile::tempdir().unwrap();
        let host = dir.path().join("original.bin");
        fs::write(&host, b"x").unwrap();

        let fs_ = file_map(HashMap::from([("a/renamed.bin".to_string(), host.clone())]));
        let md = fs_.lstat("/a/renamed.bin").unwrap();
        assert_eq!(md.name(), "renamed.bin");
        assert_eq!(md.origin_path(), Some(host.as_path()));
    }

    #[test]
    fn safe_file_map_rejects_missing_host_file() {
        let entries = HashMap::from([("a".to_string(), PathBuf::from("/does/not/exist"))]);
        assert!(safe_file_map(entries).is_err());
    }
}
