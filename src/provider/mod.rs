//! The `Provider` capability every leaf filesystem and wrapper satisfies,
//! plus the factory functions that construct the leaf kinds.

mod filemap;
mod filter;
mod map;
mod modemap;
mod onefile;
mod os;

pub use filemap::{file_map, safe_file_map};
pub use filter::{exclude, filter, include, safe_exclude};
pub use map::{map, safe_map};
pub use modemap::{mode_map, safe_mode_map};
pub use onefile::{one_file, safe_one_file};
pub use os::{os, safe_os};

use std::fmt;
use std::io::{Read, Seek};
use std::sync::Arc;

use crate::error::Error;
use crate::metadata::Metadata;
use crate::namespace::NameSpace;

/// A readable, seekable, ownable stream, as returned by `Provider::open`.
pub trait ReadSeek: Read + Seek + Send {}
impl<T: Read + Seek + Send> ReadSeek for T {}

/// The read-only filesystem capability. Every leaf provider, every wrapper,
/// and the namespace core itself (which nests) implement this.
pub trait Provider: fmt::Debug + Send + Sync {
    /// Opens a regular file for reading. Fails with
    /// [`Error::IsADirectory`] if `path` names a directory.
    fn open(&self, path: &str) -> Result<Box<dyn ReadSeek>, Error>;

    /// Metadata for `path`, without following symlinks.
    fn lstat(&self, path: &str) -> Result<Metadata, Error>;

    /// Metadata for `path`. Identical to `lstat` for providers with no
    /// symlink semantics of their own.
    fn stat(&self, path: &str) -> Result<Metadata, Error> {
        self.lstat(path)
    }

    /// Lists the entries of the directory at `path`, sorted by base name.
    fn read_dir(&self, path: &str) -> Result<Vec<Metadata>, Error>;

    /// A short printable tag identifying this provider, e.g. `os(/src)`.
    fn describe(&self) -> String;

    /// Downcast to [`NameSpace`], used only by the namespace core to detect
    /// and safely terminate the self-referential root binding. Leaf
    /// providers never override this.
    fn as_namespace(&self) -> Option<&NameSpace> {
        None
    }
}

/// Reads the entire contents of the regular file at `path`.
pub fn read_file(provider: &dyn Provider, path: &str) -> Result<Vec<u8>, Error> {
    let mut reader = provider.open(path)?;
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).map_err(|e| Error::from_io(e, path))?;
    Ok(buf)
}

/// Shorthand for the trait-object handle every factory function returns.
pub type ProviderArc = Arc<dyn Provider>;
