//! Directory entry metadata returned by every provider.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A single bit, folded in with the permission bits, marking a directory.
/// Mirrors Go's `os.FileMode`, which packs its type bits and permission
/// bits into one integer; we reserve one high bit here instead of the
/// whole high byte Go uses, since we only need directory-vs-file.
const DIR_BIT: u32 = 1 << 31;

/// Mode bits: permission bits plus a directory flag, folded into one `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mode(u32);

impl Mode {
    /// A directory with the given permission bits.
    pub fn dir(perm: u32) -> Mode {
        Mode((perm & !DIR_BIT) | DIR_BIT)
    }

    /// A regular file with the given permission bits.
    pub fn file(perm: u32) -> Mode {
        Mode(perm & !DIR_BIT)
    }

    /// Raw bits, as given to or returned from a mode-override map. Replacing
    /// a mode wholesale with externally supplied bits (as the mode-override
    /// wrapper does) can clear the directory flag if the caller's bits
    /// don't set it - that mirrors the source faithfully.
    pub fn from_bits(bits: u32) -> Mode {
        Mode(bits)
    }

    /// The raw bits, directory flag included.
    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Whether the directory flag is set.
    pub fn is_dir(&self) -> bool {
        self.0 & DIR_BIT != 0
    }

    /// Whether the directory flag is unset.
    pub fn is_file(&self) -> bool {
        !self.is_dir()
    }
}

/// A directory entry: name, size, mode, modification time, and an optional
/// origin path for providers backed by the host filesystem.
#[derive(Debug, Clone)]
pub struct Metadata {
    name: String,
    size: u64,
    mode: Mode,
    modified: SystemTime,
    origin: Option<PathBuf>,
}

impl Metadata {
    /// Builds metadata directly from its fields, with no origin path.
    pub fn new(name: impl Into<String>, size: u64, mode: Mode, modified: SystemTime) -> Metadata {
        Metadata {
            name: name.into(),
            size,
            mode,
            modified,
            origin: None,
        }
    }

    /// A synthetic directory entry with zero size and zero mod-time, as
    /// produced whenever the namespace surfaces an implicit intermediate
    /// directory rather than a real provider entry.
    pub fn synthetic_dir(name: impl Into<String>) -> Metadata {
        Metadata::new(name, 0, Mode::dir(0o755), SystemTime::UNIX_EPOCH)
    }

    /// A synthetic regular-file entry, as returned by the in-memory
    /// content-map provider for a known key.
    pub fn synthetic_file(name: impl Into<String>, size: u64) -> Metadata {
        Metadata::new(name, size, Mode::file(0o444), SystemTime::UNIX_EPOCH)
    }

    /// Builds metadata from a host `std::fs::Metadata`, tagging the origin
    /// path so callers can bypass the VFS for OS-level operations.
    pub fn from_std(name: impl Into<String>, md: &fs::Metadata, origin: impl Into<PathBuf>) -> Metadata {
        let perm = perm_bits(md);
        let mode = if md.is_dir() { Mode::dir(perm) } else { Mode::file(perm) };
        Metadata {
            name: name.into(),
            size: md.len(),
            mode,
            modified: md.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            origin: Some(origin.into()),
        }
    }

    /// Same data with the base name replaced - used when a host file is
    /// presented under a different VFS-facing name.
    pub fn renamed(&self, name: impl Into<String>) -> Metadata {
        Metadata {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Same data with the mode replaced wholesale - used by the
    /// mode-override wrapper. Every other field, including the origin path,
    /// passes through untouched.
    pub fn with_mode(&self, mode: Mode) -> Metadata {
        Metadata { mode, ..self.clone() }
    }

    /// Base name of the entry.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size in bytes; meaningless (and conventionally zero) for directories.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Mode bits, directory flag included.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Shorthand for `mode().is_dir()`.
    pub fn is_dir(&self) -> bool {
        self.mode.is_dir()
    }

    /// Last modification time; zero-valued (`UNIX_EPOCH`) is acceptable for
    /// synthetic entries.
    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    /// The origin-path capability: the concrete host path backing this
    /// entry, when the provider that produced it offers one.
    pub fn origin_path(&self) -> Option<&Path> {
        self.origin.as_deref()
    }
}

#[cfg(unix)]
fn perm_bits(md: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    md.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn perm_bits(md: &fs::Metadata) -> u32 {
    if md.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}
