//! Mode-override wrapper: replaces the mode bits of selected entries with
//! caller-supplied values, passing every other field (including the
//! origin-path capability) through untouched.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::Error;
use crate::metadata::{Metadata, Mode};
use crate::path::{filename, join};

use super::{Provider, ProviderArc, ReadSeek};

struct ModeMapFs {
    inner: ProviderArc,
    modes: HashMap<String, u32>,
}

impl fmt::Debug for ModeMapFs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeMapFs").field("inner", &self.inner).field("modes", &self.modes.len()).finish()
    }
}

impl ModeMapFs {
    fn overridden(&self, path: &str, md: Metadata) -> Metadata {
        match self.modes.get(filename(path)) {
            Some(bits) => md.with_mode(Mode::from_bits(*bits)),
            None => md,
        }
    }
}

impl Provider for ModeMapFs {
    fn open(&self, path: &str) -> Result<Box<dyn ReadSeek>, Error> {
        self.inner.open(path)
    }

    fn lstat(&self, path: &str) -> Result<Metadata, Error> {
        let md = self.inner.lstat(path)?;
        Ok(self.overridden(path, md))
    }

    fn stat(&self, path: &str) -> Result<Metadata, Error> {
        let md = self.inner.stat(path)?;
        Ok(self.overridden(path, md))
    }

    fn read_dir(&self, path: &str) -> Result<Vec<Metadata>, Error> {
        let entries = self.inner.read_dir(path)?;
        Ok(entries
            .into_iter()
            .map(|md| {
                let child = join(path, md.name());
                self.overridden(&child, md)
            })
            .collect())
    }

    fn describe(&self) -> String {
        format!("modemap({})", self.inner.describe())
    }
}

/// Wraps `inner`, replacing the mode bits of each path present in `modes`
/// (keyed without a leading slash) with the mapped value.
pub fn mode_map(inner: ProviderArc, modes: HashMap<String, u32>) -> ProviderArc {
    Arc::new(ModeMapFs { inner, modes })
}

/// Like [`mode_map`], but rejects any key with a leading slash.
pub fn safe_mode_map(inner: ProviderArc, modes: HashMap<String, u32>) -> Result<ProviderArc, Error> {
    if let Some(bad) = modes.keys().find(|k| k.starts_with('/')) {
        return Err(Error::Config(format!("mode-map key must not start with '/': {bad}")));
    }
    Ok(mode_map(inner, modes))
}
