//! In-memory content-map provider: a `path -> content` map presented as a
//! directory tree, with intermediate directories synthesized from the keys.

use std::collections::HashMap;
use std::fmt;
use std::io::Cursor;
use std::sync::Arc;

use crate::error::Error;
use crate::metadata::Metadata;
use crate::path::{base, clean, filename};

use super::{Provider, ProviderArc, ReadSeek};

pub(crate) fn synthesize_read_dir<T>(
    entries: &HashMap<String, T>,
    query: &str,
    make_leaf: impl Fn(&str, &T) -> Metadata,
) -> Result<Vec<Metadata>, Error> {
    use crate::path::{dirname, slashdir};

    let p = clean(query);
    let mut by_name: HashMap<String, Metadata> = HashMap::new();
    for (key, value) in entries {
        let full = format!("/{}", key);
        let mut dir = slashdir(key);
        let mut is_leaf = true;
        let mut seg = String::new();
        loop {
            if dir == p {
                let name = if is_leaf { base(&full) } else { seg.clone() };
                by_name
                    .entry(name.clone())
                    .or_insert_with(|| if is_leaf { make_leaf(key, value) } else { Metadata::synthetic_dir(name.clone()) });
            }
            if dir == "/" {
                break;
            }
            is_leaf = false;
            seg = base(&dir);
            dir = dirname(&dir);
        }
    }
    if by_name.is_empty() {
        return Err(Error::NotFound(p));
    }
    let mut names: Vec<String> = by_name.keys().cloned().collect();
    names.sort();
    Ok(names.into_iter().map(|n| by_name.remove(&n).unwrap()).collect())
}

struct MapFs {
    entries: HashMap<String, String>,
}

impl fmt::Debug for MapFs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapFs").field("entries", &self.entries.len()).finish()
    }
}

impl Provider for MapFs {
    fn open(&self, path: &str) -> Result<Box<dyn ReadSeek>, Error> {
        let p = clean(path);
        let key = filename(&p);
        if let Some(content) = self.entries.get(key) {
            return Ok(Box::new(Cursor::new(content.clone().into_bytes())));
        }
        match self.read_dir(&p) {
            Ok(_) => Err(Error::IsADirectory(p)),
            Err(e) => Err(e),
        }
    }

    fn lstat(&self, path: &str) -> Result<Metadata, Error> {
        let p = clean(path);
        let key = filename(&p);
        if let Some(content) = self.entries.get(key) {
            return Ok(Metadata::synthetic_file(base(&p), content.len() as u64));
        }
        self.read_dir(&p).map(|_| Metadata::synthetic_dir(base(&p)))
    }

    fn read_dir(&self, path: &str) -> Result<Vec<Metadata>, Error> {
        synthesize_read_dir(&self.entries, path, |key, content| {
            Metadata::synthetic_file(base(&format!("/{}", key)), content.len() as u64)
        })
    }

    fn describe(&self) -> String {
        format!("filemap({})", self.entries.len())
    }
}

/// Binds an in-memory `path -> content` map as a provider. Keys are stored
/// as given; unsafe variant performs no normalization, so a key with a
/// leading `/` is simply unreachable.
pub fn map(entries: HashMap<String, String>) -> ProviderArc {
    Arc::new(MapFs { entries })
}

/// Like [`map`], but strips a leading `/` from every key before storing it.
pub fn safe_map(entries: HashMap<String, String>) -> Result<ProviderArc, Error> {
    let entries = entries
        .into_iter()
        .map(|(k, v)| (filename(&k).to_string(), v))
        .collect();
    Ok(map(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn fixture() -> ProviderArc {
        map(HashMap::from([
            ("foo/bar/three.txt".to_string(), "333".to_string()),
            ("foo/bar.txt".to_string(), "22".to_string()),
            ("top.txt".to_string(), "hello world!".to_string()),
            ("other-top.txt".to_string(), "eighteen bytes!!!!".to_string()),
        ]))
    }

    #[test]
    fn root_listing_synthesizes_directories() {
        let fs_ = fixture();
        let entries = fs_.read_dir("/").unwrap();
        let names: Vec<_> = entries.iter().map(|m| m.name().to_string()).collect();
        assert_eq!(names, vec!["foo", "other-top.txt", "top.txt"]);
        assert!(entries.iter().find(|m| m.name() == "foo").unwrap().is_dir());
    }

    #[test]
    fn open_reads_stored_content() {
        let fs_ = fixture();
        let mut buf = String::new();
        fs_.open("/foo/bar/three.txt").unwrap().read_to_string(&mut buf).unwrap();
        assert_eq!(buf, "333");
    }

    #[test]
    fn lstat_reports_synthetic_directory() {
        let fs_ = fixture();
        let md = fs_.lstat("/foo").unwrap();
        assert!(md.is_dir());
        assert_eq!(md.name(), "foo");
    }

    #[test]
    fn unknown_path_is_not_found() {
        let fs_ = fixture();
        assert!(fs_.lstat("/nope").unwrap_err().is_not_found());
    }

    #[test]
    fn safe_map_strips_leading_slash() {
        let fs_ = safe_map(HashMap::from([("/a.txt".to_string(), "x".to_string())])).unwrap();
        assert!(fs_.lstat("/a.txt").is_ok());
    }
}
