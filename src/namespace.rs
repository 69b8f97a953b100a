//! The namespace core: a mapping from mount point to an ordered stack of
//! bindings, and the `resolve` routine every public operation is built on.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::io;
use std::sync::{Arc, RwLock};

use log::{debug, trace};

use crate::error::Error;
use crate::metadata::Metadata;
use crate::path::{base, clean, has_path_prefix, join};
use crate::provider::{Provider, ProviderArc, ReadSeek};

/// How a binding is inserted into a mount point's stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindMode {
    /// Prepend to the stack: tried before any existing binding.
    Before,
    /// Append to the stack: tried after any existing binding.
    After,
    /// Truncate the stack, then insert as its only member.
    Replace,
}

#[derive(Clone, Debug)]
struct Binding {
    provider: ProviderArc,
    subpath: String,
    mode: BindMode,
}

enum Candidate {
    Real(ProviderArc, String),
    /// Stands in for a directory that exists only because some deeper mount
    /// or the self-referential root binding implies it - never dispatched
    /// to a real provider.
    Synthetic,
}

/// A mount-point to binding-stack mapping, itself a [`Provider`] so
/// namespaces can nest.
#[derive(Clone)]
pub struct NameSpace {
    bindings: Arc<RwLock<BTreeMap<String, Vec<Binding>>>>,
}

impl fmt::Debug for NameSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameSpace")
            .field("mounts", &self.bindings.read().unwrap().len())
            .finish()
    }
}

impl Default for NameSpace {
    fn default() -> Self {
        NameSpace::empty()
    }
}

impl NameSpace {
    /// An empty namespace: no mount points at all, not even `/`.
    /// `Stat("/")` on this fails with not-found until something is bound.
    pub fn empty() -> NameSpace {
        NameSpace {
            bindings: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// A namespace with one additional implicit binding at `/`, whose
    /// provider is the namespace itself. This is what makes `Stat("/")`
    /// succeed on an otherwise empty namespace.
    pub fn new() -> NameSpace {
        let ns = NameSpace::empty();
        ns.bind("/", Arc::new(ns.clone()), "/", BindMode::Replace);
        ns
    }

    /// Appends, prepends, or replaces a binding at `mount_point` per `mode`.
    pub fn bind(&self, mount_point: &str, provider: ProviderArc, subpath: &str, mode: BindMode) {
        let mount_point = clean(mount_point);
        let subpath = clean(subpath);
        debug!("bind {mount_point} <- {} {subpath} ({mode:?})", provider.describe());
        let binding = Binding { provider, subpath, mode };
        let mut map = self.bindings.write().unwrap();
        let stack = map.entry(mount_point).or_default();
        match mode {
            BindMode::Before => stack.insert(0, binding),
            BindMode::After => stack.push(binding),
            BindMode::Replace => {
                stack.clear();
                stack.push(binding);
            }
        }
    }

    /// Like [`NameSpace::bind`], but takes the fallible result of a "safe"
    /// constructor and only binds on success.
    pub fn bind_safe(&self, mount_point: &str, provider: Result<ProviderArc, Error>, subpath: &str, mode: BindMode) -> Result<(), Error> {
        self.bind(mount_point, provider?, subpath, mode);
        Ok(())
    }

    fn is_self(&self, provider: &ProviderArc) -> bool {
        match provider.as_namespace() {
            Some(inner) => Arc::ptr_eq(&inner.bindings, &self.bindings),
            None => false,
        }
    }

    fn tail_of(p: &str, m: &str) -> String {
        if p == m {
            return "/".to_string();
        }
        let suffix = &p[m.len()..];
        if suffix.starts_with('/') {
            suffix.to_string()
        } else {
            format!("/{suffix}")
        }
    }

    /// The ordered list of candidates for `p`, per the longest-prefix
    /// search plus the synthetic intermediate-directory supplement. Empty
    /// iff no mount point's key is a prefix of `p` at all.
    fn resolve(&self, p: &str) -> Vec<Candidate> {
        trace!("resolve {p}");
        let map = self.bindings.read().unwrap();
        let best = map.keys().filter(|m| has_path_prefix(p, m)).max_by_key(|m| m.len());
        let Some(m) = best else {
            return Vec::new();
        };
        let tail = Self::tail_of(p, m);
        let stack = map[m].clone();

        let mut candidates = Vec::with_capacity(stack.len() + 1);
        for b in &stack {
            if self.is_self(&b.provider) {
                // The self-loop never contributes real entries; it only
                // answers for its own mount point (tail == "/"), acting as
                // the synthetic root-directory marker. Following it as a
                // real provider call would recurse into this same method
                // forever.
                if tail == "/" {
                    candidates.push(Candidate::Synthetic);
                }
            } else {
                candidates.push(Candidate::Real(b.provider.clone(), join(&b.subpath, &tail)));
            }
        }

        if map.keys().any(|m2| m2 != p && has_path_prefix(m2, p)) {
            candidates.push(Candidate::Synthetic);
        }
        candidates
    }

    /// Every name a direct or deeper-nested mount point implies as a child
    /// of `p`: for `m'` a strict descendant of `p`, the first path segment
    /// of `m'` past `p`. This is what surfaces an implicit intermediate
    /// mount in a directory listing (a bind at `/1/2/3` makes `ReadDir("/1")`
    /// list `2`, not `2/3`).
    fn implied_children(&self, p: &str) -> Vec<String> {
        let map = self.bindings.read().unwrap();
        let mut names = std::collections::BTreeSet::new();
        for m in map.keys() {
            if m == p || !has_path_prefix(m, p) {
                continue;
            }
            let remainder = if p == "/" { &m[1..] } else { &m[p.len() + 1..] };
            if let Some(seg) = remainder.split('/').next() {
                if !seg.is_empty() {
                    names.insert(seg.to_string());
                }
            }
        }
        names.into_iter().collect()
    }

    /// Metadata for `path`, without following symlinks.
    pub fn lstat(&self, path: &str) -> Result<Metadata, Error> {
        let p = clean(path);
        let mut saw_synthetic = false;
        for c in self.resolve(&p) {
            match c {
                Candidate::Synthetic => saw_synthetic = true,
                Candidate::Real(provider, translated) => match provider.lstat(&translated) {
                    Ok(md) => return Ok(md),
                    Err(e) if e.is_not_found() => continue,
                    Err(e) => return Err(e),
                },
            }
        }
        if saw_synthetic {
            return Ok(Metadata::synthetic_dir(base(&p)));
        }
        Err(Error::NotFound(p))
    }

    /// Metadata for `path`. Identical to [`NameSpace::lstat`]: the core
    /// makes no symlink distinction of its own.
    pub fn stat(&self, path: &str) -> Result<Metadata, Error> {
        self.lstat(path)
    }

    /// Opens the regular file at `path`, trying candidates in order.
    pub fn open(&self, path: &str) -> Result<Box<dyn ReadSeek>, Error> {
        let p = clean(path);
        for c in self.resolve(&p) {
            if let Candidate::Real(provider, translated) = c {
                match provider.open(&translated) {
                    Ok(r) => return Ok(r),
                    Err(Error::IsADirectory(_)) => continue,
                    Err(e) if e.is_not_found() => continue,
                    Err(e) => return Err(e),
                }
            }
        }
        Err(Error::NotFound(p))
    }

    /// Unions the directory listing for `path` across every matching
    /// candidate, first-wins on duplicate names, sorted ascending.
    pub fn read_dir(&self, path: &str) -> Result<Vec<Metadata>, Error> {
        let p = clean(path);
        let mut by_name: HashMap<String, Metadata> = HashMap::new();
        for c in self.resolve(&p) {
            if let Candidate::Real(provider, translated) = c {
                match provider.read_dir(&translated) {
                    Ok(entries) => {
                        for md in entries {
                            by_name.entry(md.name().to_string()).or_insert(md);
                        }
                    }
                    Err(e) if e.is_not_found() => {}
                    Err(e) => return Err(e),
                }
            }
        }
        for name in self.implied_children(&p) {
            by_name.entry(name.clone()).or_insert_with(|| Metadata::synthetic_dir(name));
        }
        if by_name.is_empty() {
            return Err(Error::NotFound(p));
        }
        let mut names: Vec<String> = by_name.keys().cloned().collect();
        names.sort();
        Ok(names.into_iter().map(|n| by_name.remove(&n).unwrap()).collect())
    }

    /// Writes the bind table: mount points in lexical order, each stack in
    /// insertion order, as `<describe()> <subpath>`.
    pub fn fprint<W: io::Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w, "name space {{")?;
        for (mount, stack) in self.bindings.read().unwrap().iter() {
            writeln!(w, "    {mount}:")?;
            for b in stack {
                writeln!(w, "        {} {}", b.provider.describe(), b.subpath)?;
            }
        }
        writeln!(w, "}}")
    }
}

impl fmt::Display for NameSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::new();
        self.fprint(&mut buf).map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&buf))
    }
}

impl Provider for NameSpace {
    fn open(&self, path: &str) -> Result<Box<dyn ReadSeek>, Error> {
        NameSpace::open(self, path)
    }

    fn lstat(&self, path: &str) -> Result<Metadata, Error> {
        NameSpace::lstat(self, path)
    }

    fn stat(&self, path: &str) -> Result<Metadata, Error> {
        NameSpace::stat(self, path)
    }

    fn read_dir(&self, path: &str) -> Result<Vec<Metadata>, Error> {
        NameSpace::read_dir(self, path)
    }

    fn describe(&self) -> String {
        "ns /".to_string()
    }

    fn as_namespace(&self) -> Option<&NameSpace> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{map, one_file, os};
    use std::collections::HashMap;
    use std::fs;
    use std::io::Read;

    fn write_tree(root: &std::path::Path, rel: &str, content: &[u8]) {
        let full = root.join(rel);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }

    #[test]
    fn bare_namespace_root_stat_is_not_found() {
        let ns = NameSpace::empty();
        ns.bind("/fs1", map(HashMap::new()), "/", BindMode::Replace);
        assert!(ns.stat("/").unwrap_err().is_not_found());
    }

    #[test]
    fn fresh_namespace_root_stat_succeeds() {
        let ns = NameSpace::new();
        ns.bind("/fs1", map(HashMap::new()), "/", BindMode::Replace);
        let md = ns.stat("/").unwrap();
        assert!(md.is_dir());
        assert_eq!(md.name(), "/");
        assert_eq!(md.modified(), std::time::SystemTime::UNIX_EPOCH);
    }

    #[test]
    fn merged_dogs() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("A");
        let b = dir.path().join("B");
        let c = dir.path().join("C");
        write_tree(&a, "animals/dogs/dogs", b"A-dogs-content");
        write_tree(&a, "animals/dogs/A-dogs", b"only in A");
        write_tree(&b, "animals/dogs/dogs", b"B-dogs-content");
        write_tree(&b, "animals/dogs/B-dogs", b"only in B");
        write_tree(&c, "animals/cats/cats", b"fake dog content");

        let ns = NameSpace::new();
        ns.bind("/dogs", os(a.join("animals/dogs")), "/", BindMode::After);
        ns.bind("/dogs", os(b.join("animals/dogs")), "/", BindMode::After);
        ns.bind("/dogs", one_file(c.join("animals/cats/cats"), "fake-dog"), "/", BindMode::Before);

        let entries = ns.read_dir("/dogs").unwrap();
        let names: Vec<_> = entries.iter().map(|m| m.name().to_string()).collect();
        assert_eq!(names, vec!["A-dogs", "B-dogs", "dogs", "fake-dog"]);

        let mut buf = String::new();
        ns.open("/dogs/dogs").unwrap().read_to_string(&mut buf).unwrap();
        assert_eq!(buf, "A-dogs-content");
    }

    #[test]
    fn intermediate_directories_are_synthesized() {
        let dir = tempfile::tempdir().unwrap();
        let host = dir.path().join("payload");
        fs::write(&host, b"x").unwrap();

        let ns = NameSpace::new();
        ns.bind("/1/2/3/4/5/6", one_file(&host, "fake-dog1"), "/", BindMode::Before);

        assert!(ns.stat("/1/2/3").unwrap().is_dir());
        let entries = ns.read_dir("/1").unwrap();
        assert_eq!(entries.iter().map(|m| m.name().to_string()).collect::<Vec<_>>(), vec!["2"]);
        assert!(ns.stat("/1/3").unwrap_err().is_not_found());
        assert!(ns.stat("/2").unwrap_err().is_not_found());
    }

    #[test]
    fn bind_replace_truncates_stack() {
        let ns = NameSpace::new();
        ns.bind("/x", map(HashMap::from([("a".to_string(), "1".to_string())])), "/", BindMode::After);
        ns.bind(
            "/x",
            map(HashMap::from([("b".to_string(), "2".to_string())])),
            "/",
            BindMode::Replace,
        );
        let entries = ns.read_dir("/x").unwrap();
        assert_eq!(entries.iter().map(|m| m.name().to_string()).collect::<Vec<_>>(), vec!["b"]);
    }
}
