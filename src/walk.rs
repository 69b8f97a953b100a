//! Lexical, depth-first directory traversal built on the namespace core's
//! `Lstat`/`ReadDir`. Does not follow symlinks (the core exposes none).

use crate::error::Error;
use crate::metadata::Metadata;
use crate::namespace::NameSpace;
use crate::path::join;

/// What the walk does next after a callback invocation.
pub enum WalkControl {
    /// Keep walking normally.
    Continue,
    /// Skip the rest of the current directory's children (only meaningful
    /// when the callback was invoked for a directory entry).
    SkipDir,
    /// Stop the walk immediately, surfacing this error to the caller.
    Abort(Error),
}

/// Walks `root` and everything beneath it in `ns`, lexical order,
/// depth-first, invoking `f` for every path visited (including `root`
/// itself). `f` receives the path, the entry's metadata on success (`None`
/// on a lookup error), and the lookup error if any.
pub fn walk(root: &str, ns: &NameSpace, f: &mut dyn FnMut(&str, Option<&Metadata>, Option<&Error>) -> WalkControl) -> Result<(), Error> {
    match ns.lstat(root) {
        Ok(md) => {
            let is_dir = md.is_dir();
            match f(root, Some(&md), None) {
                WalkControl::Abort(e) => return Err(e),
                WalkControl::SkipDir => return Ok(()),
                WalkControl::Continue => {}
            }
            if is_dir {
                walk_children(root, ns, f)?;
            }
            Ok(())
        }
        Err(e) => match f(root, None, Some(&e)) {
            WalkControl::Abort(e) => Err(e),
            WalkControl::SkipDir | WalkControl::Continue => Ok(()),
        },
    }
}

fn walk_children(dir: &str, ns: &NameSpace, f: &mut dyn FnMut(&str, Option<&Metadata>, Option<&Error>) -> WalkControl) -> Result<(), Error> {
    let entries = match ns.read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.is_not_found() => return Ok(()),
        Err(e) => return Err(e),
    };
    for entry in entries {
        let child = join(dir, entry.name());
        walk(&child, ns, f)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::BindMode;
    use crate::provider::os;
    use std::fs;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("a/one.txt"), b"1").unwrap();
        fs::write(dir.path().join("a/b/two.txt"), b"2").unwrap();
        dir
    }

    #[test]
    fn visits_every_path_in_lexical_order() {
        let dir = fixture();
        let ns = NameSpace::new();
        ns.bind("/root", os(dir.path()), "/", BindMode::Replace);

        let mut visited = Vec::new();
        walk("/root", &ns, &mut |path, _md, _err| {
            visited.push(path.to_string());
            WalkControl::Continue
        })
        .unwrap();

        assert_eq!(
            visited,
            vec!["/root", "/root/a", "/root/a/b", "/root/a/b/two.txt", "/root/a/one.txt"]
        );
    }

    #[test]
    fn skip_dir_prunes_subtree() {
        let dir = fixture();
        let ns = NameSpace::new();
        ns.bind("/root", os(dir.path()), "/", BindMode::Replace);

        let mut visited = Vec::new();
        walk("/root", &ns, &mut |path, md, _err| {
            visited.push(path.to_string());
            if path == "/root/a/b" {
                return WalkControl::SkipDir;
            }
            if md.map(|m| m.is_dir()).unwrap_or(false) {
                WalkControl::Continue
            } else {
                WalkControl::Continue
            }
        })
        .unwrap();

        assert!(!visited.iter().any(|p| p == "/root/a/b/two.txt"));
    }

    #[test]
    fn abort_stops_the_walk() {
        let dir = fixture();
        let ns = NameSpace::new();
        ns.bind("/root", os(dir.path()), "/", BindMode::Replace);

        let result = walk("/root", &ns, &mut |path, _md, _err| {
            if path == "/root/a" {
                WalkControl::Abort(Error::Config("stop here".to_string()))
            } else {
                WalkControl::Continue
            }
        });
        assert!(result.is_err());
    }
}
