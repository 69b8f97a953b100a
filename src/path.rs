//! Lexical path utilities shared by every provider and the namespace core.
//!
//! All paths here are plain `str`/`String`, slash-separated, normalized the
//! way POSIX/URI paths are: no path newtype, no host filesystem contact.

/// Lexically cleans `p`: collapses `.`, `..`, and repeated slashes, and
/// strips a trailing slash except for the root. Rooted paths (leading `/`)
/// never produce a leading `..` - it is dropped instead, since you cannot
/// walk above the root. Relative paths keep unresolvable leading `..`
/// segments. The empty path cleans to `.`.
pub fn clean(p: &str) -> String {
    if p.is_empty() {
        return ".".to_string();
    }
    let rooted = p.starts_with('/');
    let mut stack: Vec<&str> = Vec::new();
    for seg in p.split('/') {
        match seg {
            "" | "." => continue,
            ".." => {
                if matches!(stack.last(), Some(&last) if last != "..") {
                    stack.pop();
                } else if !rooted {
                    stack.push("..");
                }
                // rooted and nothing to pop: above root, drop it
            }
            s => stack.push(s),
        }
    }
    let mut out = String::new();
    if rooted {
        out.push('/');
    }
    out.push_str(&stack.join("/"));
    if out.is_empty() {
        out.push('.');
    }
    out
}

/// True iff `full == prefix`, or `prefix == "/"`, or `full` starts with
/// `prefix + "/"`. A plain byte-prefix check is not enough: `/foo` must not
/// be considered a prefix of `/foobar`.
pub fn has_path_prefix(full: &str, prefix: &str) -> bool {
    if full == prefix || prefix == "/" {
        return true;
    }
    full.len() > prefix.len() && full.starts_with(prefix) && full.as_bytes()[prefix.len()] == b'/'
}

/// Strips a single leading `/`, for providers keyed by relative paths.
pub fn filename(p: &str) -> &str {
    p.strip_prefix('/').unwrap_or(p)
}

/// Directory of `p`, following the same rule as `clean(p[..last '/'])`.
pub(crate) fn dirname(p: &str) -> String {
    match p.rfind('/') {
        None => ".".to_string(),
        Some(i) => clean(&p[..=i]),
    }
}

/// Like [`dirname`] but treats a path lacking a leading slash as rooted at
/// `/`, so relative keys (as stored by the in-memory providers) still
/// produce an absolute parent directory.
pub fn slashdir(p: &str) -> String {
    let d = dirname(p);
    if d == "." {
        return "/".to_string();
    }
    if p.starts_with('/') {
        d
    } else {
        format!("/{}", d)
    }
}

/// Re-rooted join of `dir` and `name`, cleaned.
pub fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        return clean(name);
    }
    if name.is_empty() {
        return clean(dir);
    }
    clean(&format!("{}/{}", dir, name))
}

/// Last path segment of `p`; `/` for the root.
pub fn base(p: &str) -> String {
    let c = clean(p);
    if c == "/" {
        return "/".to_string();
    }
    match c.rfind('/') {
        Some(i) => c[i + 1..].to_string(),
        None => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_collapses_dots_and_slashes() {
        assert_eq!(clean("/a//b/./c/"), "/a/b/c");
        assert_eq!(clean("/a/b/../c"), "/a/c");
        assert_eq!(clean("/../../a"), "/a");
        assert_eq!(clean(""), ".");
        assert_eq!(clean("/"), "/");
        assert_eq!(clean("a/../.."), "..");
    }

    #[test]
    fn clean_is_idempotent() {
        for p in ["/a//b/./c/", "/a/b/../c", "", "/", "a/../..", "/foo/bar"] {
            let once = clean(p);
            assert_eq!(clean(&once), once, "not idempotent for {p:?}");
        }
    }

    #[test]
    fn has_path_prefix_requires_segment_boundary() {
        assert!(has_path_prefix("/foo", "/foo"));
        assert!(has_path_prefix("/foo/bar", "/foo"));
        assert!(!has_path_prefix("/foobar", "/foo"));
        assert!(has_path_prefix("/anything", "/"));
        assert!(!has_path_prefix("/foo", "/foo/bar"));
    }

    #[test]
    fn filename_strips_one_leading_slash() {
        assert_eq!(filename("/a/b"), "a/b");
        assert_eq!(filename("a/b"), "a/b");
    }

    #[test]
    fn slashdir_roots_relative_paths() {
        assert_eq!(slashdir("a/b"), "/a");
        assert_eq!(slashdir("/a/b"), "/a");
        assert_eq!(slashdir("a"), "/");
        assert_eq!(slashdir("/a"), "/");
    }

    #[test]
    fn join_cleans_result() {
        assert_eq!(join("/a", "b"), "/a/b");
        assert_eq!(join("/", "b"), "/b");
        assert_eq!(join("/a/", "../c"), "/c");
    }

    #[test]
    fn base_of_root_is_root() {
        assert_eq!(base("/"), "/");
        assert_eq!(base("/a/b"), "b");
        assert_eq!(base("/a/b/"), "b");
    }
}
