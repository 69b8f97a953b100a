#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

//! # nsfs
//!
//! A read-only virtual filesystem library that composes heterogeneous file
//! providers into a single merged tree, in the spirit of Plan 9's
//! per-process name spaces.
//!
//! ## Features
//!
//! - An OS-rooted directory provider, an in-memory content map, a
//!   host-file map, and a single-renamed-file provider
//! - Path-exclude/include and mode-override wrapper providers
//! - Plan 9-style binding (`Before`, `After`, `Replace`) at arbitrary mount
//!   points, with deterministic merged lookups and directory listings
//! - A namespace is itself a provider, so namespaces nest
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use nsfs::{NameSpace, BindMode, provider};
//!
//! # fn main() -> Result<(), nsfs::Error> {
//! let ns = NameSpace::new();
//! ns.bind("/src", provider::safe_os("/usr/local/src")?, "/", BindMode::Replace);
//!
//! for entry in ns.read_dir("/src")? {
//!     println!("{}", entry.name());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Bind modes
//!
//! - `Replace`: truncates the mount point's stack, then installs this binding
//! - `Before`: tried before any binding already at this mount point
//! - `After`: tried after any binding already at this mount point

/// Path-cleaning and prefix-matching utilities shared by every provider.
pub mod path;

/// The typed error kind returned throughout the crate.
pub mod error;

/// Directory entry metadata.
pub mod metadata;

/// The `Provider` capability and the leaf/wrapper provider constructors.
pub mod provider;

/// The namespace core: mount-point bindings and the merged-lookup engine.
pub mod namespace;

/// The lexical, depth-first directory walker.
pub mod walk;

pub use error::Error;
pub use metadata::{Metadata, Mode};
pub use namespace::{BindMode, NameSpace};
pub use provider::Provider;
pub use walk::{walk as walk_tree, WalkControl};
