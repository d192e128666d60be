#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # micropack
//!
//! A library for computing the minimal root filesystem a workload needs.
//!
//! Given the paths a workload touched while it ran and a reference executable
//! whose dynamic loader must always be present, micropack builds the closure
//! of those paths under symlink-following, drops pseudo-filesystems and other
//! ignored trees, keeps only the directories nothing else implies, and
//! writes the result as a tar archive ready to import as a container image.
//!
//! ## Core Types
//!
//! - [`ClosureBuilder`] and [`Closure`]: closure construction and its result
//! - [`IgnoreList`]: ignored path prefixes
//! - [`SearchPath`]: bare-name resolution
//! - [`PackConfig`] and [`ConfigBuilder`]: layered configuration
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use micropack::{ClosureBuilder, IgnoreList};
//! use micropack::probe::MemoryProbe;
//! use std::path::Path;
//!
//! let probe = MemoryProbe::new()
//!     .with_dir("/etc/ssl/certs")
//!     .with_dir("/etc")
//!     .with_file("/usr/bin/curl");
//!
//! let mut builder = ClosureBuilder::with_probe(probe, IgnoreList::default());
//! for candidate in ["/etc", "/etc/ssl/certs", "/usr/bin/curl", "/dev/null"] {
//!     builder.absorb(Path::new(candidate)).unwrap();
//! }
//!
//! let closure = builder.finalize(Path::new("/tmp"));
//! let entries: Vec<_> = closure.entries().collect();
//! assert_eq!(
//!     entries,
//!     [Path::new("/etc/ssl/certs"), Path::new("/tmp"), Path::new("/usr/bin/curl")]
//! );
//! ```

pub mod archive;
pub mod classify;
pub mod closure;
pub mod config;
pub mod elf;
pub mod error;
pub mod logging;
pub mod pack;
pub mod path;
pub mod probe;
pub mod provenance;
pub mod reduce;
pub mod search;

// Re-export key types at crate root for convenience
pub use archive::{write_archive, write_archive_file, ArchiveSummary};
pub use classify::{Classification, IgnoreList};
pub use closure::{Absorbed, ClosureBuilder};
pub use config::{ConfigBuilder, PackConfig};
pub use elf::read_interpreter;
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use pack::{PackOutcome, PackReport, Packer};
pub use path::PathRelationship;
pub use probe::{EntryKind, FilesystemProbe, MemoryProbe, SystemProbe};
pub use provenance::{OwnershipQuery, ProvenanceSummary};
pub use reduce::Closure;
pub use search::SearchPath;
