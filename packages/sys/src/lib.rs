//! refport-sys: OS-backed collaborators for the refport engine.
//!
//! The core engine performs no I/O of its own; this crate provides the
//! default real-world implementations of its collaborator traits:
//!
//! - [`SysFiles`] - the `file#` scheme over the local filesystem.
//! - [`SysLauncher`] - the `exec#` scheme over `std::process::Command`.
//! - [`ConsoleStrategy`] - a minimal example [`refport_core::Strategy`]
//!   for the `dynamic#` scheme that writes exports to standard output.
//!
//! ```rust,no_run
//! use refport_core::{BackendError, Dispatcher, HandleCodec};
//! use refport_sys::{SysFiles, SysLauncher};
//!
//! # struct Codec;
//! # impl HandleCodec<String> for Codec {
//! #     fn stringify(&self, h: &String) -> Result<String, BackendError> { Ok(h.clone()) }
//! #     fn unstringify(&self, s: &str) -> Result<Option<String>, BackendError> {
//! #         Ok(Some(s.to_string()))
//! #     }
//! # }
//! let engine = Dispatcher::new(Codec)
//!     .with_files(SysFiles::new())
//!     .with_launcher(SysLauncher::new());
//! # let _ = engine.import("file#/tmp/server.ref");
//! ```

mod console;
mod fs;
mod proc;

pub use console::ConsoleStrategy;
pub use fs::SysFiles;
pub use proc::SysLauncher;
