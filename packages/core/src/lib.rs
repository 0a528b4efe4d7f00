//! refport-core: instruction-string parser and dispatch engine for
//! importing and exporting opaque object-reference handles.
//!
//! A single human-readable instruction string selects a backend and its
//! parameters:
//!
//! - `name_service#path/in/directory [@ directory-address]` - a
//!   hierarchical naming directory; the optional address after `@` is
//!   itself a full instruction string, resolved recursively.
//! - `file#path/to/file` - the filesystem.
//! - `exec#command` - an externally launched command (`IOR` placeholder on
//!   export; first stdout line on import).
//! - `dynamic#identifier` - a strategy registered in a [`StrategyTable`],
//!   resolved fresh per call.
//! - `server_publish#...` - a server-published well-known endpoint
//!   selected by the active [`BackendFamily`] (export only).
//! - A bare locator (`letters:` prefix, e.g. `IOR:...`) is handed to the
//!   handle codec verbatim (import only).
//!
//! The engine never touches the handle's contents and never performs I/O
//! itself; all backend access goes through the narrow collaborator traits
//! in [`traits`]. Every failure surfaces as one [`TransferError`] carrying
//! the operation, the verbatim instruction string, and a flattened cause.
//!
//! # Example
//!
//! ```rust,no_run
//! use refport_core::{BackendError, Dispatcher, HandleCodec};
//!
//! struct Codec;
//!
//! impl HandleCodec<String> for Codec {
//!     fn stringify(&self, handle: &String) -> Result<String, BackendError> {
//!         Ok(handle.clone())
//!     }
//!     fn unstringify(&self, s: &str) -> Result<Option<String>, BackendError> {
//!         Ok(Some(s.to_string()))
//!     }
//! }
//!
//! # fn main() -> Result<(), refport_core::TransferError> {
//! let engine = Dispatcher::new(Codec);
//! let handle = engine.import("IOR:010631...")?;
//! # Ok(())
//! # }
//! ```

mod dispatch;
mod error;
mod family;
mod locator;
mod parse;
mod strategy;

pub mod escape;
pub mod traits;

pub use dispatch::{Dispatcher, IOR_PLACEHOLDER};
pub use error::{FailureKind, Operation, ParseError, TransferError};
pub use family::{BackendFamily, UnknownFamily};
pub use locator::looks_like_locator;
pub use parse::{classify, strategy_identifier, NameComponent, NamingAddress, Scheme};
pub use strategy::{LoadError, Strategy, StrategyFactory, StrategyRegistry, StrategyTable};
pub use traits::{
    BackendError, DirectoryClient, FileStore, HandleCodec, ProcessLauncher, RunOutput,
    ServerPublisher,
};
