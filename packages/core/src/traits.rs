//! Collaborator interfaces the engine depends on.
//!
//! The engine never performs I/O itself; each backend concern sits behind
//! a narrow, object-safe trait. Handles are an opaque type parameter `H`:
//! the engine passes them around but never inspects them. Absence (a nil
//! reference) is `None` wherever a collaborator can produce one.

use crate::parse::NameComponent;

/// Boxed error returned by collaborators.
///
/// Collaborator failures are flattened to text inside the diagnostic
/// envelope, so no structured error type is imposed on backends.
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

/// Converts handles to and from their stringified form.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn HandleCodec<H>>`.
pub trait HandleCodec<H>: Send + Sync {
    /// Stringify a handle.
    fn stringify(&self, handle: &H) -> Result<String, BackendError>;

    /// Unstringify a handle.
    ///
    /// `Ok(None)` means the string decoded to a nil reference; the engine
    /// reports that as a failure at the end of the import routine.
    fn unstringify(&self, s: &str) -> Result<Option<H>, BackendError>;
}

/// Client for the hierarchical naming directory.
pub trait DirectoryClient<H>: Send + Sync {
    /// Resolve the process-wide default directory endpoint.
    fn resolve_default(&self) -> Result<Option<H>, BackendError>;

    /// Narrow a generic handle to one usable as a directory.
    ///
    /// `Err` means a type mismatch; `Ok(None)` means the handle was nil.
    fn narrow(&self, handle: H) -> Result<Option<H>, BackendError>;

    /// Bind `handle` under `name` in `directory`, replacing any existing
    /// binding.
    fn bind(
        &self,
        directory: &H,
        name: &[NameComponent],
        handle: &H,
    ) -> Result<(), BackendError>;

    /// Look up the handle bound under `name` in `directory`.
    fn lookup(&self, directory: &H, name: &[NameComponent]) -> Result<Option<H>, BackendError>;
}

/// Result of running an external command to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    /// The command's exit status.
    pub exit_status: i32,
    /// The first line of its standard output, empty when it produced none.
    pub stdout_first_line: String,
}

/// Launches an external command and waits for it.
///
/// No timeout is defined; a command that never exits blocks the calling
/// thread. That is an accepted property of the engine, not a gap.
pub trait ProcessLauncher: Send + Sync {
    fn run(&self, command_line: &str) -> Result<RunOutput, BackendError>;
}

/// Line-based text file access for the `file#` scheme.
pub trait FileStore: Send + Sync {
    /// Write `content` verbatim to `path`, replacing the file.
    fn write_text(&self, path: &str, content: &str) -> Result<(), BackendError>;

    /// Read exactly the first line of `path`.
    ///
    /// Later lines are never consumed; that first-line-only behavior is a
    /// documented limitation of the scheme.
    fn read_first_line(&self, path: &str) -> Result<String, BackendError>;
}

/// Publishes a handle through a server-published well-known endpoint.
///
/// One publisher is registered per backend family; the dispatcher selects
/// by the family it was constructed with.
pub trait ServerPublisher<H>: Send + Sync {
    fn publish(&self, handle: &H, instructions: &str) -> Result<(), BackendError>;
}
