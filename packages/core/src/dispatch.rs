//! The scheme dispatcher: routes one instruction string to the backend
//! that should publish or retrieve a handle.
//!
//! The engine is synchronous and single-threaded per call. It holds no
//! shared mutable state between calls; the only blocking points are the
//! collaborators' own I/O (filesystem, directory RPC, waiting on an
//! external command).

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{FailureKind, Operation, TransferError};
use crate::family::BackendFamily;
use crate::locator::looks_like_locator;
use crate::parse::{classify, strategy_identifier, NamingAddress, Scheme};
use crate::strategy::StrategyRegistry;
use crate::traits::{DirectoryClient, FileStore, HandleCodec, ProcessLauncher, ServerPublisher};

/// The placeholder token an `exec#` export body must contain. It is
/// replaced - a single substring replacement at the first occurrence, not
/// a pattern match - by the stringified handle.
pub const IOR_PLACEHOLDER: &str = "IOR";

/// Import/export engine over an opaque handle type `H`.
///
/// Built from a mandatory handle codec plus whichever collaborators the
/// deployment needs; a scheme whose collaborator was never configured
/// fails with a descriptive backend error instead of panicking.
///
/// # Example
///
/// ```rust,no_run
/// use refport_core::{Dispatcher, HandleCodec, BackendError};
///
/// struct Codec;
///
/// impl HandleCodec<String> for Codec {
///     fn stringify(&self, handle: &String) -> Result<String, BackendError> {
///         Ok(handle.clone())
///     }
///     fn unstringify(&self, s: &str) -> Result<Option<String>, BackendError> {
///         Ok(Some(s.to_string()))
///     }
/// }
///
/// let engine = Dispatcher::new(Codec);
/// let handle = engine.import("IOR:010631...")?;
/// engine.export(Some(&handle), "")?; // empty instructions: don't publish
/// # Ok::<(), refport_core::TransferError>(())
/// ```
pub struct Dispatcher<H> {
    codec: Box<dyn HandleCodec<H>>,
    directory: Option<Box<dyn DirectoryClient<H>>>,
    files: Option<Box<dyn FileStore>>,
    launcher: Option<Box<dyn ProcessLauncher>>,
    registry: Option<Box<dyn StrategyRegistry<H>>>,
    family: Option<BackendFamily>,
    publishers: BTreeMap<BackendFamily, Box<dyn ServerPublisher<H>>>,
}

impl<H> Dispatcher<H> {
    pub fn new(codec: impl HandleCodec<H> + 'static) -> Self {
        Dispatcher {
            codec: Box::new(codec),
            directory: None,
            files: None,
            launcher: None,
            registry: None,
            family: None,
            publishers: BTreeMap::new(),
        }
    }

    /// Attach a naming-directory client for the `name_service#` scheme.
    pub fn with_directory(mut self, directory: impl DirectoryClient<H> + 'static) -> Self {
        self.directory = Some(Box::new(directory));
        self
    }

    /// Attach a file store for the `file#` scheme.
    pub fn with_files(mut self, files: impl FileStore + 'static) -> Self {
        self.files = Some(Box::new(files));
        self
    }

    /// Attach a process launcher for the `exec#` scheme.
    pub fn with_launcher(mut self, launcher: impl ProcessLauncher + 'static) -> Self {
        self.launcher = Some(Box::new(launcher));
        self
    }

    /// Attach a strategy registry for the `dynamic#` scheme.
    pub fn with_registry(mut self, registry: impl StrategyRegistry<H> + 'static) -> Self {
        self.registry = Some(Box::new(registry));
        self
    }

    /// Select the active server-publish backend family.
    pub fn with_backend_family(mut self, family: BackendFamily) -> Self {
        self.family = Some(family);
        self
    }

    /// Register a server publisher for one backend family.
    pub fn with_publisher(
        mut self,
        family: BackendFamily,
        publisher: impl ServerPublisher<H> + 'static,
    ) -> Self {
        self.publishers.insert(family, Box::new(publisher));
        self
    }

    /// The handle codec, for strategies that need to stringify or
    /// unstringify through the engine's configuration.
    pub fn codec(&self) -> &dyn HandleCodec<H> {
        self.codec.as_ref()
    }

    /// Export `handle` according to `instructions`.
    ///
    /// An absent handle is rejected unconditionally. Empty instructions
    /// are an explicit "don't publish" no-op, not an error.
    pub fn export(&self, handle: Option<&H>, instructions: &str) -> Result<(), TransferError> {
        let Some(handle) = handle else {
            return Err(self.err(
                Operation::Export,
                FailureKind::NilHandle,
                instructions,
                "attempt to export a nil handle",
            ));
        };

        if instructions.is_empty() {
            return Ok(()); // don't publish the handle
        }

        let (scheme, body) = classify(instructions).map_err(|e| {
            self.err(
                Operation::Export,
                FailureKind::InvalidInstructions,
                instructions,
                e.to_string(),
            )
        })?;
        debug!(?scheme, "dispatching export");

        match scheme {
            Scheme::NameService => self.export_naming(handle, body, instructions),
            Scheme::File => self.export_file(handle, body, instructions),
            Scheme::Exec => self.export_exec(handle, body, instructions),
            Scheme::Dynamic => self.export_dynamic(handle, body, instructions),
            Scheme::ServerPublish => self.export_server(handle, instructions),
        }
    }

    /// Import a handle according to `instructions`.
    ///
    /// An import that succeeds but yields an absent handle is itself a
    /// failure, regardless of which scheme produced it.
    pub fn import(&self, instructions: &str) -> Result<H, TransferError> {
        let result = self.import_opt(instructions)?;
        result.ok_or_else(|| {
            self.err(
                Operation::Import,
                FailureKind::NilHandle,
                instructions,
                "produced a nil handle",
            )
        })
    }

    fn import_opt(&self, instructions: &str) -> Result<Option<H>, TransferError> {
        match classify(instructions) {
            Ok((scheme, body)) => {
                debug!(?scheme, "dispatching import");
                match scheme {
                    Scheme::NameService => self.import_naming(body, instructions),
                    Scheme::File => self.import_file(body, instructions),
                    Scheme::Exec => self.import_exec(body, instructions),
                    Scheme::Dynamic => self.import_dynamic(body, instructions),
                    Scheme::ServerPublish => Err(self.err(
                        Operation::Import,
                        FailureKind::InvalidInstructions,
                        instructions,
                        "scheme 'server_publish#' is export-only",
                    )),
                }
            }
            Err(_) if looks_like_locator(instructions) => {
                debug!("dispatching import of a self-describing locator");
                self.unstringify(Operation::Import, instructions, instructions)
            }
            Err(e) => Err(self.err(
                Operation::Import,
                FailureKind::InvalidInstructions,
                instructions,
                e.to_string(),
            )),
        }
    }

    // ---- naming directory ----

    fn export_naming(&self, handle: &H, body: &str, instructions: &str) -> Result<(), TransferError> {
        let address = self.parse_naming(Operation::Export, body, instructions)?;
        let directory = self.contact_directory(Operation::Export, instructions, &address)?;
        self.require_directory(Operation::Export, instructions)?
            .bind(&directory, &address.components, handle)
            .map_err(|e| {
                self.err(
                    Operation::Export,
                    FailureKind::Backend,
                    instructions,
                    format!("bind failed: {e}"),
                )
            })
    }

    fn import_naming(&self, body: &str, instructions: &str) -> Result<Option<H>, TransferError> {
        let address = self.parse_naming(Operation::Import, body, instructions)?;
        let directory = self.contact_directory(Operation::Import, instructions, &address)?;
        self.require_directory(Operation::Import, instructions)?
            .lookup(&directory, &address.components)
            .map_err(|e| {
                self.err(
                    Operation::Import,
                    FailureKind::Backend,
                    instructions,
                    format!("lookup failed: {e}"),
                )
            })
    }

    fn parse_naming(
        &self,
        op: Operation,
        body: &str,
        instructions: &str,
    ) -> Result<NamingAddress, TransferError> {
        NamingAddress::parse(body)
            .map_err(|e| self.err(op, FailureKind::InvalidInstructions, instructions, e.to_string()))
    }

    /// Resolve the directory endpoint: the process-wide default when no
    /// address was parsed, otherwise the whole import routine re-entered
    /// on the address string. The result is narrowed and nil-checked
    /// before use.
    fn contact_directory(
        &self,
        op: Operation,
        instructions: &str,
        address: &NamingAddress,
    ) -> Result<H, TransferError> {
        let client = self.require_directory(op, instructions)?;

        let endpoint = match address.directory_address.as_deref() {
            None => client.resolve_default().map_err(|e| {
                self.err(
                    op,
                    FailureKind::Backend,
                    instructions,
                    format!("failed to contact the naming directory: {e}"),
                )
            })?,
            Some(addr) => Some(self.import(addr).map_err(|inner| {
                // Flatten the inner envelope into this one's cause text.
                self.err(
                    op,
                    inner.kind,
                    instructions,
                    format!("failed to contact the naming directory: {inner}"),
                )
            })?),
        };

        let Some(endpoint) = endpoint else {
            return Err(self.err(
                op,
                FailureKind::Backend,
                instructions,
                "narrow to a directory failed: nil handle",
            ));
        };
        match client.narrow(endpoint) {
            Ok(Some(directory)) => Ok(directory),
            Ok(None) => Err(self.err(
                op,
                FailureKind::Backend,
                instructions,
                "narrow to a directory failed: nil handle",
            )),
            Err(e) => Err(self.err(
                op,
                FailureKind::Backend,
                instructions,
                format!("narrow to a directory failed: {e}"),
            )),
        }
    }

    // ---- filesystem ----

    fn export_file(&self, handle: &H, path: &str, instructions: &str) -> Result<(), TransferError> {
        let files = self.require_files(Operation::Export, instructions)?;
        let stringified = self.stringify(Operation::Export, instructions, handle)?;
        files.write_text(path, &stringified).map_err(|e| {
            self.err(
                Operation::Export,
                FailureKind::Backend,
                instructions,
                format!("error writing to file: {e}"),
            )
        })
    }

    fn import_file(&self, path: &str, instructions: &str) -> Result<Option<H>, TransferError> {
        let files = self.require_files(Operation::Import, instructions)?;
        let line = files.read_first_line(path).map_err(|e| {
            self.err(
                Operation::Import,
                FailureKind::Backend,
                instructions,
                format!("error reading file: {e}"),
            )
        })?;
        self.unstringify(Operation::Import, instructions, line.trim_end())
    }

    // ---- external command ----

    fn export_exec(&self, handle: &H, body: &str, instructions: &str) -> Result<(), TransferError> {
        let launcher = self.require_launcher(Operation::Export, instructions)?;
        let stringified = self.stringify(Operation::Export, instructions, handle)?;

        if !body.contains(IOR_PLACEHOLDER) {
            return Err(self.err(
                Operation::Export,
                FailureKind::InvalidInstructions,
                instructions,
                format!("no {IOR_PLACEHOLDER} placeholder in command"),
            ));
        }
        let command = body.replacen(IOR_PLACEHOLDER, &stringified, 1);

        let output = launcher.run(&command).map_err(|e| {
            self.err(
                Operation::Export,
                FailureKind::Backend,
                instructions,
                format!("failed to run command: {e}"),
            )
        })?;
        if output.exit_status != 0 {
            return Err(self.err(
                Operation::Export,
                FailureKind::Backend,
                instructions,
                "non-zero exit status",
            ));
        }
        Ok(())
    }

    fn import_exec(&self, body: &str, instructions: &str) -> Result<Option<H>, TransferError> {
        let launcher = self.require_launcher(Operation::Import, instructions)?;
        let output = launcher.run(body).map_err(|e| {
            self.err(
                Operation::Import,
                FailureKind::Backend,
                instructions,
                format!("failed to run command: {e}"),
            )
        })?;
        if output.exit_status != 0 {
            return Err(self.err(
                Operation::Import,
                FailureKind::Backend,
                instructions,
                "non-zero exit status",
            ));
        }
        self.unstringify(Operation::Import, instructions, &output.stdout_first_line)
    }

    // ---- dynamic strategy ----

    fn export_dynamic(&self, handle: &H, body: &str, instructions: &str) -> Result<(), TransferError> {
        let strategy = self.load_strategy(Operation::Export, body, instructions)?;
        strategy.export(self, handle, instructions)
    }

    fn import_dynamic(&self, body: &str, instructions: &str) -> Result<Option<H>, TransferError> {
        let strategy = self.load_strategy(Operation::Import, body, instructions)?;
        strategy.import(self, instructions)
    }

    /// Resolve a strategy by identifier, fresh on every call.
    fn load_strategy(
        &self,
        op: Operation,
        body: &str,
        instructions: &str,
    ) -> Result<Box<dyn crate::strategy::Strategy<H>>, TransferError> {
        let registry = self.require_registry(op, instructions)?;
        let identifier = strategy_identifier(body);
        registry.instantiate(identifier).map_err(|e| {
            self.err(
                op,
                FailureKind::LoadFailed,
                instructions,
                format!("cannot create an instance of strategy '{identifier}': {e}"),
            )
        })
    }

    // ---- server publish ----

    fn export_server(&self, handle: &H, instructions: &str) -> Result<(), TransferError> {
        let unsupported = |detail: String| {
            self.err(
                Operation::Export,
                FailureKind::UnsupportedBackend,
                instructions,
                detail,
            )
        };
        let Some(family) = self.family else {
            return Err(unsupported(
                "server-publish functionality is not supported: no backend family is active"
                    .to_string(),
            ));
        };
        let Some(publisher) = self.publishers.get(&family) else {
            return Err(unsupported(format!(
                "server-publish functionality is not supported for backend family '{family}'"
            )));
        };
        publisher.publish(handle, instructions).map_err(|e| {
            self.err(
                Operation::Export,
                FailureKind::Backend,
                instructions,
                format!("publish failed: {e}"),
            )
        })
    }

    // ---- helpers ----

    fn stringify(&self, op: Operation, instructions: &str, handle: &H) -> Result<String, TransferError> {
        self.codec.stringify(handle).map_err(|e| {
            self.err(op, FailureKind::Backend, instructions, format!("stringify failed: {e}"))
        })
    }

    fn unstringify(
        &self,
        op: Operation,
        instructions: &str,
        s: &str,
    ) -> Result<Option<H>, TransferError> {
        self.codec.unstringify(s).map_err(|e| {
            self.err(op, FailureKind::Backend, instructions, format!("unstringify failed: {e}"))
        })
    }

    fn require_directory(
        &self,
        op: Operation,
        instructions: &str,
    ) -> Result<&dyn DirectoryClient<H>, TransferError> {
        self.directory.as_deref().ok_or_else(|| {
            self.err(op, FailureKind::Backend, instructions, "no directory client configured")
        })
    }

    fn require_files(&self, op: Operation, instructions: &str) -> Result<&dyn FileStore, TransferError> {
        self.files.as_deref().ok_or_else(|| {
            self.err(op, FailureKind::Backend, instructions, "no file store configured")
        })
    }

    fn require_launcher(
        &self,
        op: Operation,
        instructions: &str,
    ) -> Result<&dyn ProcessLauncher, TransferError> {
        self.launcher.as_deref().ok_or_else(|| {
            self.err(op, FailureKind::Backend, instructions, "no process launcher configured")
        })
    }

    fn require_registry(
        &self,
        op: Operation,
        instructions: &str,
    ) -> Result<&dyn StrategyRegistry<H>, TransferError> {
        self.registry.as_deref().ok_or_else(|| {
            self.err(op, FailureKind::Backend, instructions, "no strategy registry configured")
        })
    }

    fn err(
        &self,
        op: Operation,
        kind: FailureKind,
        instructions: &str,
        cause: impl Into<String>,
    ) -> TransferError {
        TransferError::new(op, kind, instructions, cause)
    }
}
