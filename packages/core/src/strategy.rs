//! Pluggable import/export strategies and their loading facade.
//!
//! The `dynamic#` scheme names a strategy by identifier. Identifiers are
//! resolved through a [`StrategyRegistry`] fresh on every call - never
//! cached - so repeated calls under different runtime configuration can
//! never observe a stale binding.

use std::collections::BTreeMap;

use crate::dispatch::Dispatcher;
use crate::error::TransferError;

/// A user-supplied import/export algorithm.
///
/// The strategy receives the dispatcher so it can reuse the configured
/// collaborators (codec, directory, launcher), and the full original
/// instruction string: everything after the identifier is the strategy's
/// to interpret.
///
/// # Example
///
/// ```rust
/// use refport_core::{Dispatcher, Strategy, TransferError};
///
/// struct Println;
///
/// impl Strategy<String> for Println {
///     fn export(
///         &self,
///         _engine: &Dispatcher<String>,
///         handle: &String,
///         instructions: &str,
///     ) -> Result<(), TransferError> {
///         println!("instructions = '{instructions}', handle = {handle}");
///         Ok(())
///     }
///
///     fn import(
///         &self,
///         _engine: &Dispatcher<String>,
///         _instructions: &str,
///     ) -> Result<Option<String>, TransferError> {
///         Ok(Some("a handle from somewhere".to_string()))
///     }
/// }
/// ```
pub trait Strategy<H>: Send + Sync {
    /// Export the handle according to `instructions`.
    fn export(
        &self,
        engine: &Dispatcher<H>,
        handle: &H,
        instructions: &str,
    ) -> Result<(), TransferError>;

    /// Import a handle according to `instructions`.
    ///
    /// `Ok(None)` is a nil result; the engine turns it into a failure.
    fn import(&self, engine: &Dispatcher<H>, instructions: &str)
        -> Result<Option<H>, TransferError>;
}

/// Why a strategy identifier could not be resolved.
///
/// Only the category travels into the diagnostic envelope, never a
/// backend-internal message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("unknown strategy '{0}'")]
    Unknown(String),
    #[error("strategy '{0}' failed to construct")]
    Construction(String),
}

/// Resolves strategy identifiers to fresh strategy instances.
pub trait StrategyRegistry<H>: Send + Sync {
    /// Instantiate the strategy registered under `identifier`.
    ///
    /// Implementations must construct a fresh instance per call.
    fn instantiate(&self, identifier: &str) -> Result<Box<dyn Strategy<H>>, LoadError>;
}

/// Factory closure producing a fresh strategy instance.
pub type StrategyFactory<H> = Box<dyn Fn() -> Box<dyn Strategy<H>> + Send + Sync>;

/// The default registry: an explicit identifier-to-factory table populated
/// at process startup.
///
/// This replaces by-name dynamic class loading with a mapping lookup while
/// keeping the resolve-fresh-per-call semantics.
pub struct StrategyTable<H> {
    factories: BTreeMap<String, StrategyFactory<H>>,
}

impl<H> StrategyTable<H> {
    pub fn new() -> Self {
        StrategyTable {
            factories: BTreeMap::new(),
        }
    }

    /// Register a factory under `identifier`, replacing any previous one.
    pub fn register(
        &mut self,
        identifier: impl Into<String>,
        factory: impl Fn() -> Box<dyn Strategy<H>> + Send + Sync + 'static,
    ) {
        self.factories.insert(identifier.into(), Box::new(factory));
    }

    /// The registered identifiers, in order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

impl<H> Default for StrategyTable<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> StrategyRegistry<H> for StrategyTable<H> {
    fn instantiate(&self, identifier: &str) -> Result<Box<dyn Strategy<H>>, LoadError> {
        let factory = self
            .factories
            .get(identifier)
            .ok_or_else(|| LoadError::Unknown(identifier.to_string()))?;
        Ok(factory())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Nop;

    impl Strategy<String> for Nop {
        fn export(
            &self,
            _engine: &Dispatcher<String>,
            _handle: &String,
            _instructions: &str,
        ) -> Result<(), TransferError> {
            Ok(())
        }

        fn import(
            &self,
            _engine: &Dispatcher<String>,
            _instructions: &str,
        ) -> Result<Option<String>, TransferError> {
            Ok(None)
        }
    }

    #[test]
    fn unknown_identifier_fails() {
        let table: StrategyTable<String> = StrategyTable::new();
        let err = match table.instantiate("nope") {
            Err(err) => err,
            Ok(_) => panic!("expected instantiate to fail"),
        };
        assert_eq!(err, LoadError::Unknown("nope".to_string()));
    }

    #[test]
    fn registered_identifier_resolves() {
        let mut table: StrategyTable<String> = StrategyTable::new();
        table.register("nop", || Box::new(Nop));
        assert!(table.instantiate("nop").is_ok());
        assert_eq!(table.identifiers().collect::<Vec<_>>(), vec!["nop"]);
    }

    #[test]
    fn factory_runs_fresh_per_call() {
        let constructed = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&constructed);

        let mut table: StrategyTable<String> = StrategyTable::new();
        table.register("counted", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Box::new(Nop)
        });

        table.instantiate("counted").unwrap();
        table.instantiate("counted").unwrap();
        assert_eq!(constructed.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn register_replaces_previous_factory() {
        let mut table: StrategyTable<String> = StrategyTable::new();
        table.register("x", || Box::new(Nop));
        table.register("x", || Box::new(Nop));
        assert_eq!(table.identifiers().count(), 1);
    }
}
