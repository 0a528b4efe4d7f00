//! Example strategy for the `dynamic#` scheme.

use std::io::{self, BufRead};

use refport_core::{Dispatcher, FailureKind, Operation, Strategy, TransferError};

/// A strategy that exports by printing the stringified handle to standard
/// output and imports by reading a stringified handle from standard input.
///
/// Register it under an identifier of your choice:
///
/// ```rust,no_run
/// use refport_core::StrategyTable;
/// use refport_sys::ConsoleStrategy;
///
/// let mut table: StrategyTable<String> = StrategyTable::new();
/// table.register("console", || Box::new(ConsoleStrategy));
/// // "dynamic#console" now round-trips handles through the terminal.
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleStrategy;

impl<H> Strategy<H> for ConsoleStrategy {
    fn export(
        &self,
        engine: &Dispatcher<H>,
        handle: &H,
        instructions: &str,
    ) -> Result<(), TransferError> {
        let stringified = engine.codec().stringify(handle).map_err(|e| {
            TransferError::new(
                Operation::Export,
                FailureKind::Backend,
                instructions,
                format!("stringify failed: {e}"),
            )
        })?;
        println!("instructions = '{instructions}'");
        println!("handle = {stringified}");
        Ok(())
    }

    fn import(
        &self,
        engine: &Dispatcher<H>,
        instructions: &str,
    ) -> Result<Option<H>, TransferError> {
        println!("instructions = '{instructions}'");
        println!("Please type in a stringified handle:");

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line).map_err(|e| {
            TransferError::new(
                Operation::Import,
                FailureKind::Backend,
                instructions,
                format!("error reading a stringified handle from the console: {e}"),
            )
        })?;
        engine.codec().unstringify(line.trim_end()).map_err(|e| {
            TransferError::new(
                Operation::Import,
                FailureKind::Backend,
                instructions,
                format!("unstringify failed: {e}"),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refport_core::{BackendError, HandleCodec, StrategyTable};

    struct TextCodec;

    impl HandleCodec<String> for TextCodec {
        fn stringify(&self, handle: &String) -> Result<String, BackendError> {
            Ok(handle.clone())
        }

        fn unstringify(&self, s: &str) -> Result<Option<String>, BackendError> {
            Ok(Some(s.to_string()))
        }
    }

    #[test]
    fn export_prints_and_succeeds() {
        let mut table: StrategyTable<String> = StrategyTable::new();
        table.register("console", || Box::new(ConsoleStrategy));
        let engine = Dispatcher::new(TextCodec).with_registry(table);

        engine
            .export(Some(&"the-handle".to_string()), "dynamic#console")
            .unwrap();
    }
}
