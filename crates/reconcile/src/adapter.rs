//! Tool adapter traits
//!
//! An adapter knows one external tool. Probing and installing are only
//! reachable through the handle returned by [`ToolAdapter::verify`], so any
//! inventory the adapter needs is captured before the first duplicate check
//! and lives exactly as long as the pass that verified it.

use crate::context::CommandRunner;
use crate::error::Result;
use crate::types::{DesiredItem, InstallOutcome, ItemKind, Probe};

/// Adapter for one item kind
pub trait ToolAdapter {
    /// Kind handled by this adapter
    fn kind(&self) -> ItemKind;

    /// Check that `program` is usable and capture current inventory.
    ///
    /// Returns `Ok(None)` when the tool ran but reported failure.
    fn verify<'a>(
        &'a self,
        runner: &'a dyn CommandRunner,
        program: &str,
    ) -> Result<Option<Box<dyn VerifiedTool + 'a>>>;
}

/// A verified tool, ready for one pass
pub trait VerifiedTool {
    /// Check whether an item is already installed
    fn probe_duplicate(&self, item: &DesiredItem) -> Result<Probe>;

    /// Install one item unless it is already present
    fn install(&self, item: &DesiredItem) -> Result<InstallOutcome>;
}

impl<T: ToolAdapter + ?Sized> ToolAdapter for &T {
    fn kind(&self) -> ItemKind {
        (**self).kind()
    }

    fn verify<'a>(
        &'a self,
        runner: &'a dyn CommandRunner,
        program: &str,
    ) -> Result<Option<Box<dyn VerifiedTool + 'a>>> {
        (**self).verify(runner, program)
    }
}
