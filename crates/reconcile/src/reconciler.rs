//! The reconciliation pass
//!
//! For each registered kind, in order: resolve the desired list, pick the
//! program, verify it, prune previously installed keys (latest-only mode),
//! then install or report every remaining item. Failures are scoped to the
//! kind or item that caused them; the pass always runs to the end.

use crate::adapter::{ToolAdapter, VerifiedTool};
use crate::context::{
    CommandRunner, DesiredStateSource, InstalledRecord, NoRecord, Notification, PassObserver,
};
use crate::error::{ReconcileError, Result};
use crate::expand::expand_vars;
use crate::types::{DesiredItem, DesiredSnapshot, InstallOutcome, ItemKind, PassSummary, RunMode};

/// Drives reconciliation passes over a fixed, ordered list of adapters
pub struct Reconciler<'a> {
    adapters: Vec<Box<dyn ToolAdapter + 'a>>,
    runner: &'a dyn CommandRunner,
    record: &'a dyn InstalledRecord,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler. Adapters are processed in the given order.
    pub fn new(runner: &'a dyn CommandRunner, adapters: Vec<Box<dyn ToolAdapter + 'a>>) -> Self {
        Self {
            adapters,
            runner,
            record: &NoRecord,
        }
    }

    /// Use a record of previously installed items for latest-only passes
    pub fn with_record(mut self, record: &'a dyn InstalledRecord) -> Self {
        self.record = record;
        self
    }

    /// Run one pass.
    ///
    /// In install mode exactly one summary notification is raised at the end.
    pub fn run<O>(&self, source: &dyn DesiredStateSource, mode: RunMode, observer: &mut O) -> PassSummary
    where
        O: PassObserver + ?Sized,
    {
        let mut summary = PassSummary::default();

        for adapter in &self.adapters {
            let kind = adapter.kind();
            if let Err(error) =
                self.reconcile_kind(adapter.as_ref(), source, mode, observer, &mut summary)
            {
                log::warn!("{}", error);
                summary.kind_errors += 1;
                observer.on_kind_error(kind, &error);
                if let Some(notification) = Notification::from_error(&error) {
                    observer.notify(&notification);
                }
            }
        }

        if mode.install {
            let notification = if summary.anything_installed() {
                Notification::RestartRequired
            } else {
                Notification::NothingInstalled
            };
            observer.notify(&notification);
        }

        log::debug!("pass finished: {:?}", summary);
        summary
    }

    fn reconcile_kind<O>(
        &self,
        adapter: &dyn ToolAdapter,
        source: &dyn DesiredStateSource,
        mode: RunMode,
        observer: &mut O,
        summary: &mut PassSummary,
    ) -> Result<()>
    where
        O: PassObserver + ?Sized,
    {
        let kind = adapter.kind();

        let mut snapshot =
            source
                .snapshot(kind.source_id())
                .ok_or_else(|| ReconcileError::ConfigurationMissing {
                    source_id: kind.source_id().to_string(),
                })?;

        let program = resolve_program(snapshot.take_program_override(), kind);

        let tool = match adapter.verify(self.runner, &program) {
            Ok(Some(tool)) => tool,
            Ok(None) => return Err(unverifiable(kind, program)),
            Err(e) => {
                log::debug!("verifying {} failed: {}", program, e);
                return Err(unverifiable(kind, program));
            }
        };

        log::info!("{} {} items (program: {})", mode.action(), kind, program);
        observer.on_kind_start(kind, &program, mode);

        if mode.latest {
            summary.previously_installed +=
                prune_previously_installed(&mut snapshot, self.record, kind, observer);
        }

        for item in &snapshot {
            if mode.install {
                observer.on_item_start(kind, item);
                let outcome = tool.install(item).unwrap_or_else(|e| InstallOutcome::Failed {
                    error: e.to_string(),
                    output: None,
                });
                summary.add_outcome(&outcome);
                observer.on_item_complete(kind, item, &outcome);
            } else {
                report_item(tool.as_ref(), kind, item, observer, summary);
            }
        }

        Ok(())
    }
}

/// Pick the program for a kind: the list override if present, else the
/// kind's default, with `~` and environment variables expanded.
///
/// Unset variables are left as written; the others are still substituted.
pub fn resolve_program(override_path: Option<String>, kind: ItemKind) -> String {
    let raw = override_path.unwrap_or_else(|| kind.default_program().to_string());
    expand_vars(&raw)
}

fn unverifiable(kind: ItemKind, program: String) -> ReconcileError {
    ReconcileError::ToolUnverifiable {
        source_id: kind.source_id().to_string(),
        program,
    }
}

fn prune_previously_installed<O>(
    snapshot: &mut DesiredSnapshot,
    record: &dyn InstalledRecord,
    kind: ItemKind,
    observer: &mut O,
) -> usize
where
    O: PassObserver + ?Sized,
{
    let mut pruned = 0;
    for key in record.previously_installed(kind) {
        if snapshot.remove(&key).is_some() {
            observer.on_previously_installed(kind, &key);
            pruned += 1;
        }
    }
    pruned
}

fn report_item<O>(
    tool: &dyn VerifiedTool,
    kind: ItemKind,
    item: &DesiredItem,
    observer: &mut O,
    summary: &mut PassSummary,
) where
    O: PassObserver + ?Sized,
{
    match tool.probe_duplicate(item) {
        Ok(probe) => {
            if probe.is_present() {
                summary.skipped += 1;
            } else {
                summary.reported += 1;
            }
            observer.on_item_reported(kind, item, &probe);
        }
        Err(e) => {
            let outcome = InstallOutcome::Failed {
                error: e.to_string(),
                output: None,
            };
            summary.add_outcome(&outcome);
            observer.on_item_complete(kind, item, &outcome);
        }
    }
}
