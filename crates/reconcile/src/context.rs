//! Provider traits for reconciliation passes
//!
//! These traits keep the reconciler free of process spawning, terminal
//! output and configuration formats. The binary supplies the real
//! implementations; tests supply recording ones.

use crate::error::{ReconcileError, Result};
use crate::types::{CommandOutput, DesiredItem, DesiredSnapshot, InstallOutcome, ItemKind, Probe, RunMode};

/// Runs external tools
///
/// Every call blocks until the child exits.
pub trait CommandRunner {
    /// Run a command and capture stdout and stderr
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;

    /// Run a command and return just success/failure
    fn run_status(&self, program: &str, args: &[&str]) -> Result<bool> {
        Ok(self.run(program, args)?.success)
    }
}

/// Supplies desired-state lists by identifier
pub trait DesiredStateSource {
    /// Return an independent copy of the named list, or `None` if absent
    fn snapshot(&self, source_id: &str) -> Option<DesiredSnapshot>;
}

/// Record of items installed by earlier runs
///
/// Consulted only in latest-only mode.
pub trait InstalledRecord {
    /// Keys previously installed for a kind
    fn previously_installed(&self, kind: ItemKind) -> Vec<String>;
}

/// Record with no backing store; nothing is ever previously installed
pub struct NoRecord;

impl InstalledRecord for NoRecord {
    fn previously_installed(&self, _kind: ItemKind) -> Vec<String> {
        Vec::new()
    }
}

/// Terminal notifications raised by a pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A kind's desired-state list was not found
    ListMissing { source_id: String },
    /// A kind's tool could not be verified
    ProgramMissing { source_id: String, program: String },
    /// An install pass changed something
    RestartRequired,
    /// An install pass changed nothing
    NothingInstalled,
}

impl Notification {
    /// Build the notification matching a kind-scoped error
    pub fn from_error(error: &ReconcileError) -> Option<Self> {
        match error {
            ReconcileError::ConfigurationMissing { source_id } => Some(Self::ListMissing {
                source_id: source_id.clone(),
            }),
            ReconcileError::ToolUnverifiable { source_id, program } => {
                Some(Self::ProgramMissing {
                    source_id: source_id.clone(),
                    program: program.clone(),
                })
            }
            _ => None,
        }
    }

    pub fn title(&self) -> String {
        match self {
            Self::ListMissing { source_id } => format!("Could not find list: {}", source_id),
            Self::ProgramMissing { source_id, program } => {
                format!("Could not find program (from {}): {}", source_id, program)
            }
            Self::RestartRequired => "taip - Please restart".to_string(),
            Self::NothingInstalled => "taip - Nothing was installed".to_string(),
        }
    }

    pub fn subtitle(&self) -> Option<&'static str> {
        match self {
            Self::ProgramMissing { .. } => {
                Some("Open a new shell if the program was installed after this one started")
            }
            Self::RestartRequired => Some("New items load on the next start"),
            _ => None,
        }
    }
}

/// Receives progress and results while a pass runs
pub trait PassObserver {
    /// Called after a kind's tool was verified, before any item is handled
    fn on_kind_start(&mut self, kind: ItemKind, program: &str, mode: RunMode);

    /// Called when a kind is abandoned
    fn on_kind_error(&mut self, kind: ItemKind, error: &ReconcileError);

    /// Called for each item pruned in latest-only mode
    fn on_previously_installed(&mut self, kind: ItemKind, key: &str);

    /// Called right before an install subprocess may run
    fn on_item_start(&mut self, kind: ItemKind, item: &DesiredItem);

    /// Called when an install attempt finished
    fn on_item_complete(&mut self, kind: ItemKind, item: &DesiredItem, outcome: &InstallOutcome);

    /// Called for each item in report-only mode
    fn on_item_reported(&mut self, kind: ItemKind, item: &DesiredItem, probe: &Probe);

    /// Raise a terminal notification
    fn notify(&mut self, notification: &Notification);
}

/// Observer that discards everything
pub struct NoObserver;

impl PassObserver for NoObserver {
    fn on_kind_start(&mut self, _kind: ItemKind, _program: &str, _mode: RunMode) {}
    fn on_kind_error(&mut self, _kind: ItemKind, _error: &ReconcileError) {}
    fn on_previously_installed(&mut self, _kind: ItemKind, _key: &str) {}
    fn on_item_start(&mut self, _kind: ItemKind, _item: &DesiredItem) {}
    fn on_item_complete(&mut self, _kind: ItemKind, _item: &DesiredItem, _outcome: &InstallOutcome) {}
    fn on_item_reported(&mut self, _kind: ItemKind, _item: &DesiredItem, _probe: &Probe) {}
    fn notify(&mut self, _notification: &Notification) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_record_is_empty() {
        for kind in ItemKind::ALL {
            assert!(NoRecord.previously_installed(kind).is_empty());
        }
    }

    #[test]
    fn notification_from_kind_errors() {
        let err = ReconcileError::ToolUnverifiable {
            source_id: "user.taip_git".into(),
            program: "git".into(),
        };
        let notification = Notification::from_error(&err).unwrap();

        assert_eq!(
            notification.title(),
            "Could not find program (from user.taip_git): git"
        );
        assert!(notification.subtitle().is_some());
    }

    #[test]
    fn item_errors_do_not_notify() {
        let err = ReconcileError::InvalidItemKey {
            key: String::new(),
            reason: "empty".into(),
        };
        assert_eq!(Notification::from_error(&err), None);
    }
}
