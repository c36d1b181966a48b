//! Terminal rendering of a reconciliation pass

use crate::{progress, ui};
use indicatif::ProgressBar;
use reconcile::{
    DesiredItem, InstallOutcome, ItemKind, Notification, PassObserver, Probe, ReconcileError,
    RunMode,
};

/// Prints pass progress and results to the terminal
pub struct ConsoleObserver {
    quiet: bool,
    verbose: u8,
    spinner: Option<ProgressBar>,
}

impl ConsoleObserver {
    pub fn new(quiet: bool, verbose: u8) -> Self {
        Self {
            quiet,
            verbose,
            spinner: None,
        }
    }

    fn clear_spinner(&mut self) {
        if let Some(pb) = self.spinner.take() {
            progress::finish_clear(&pb);
        }
    }

    fn print_output(&self, outcome: &InstallOutcome) {
        let Some(output) = outcome.output() else {
            return;
        };
        // Successful installs only show tool chatter when asked to
        if outcome.is_installed() && self.verbose == 0 {
            return;
        }
        ui::output_block("Standard Output:", &output.stdout_str());
        ui::output_block("Standard Error:", &output.stderr_str());
    }
}

fn skip_line(key: &str, reason: &str) -> String {
    format!("Skipping `{}` ({})", key, reason)
}

impl PassObserver for ConsoleObserver {
    fn on_kind_start(&mut self, kind: ItemKind, program: &str, mode: RunMode) {
        if self.quiet {
            return;
        }
        ui::section(&format!("{} {} items...", mode.action(), kind));
        ui::kv("program", program);
    }

    fn on_kind_error(&mut self, kind: ItemKind, _error: &ReconcileError) {
        self.clear_spinner();
        if !self.quiet {
            ui::dim(&format!("No {} items handled", kind.label()));
        }
    }

    fn on_previously_installed(&mut self, _kind: ItemKind, key: &str) {
        if !self.quiet {
            ui::dim(&skip_line(key, "previously installed"));
        }
    }

    fn on_item_start(&mut self, _kind: ItemKind, item: &DesiredItem) {
        self.clear_spinner();
        if !self.quiet {
            self.spinner = Some(progress::spinner(&format!("Installing {}", item.key)));
        }
    }

    fn on_item_complete(&mut self, _kind: ItemKind, item: &DesiredItem, outcome: &InstallOutcome) {
        self.clear_spinner();

        match outcome {
            InstallOutcome::Installed { .. } => {
                if !self.quiet {
                    ui::success(&format!("Installed: {}", item));
                }
            }
            InstallOutcome::Skipped { reason } => {
                if !self.quiet {
                    ui::dim(&skip_line(&item.key, reason));
                }
            }
            InstallOutcome::Failed { error, .. } => {
                ui::error(&format!("Unable to install: {} ({})", item, error));
            }
        }

        if !self.quiet || outcome.is_failed() {
            self.print_output(outcome);
        }
    }

    fn on_item_reported(&mut self, _kind: ItemKind, item: &DesiredItem, probe: &Probe) {
        match probe {
            Probe::Present { detail } => {
                if !self.quiet {
                    ui::dim(&skip_line(&item.key, detail));
                }
            }
            // Missing items are the report itself, printed even when quiet
            Probe::Missing => println!("{}", item),
        }
    }

    fn notify(&mut self, notification: &Notification) {
        self.clear_spinner();
        ui::notify(&notification.title(), notification.subtitle());
    }
}
