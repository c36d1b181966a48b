//! The four reconciliation commands
//!
//! A pass runs on its own named thread. [`spawn`] returns as soon as the
//! thread is started; [`run`] joins it to report the outcome.

use crate::adapter;
use crate::config::Registry;
use crate::observer::ConsoleObserver;
use crate::runner::SystemRunner;
use crate::{Context, paths, ui};
use anyhow::{Context as _, Result, anyhow};
use reconcile::{CommandRunner, PassObserver, PassSummary, Reconciler, RunMode};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

const THREAD_NAME: &str = "taip-pass";

/// Run a pass and wait for it to finish
pub fn run(ctx: &Context, mode: RunMode) -> Result<PassSummary> {
    let handle = spawn(ctx.clone(), mode)?;
    handle
        .join()
        .map_err(|_| anyhow!("Reconciliation pass panicked"))?
}

/// Start a pass in the background
///
/// The registry is read on the pass thread, so edits made before the
/// thread starts are picked up.
pub fn spawn(ctx: Context, mode: RunMode) -> Result<JoinHandle<Result<PassSummary>>> {
    thread::Builder::new()
        .name(THREAD_NAME.to_string())
        .spawn(move || execute(&ctx, mode))
        .context("Failed to start reconciliation pass")
}

fn execute(ctx: &Context, mode: RunMode) -> Result<PassSummary> {
    let registry_path = paths::registry_file(ctx.config.as_deref())?;
    let registry = Registry::load(&registry_path)?;
    log::debug!("Lists in registry: {}", registry.list_names().join(", "));
    let user_dir = paths::user_dir(registry.settings.user_dir.as_deref())?;

    let mut observer = ConsoleObserver::new(ctx.quiet, ctx.verbose);
    let summary = reconcile_registry(&registry, user_dir, &SystemRunner, mode, &mut observer);

    if mode.install && !ctx.quiet {
        print_summary(&summary);
    }
    Ok(summary)
}

/// Run one pass over a loaded registry with every registered adapter
fn reconcile_registry(
    registry: &Registry,
    user_dir: PathBuf,
    runner: &dyn CommandRunner,
    mode: RunMode,
    observer: &mut dyn PassObserver,
) -> PassSummary {
    log::debug!("User data root: {}", user_dir.display());
    let reconciler = Reconciler::new(runner, adapter::registered(user_dir));
    reconciler.run(registry, mode, observer)
}

fn print_summary(summary: &PassSummary) {
    let line = format!(
        "{} installed, {} skipped, {} failed",
        summary.installed, summary.skipped, summary.failed
    );

    println!();
    if summary.is_success() {
        ui::info(&line);
    } else {
        ui::warn(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::testing::RecordingRunner;
    use crate::config::RegistryFormat;
    use reconcile::{CommandOutput, NoObserver};
    use std::fs;

    fn registry(content: &str) -> Registry {
        Registry::parse(content, RegistryFormat::Toml).unwrap()
    }

    #[test]
    fn test_missing_vscode_list_does_not_stop_git() {
        let user_dir = tempfile::tempdir().unwrap();
        let registry = registry(
            r#"
[lists."user.taip_git"]
"org/repo repo" = "https://example.com/repo"
"#,
        );
        let runner = RecordingRunner::default();

        let summary = reconcile_registry(
            &registry,
            user_dir.path().to_path_buf(),
            &runner,
            RunMode::INSTALL_ALL,
            &mut NoObserver,
        );

        assert_eq!(summary.installed, 1);
        assert_eq!(summary.kind_errors, 1);
        assert!(!summary.is_success());
        assert_eq!(runner.calls_to("clone").len(), 1);
    }

    #[test]
    fn test_existing_clones_and_extensions_are_left_alone() {
        let user_dir = tempfile::tempdir().unwrap();
        fs::create_dir(user_dir.path().join("community")).unwrap();
        let registry = registry(
            r#"
[lists."user.taip_git"]
"talonhub/community community" = "https://github.com/talonhub/community"

[lists."user.taip_vscode"]
"Pokey.Cursorless" = "https://marketplace.visualstudio.com/items?itemName=pokey.cursorless"
"#,
        );
        let runner = RecordingRunner::default().respond(
            "--list-extensions",
            CommandOutput::new(true, "pokey.cursorless\n", ""),
        );

        let summary = reconcile_registry(
            &registry,
            user_dir.path().to_path_buf(),
            &runner,
            RunMode::INSTALL_ALL,
            &mut NoObserver,
        );

        assert_eq!(summary.installed, 0);
        assert_eq!(summary.skipped, 2);
        assert!(summary.is_success());
        assert!(runner.calls_to("clone").is_empty());
        assert!(runner.calls_to("--install-extension").is_empty());
    }

    #[test]
    fn test_program_override_is_used() {
        let user_dir = tempfile::tempdir().unwrap();
        let registry = registry(
            r#"
[lists."user.taip_git"]
program_pathname = "/opt/git/bin/git"

[lists."user.taip_vscode"]
"#,
        );
        let runner = RecordingRunner::default();

        reconcile_registry(
            &registry,
            user_dir.path().to_path_buf(),
            &runner,
            RunMode::PRINT_ALL,
            &mut NoObserver,
        );

        let programs: Vec<_> = runner.calls().into_iter().map(|(program, _)| program).collect();
        assert_eq!(programs, ["/opt/git/bin/git", "code", "code"]);
    }

    #[test]
    fn test_spawned_pass_reports_unreadable_registry() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context {
            verbose: 0,
            quiet: true,
            config: Some(dir.path().join("missing.toml")),
        };

        let handle = spawn(ctx, RunMode::PRINT_ALL).unwrap();
        assert_eq!(handle.thread().name(), Some(THREAD_NAME));

        let err = handle.join().unwrap().unwrap_err();
        assert!(format!("{:#}", err).contains("Could not read registry file"));
    }
}
