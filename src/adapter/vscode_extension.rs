//! VS Code extension adapter

use crate::paths;
use reconcile::{
    CommandRunner, DesiredItem, InstallOutcome, ItemKind, Probe, ReconcileError, Result,
    ToolAdapter, VerifiedTool,
};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Extension that fails to start without a user settings.json
/// (cursorless-dev/cursorless#3030)
const NEEDS_SETTINGS_FILE: &str = "pokey.cursorless";

/// `code --install-extension` prints this and exits 0 when nothing was done
const ALREADY_INSTALLED_MARKER: &str = "is already installed.";

/// Installs extensions with `code --install-extension`
#[derive(Debug, Clone)]
pub struct VsCodeExtension {
    settings_dir: Option<PathBuf>,
}

impl VsCodeExtension {
    pub fn new() -> Self {
        Self::with_settings_dir(paths::vscode_settings_dir())
    }

    /// Use a specific settings directory; `None` disables the settings.json workaround
    pub fn with_settings_dir(settings_dir: Option<PathBuf>) -> Self {
        Self { settings_dir }
    }
}

impl Default for VsCodeExtension {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `code --list-extensions` output into a lowercase set
///
/// `code` lists ids lowercased; desired ids may use any case.
fn parse_inventory(stdout: &str) -> HashSet<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Create an empty `settings.json` in `dir` if the directory exists and the
/// file does not. Returns whether a file was written.
fn ensure_settings_file(dir: &Path) -> Result<bool> {
    let settings = dir.join("settings.json");
    if settings.exists() || !dir.is_dir() {
        return Ok(false);
    }

    fs::write(&settings, "{}").map_err(|source| ReconcileError::Io {
        context: format!("Failed to create {}", settings.display()),
        source,
    })?;
    log::info!("Created empty {}", settings.display());
    Ok(true)
}

impl ToolAdapter for VsCodeExtension {
    fn kind(&self) -> ItemKind {
        ItemKind::EditorExtension
    }

    fn verify<'a>(
        &'a self,
        runner: &'a dyn CommandRunner,
        program: &str,
    ) -> Result<Option<Box<dyn VerifiedTool + 'a>>> {
        if !runner.run_status(program, &["--help"])? {
            return Ok(None);
        }

        let listed = runner.run(program, &["--list-extensions"])?;
        if !listed.success {
            log::warn!(
                "{} --list-extensions failed; treating every extension as missing",
                program
            );
        }
        let inventory = parse_inventory(&listed.stdout_str());
        log::debug!("{} extensions already installed", inventory.len());

        Ok(Some(Box::new(VerifiedCode {
            runner,
            program: program.to_string(),
            inventory,
            settings_dir: self.settings_dir.as_deref(),
        })))
    }
}

struct VerifiedCode<'a> {
    runner: &'a dyn CommandRunner,
    program: String,
    inventory: HashSet<String>,
    settings_dir: Option<&'a Path>,
}

impl VerifiedCode<'_> {
    fn is_installed(&self, identifier: &str) -> bool {
        self.inventory.contains(&identifier.to_lowercase())
    }
}

impl VerifiedTool for VerifiedCode<'_> {
    fn probe_duplicate(&self, item: &DesiredItem) -> Result<Probe> {
        Ok(if self.is_installed(&item.key) {
            Probe::Present {
                detail: "already exists".to_string(),
            }
        } else {
            Probe::Missing
        })
    }

    // The locator is informational; VS Code resolves the id itself.
    fn install(&self, item: &DesiredItem) -> Result<InstallOutcome> {
        if self.is_installed(&item.key) {
            return Ok(InstallOutcome::Skipped {
                reason: "already exists".to_string(),
            });
        }

        if item.key.eq_ignore_ascii_case(NEEDS_SETTINGS_FILE)
            && let Some(dir) = self.settings_dir
            && let Err(e) = ensure_settings_file(dir)
        {
            log::warn!("{}", e);
        }

        let output = self
            .runner
            .run(&self.program, &["--install-extension", &item.key])?;

        if output.stdout_str().contains(ALREADY_INSTALLED_MARKER) {
            return Ok(InstallOutcome::Failed {
                error: format!("{} reported it as already installed", self.program),
                output: Some(output),
            });
        }

        if output.success {
            Ok(InstallOutcome::Installed {
                output: Some(output),
            })
        } else {
            Ok(InstallOutcome::Failed {
                error: format!("{} --install-extension exited with failure", self.program),
                output: Some(output),
            })
        }
    }
}
