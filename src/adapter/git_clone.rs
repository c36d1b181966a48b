//! Git repository clone adapter
//!
//! Desired keys look like shell arguments to `git clone`, ending in the
//! destination directory relative to the user-data root:
//!
//! ```toml
//! "github.com/org/repo --branch main mydir" = "https://github.com/org/repo"
//! ```

use reconcile::{
    CommandRunner, DesiredItem, InstallOutcome, ItemKind, Probe, ReconcileError, Result,
    ToolAdapter, VerifiedTool,
};
use std::path::{Path, PathBuf};

/// Clones repositories with `git clone --depth 1`
#[derive(Debug, Clone)]
pub struct GitClone {
    user_dir: PathBuf,
}

impl GitClone {
    pub fn new(user_dir: PathBuf) -> Self {
        Self { user_dir }
    }
}

/// Where a clone key points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneTarget {
    /// Destination directory already exists
    Existing(PathBuf),
    /// Arguments to pass after `clone <url> --depth 1`, destination made absolute
    Pending(Vec<String>),
}

/// Split a clone key into arguments and resolve its destination.
///
/// The last shell token is always taken as the destination, joined onto
/// `root`. A key whose last token was not meant as a path, or names an
/// unrelated directory that happens to exist, is still treated that way:
/// duplicates are recognised by path alone.
pub fn parse_clone_key(key: &str, root: &Path) -> Result<CloneTarget> {
    let mut args = shlex::split(key).ok_or_else(|| ReconcileError::InvalidItemKey {
        key: key.to_string(),
        reason: "unbalanced quotes or trailing escape".to_string(),
    })?;

    let Some(last) = args.last_mut() else {
        return Err(ReconcileError::InvalidItemKey {
            key: key.to_string(),
            reason: "no destination directory".to_string(),
        });
    };

    let destination = root.join(last.as_str());
    if destination.is_dir() {
        return Ok(CloneTarget::Existing(destination));
    }

    *last = destination.to_string_lossy().into_owned();
    Ok(CloneTarget::Pending(args))
}

impl ToolAdapter for GitClone {
    fn kind(&self) -> ItemKind {
        ItemKind::RepositoryClone
    }

    fn verify<'a>(
        &'a self,
        runner: &'a dyn CommandRunner,
        program: &str,
    ) -> Result<Option<Box<dyn VerifiedTool + 'a>>> {
        if !runner.run_status(program, &["version"])? {
            return Ok(None);
        }

        Ok(Some(Box::new(VerifiedGit {
            runner,
            program: program.to_string(),
            user_dir: &self.user_dir,
        })))
    }
}

struct VerifiedGit<'a> {
    runner: &'a dyn CommandRunner,
    program: String,
    user_dir: &'a Path,
}

impl VerifiedTool for VerifiedGit<'_> {
    fn probe_duplicate(&self, item: &DesiredItem) -> Result<Probe> {
        Ok(match parse_clone_key(&item.key, self.user_dir)? {
            CloneTarget::Existing(path) => Probe::Present {
                detail: format!("already exists: {}", path.display()),
            },
            CloneTarget::Pending(_) => Probe::Missing,
        })
    }

    fn install(&self, item: &DesiredItem) -> Result<InstallOutcome> {
        let clone_args = match parse_clone_key(&item.key, self.user_dir)? {
            CloneTarget::Existing(path) => {
                return Ok(InstallOutcome::Skipped {
                    reason: format!("already exists: {}", path.display()),
                });
            }
            CloneTarget::Pending(args) => args,
        };

        // --depth implies --single-branch
        let mut args = vec!["clone", item.locator.as_str(), "--depth", "1"];
        args.extend(clone_args.iter().map(String::as_str));

        let output = self.runner.run(&self.program, &args)?;
        if output.success {
            Ok(InstallOutcome::Installed {
                output: Some(output),
            })
        } else {
            Ok(InstallOutcome::Failed {
                error: format!("{} clone exited with failure", self.program),
                output: Some(output),
            })
        }
    }
}
