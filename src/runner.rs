use reconcile::{CommandOutput, CommandRunner, ReconcileError};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Runs external tools as blocking child processes
///
/// On Windows children are created without a console window, and bare
/// program names are looked up through PATHEXT so `code` finds `code.cmd`.
pub struct SystemRunner;

/// Path to hand to `Command` for `program`
fn locate(program: &str) -> PathBuf {
    if cfg!(windows) {
        locate_with(program, |name| which::which(name).ok())
    } else {
        PathBuf::from(program)
    }
}

/// Names with an extension are used as given; others go through `find`
fn locate_with<F>(program: &str, find: F) -> PathBuf
where
    F: FnOnce(&str) -> Option<PathBuf>,
{
    if Path::new(program).extension().is_some() {
        return PathBuf::from(program);
    }

    match find(program) {
        Some(found) => {
            log::debug!("Resolved {} to {}", program, found.display());
            found
        }
        None => PathBuf::from(program),
    }
}

impl SystemRunner {
    fn command(program: &str, args: &[&str]) -> Command {
        log::debug!("Running: {} {}", program, args.join(" "));

        let mut cmd = Command::new(locate(program));
        cmd.args(args).stdin(Stdio::null());

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            cmd.creation_flags(CREATE_NO_WINDOW);
        }

        cmd
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> reconcile::Result<CommandOutput> {
        Self::command(program, args)
            .output()
            .map(CommandOutput::from)
            .map_err(|source| ReconcileError::Command {
                program: program.to_string(),
                source,
            })
    }

    fn run_status(&self, program: &str, args: &[&str]) -> reconcile::Result<bool> {
        Self::command(program, args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .map_err(|source| ReconcileError::Command {
                program: program.to_string(),
                source,
            })
    }
}
