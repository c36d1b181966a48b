//! # Reconcile
//!
//! Idempotent reconciliation of desired install lists against what external
//! tools report as already installed.
//!
//! ## Core Concepts
//!
//! - **ItemKind**: a category of installable item with its own tool
//! - **DesiredSnapshot**: ordered `key -> locator` list for one kind, copied once per pass
//! - **ToolAdapter**: verifies a tool and hands out a [`VerifiedTool`] for probing and installing
//! - **Reconciler**: runs a pass over all kinds, installing or reporting only what is missing
//!
//! ## Example
//!
//! ```ignore
//! use reconcile::{NoObserver, Reconciler, RunMode};
//!
//! let reconciler = Reconciler::new(&runner, vec![Box::new(git), Box::new(code)]);
//! let summary = reconciler.run(&registry, RunMode::INSTALL_ALL, &mut NoObserver);
//! if summary.anything_installed() {
//!     println!("restart to pick up new items");
//! }
//! ```
//!
//! ## Provider Traits
//!
//! - [`CommandRunner`]: runs external tools
//! - [`DesiredStateSource`]: supplies desired lists by identifier
//! - [`InstalledRecord`]: items installed by earlier runs (latest-only mode)
//! - [`PassObserver`]: receives progress, results and notifications
//!
//! Passes are sequential and never abort early: a missing list, an unusable
//! tool or a failed install affects only its own kind or item.

pub mod adapter;
pub mod context;
pub mod error;
pub mod expand;
pub mod reconciler;
pub mod types;

// Re-export main types at crate root
pub use adapter::{ToolAdapter, VerifiedTool};
pub use context::{
    CommandRunner, DesiredStateSource, InstalledRecord, NoObserver, NoRecord, Notification,
    PassObserver,
};
pub use error::{ReconcileError, Result};
pub use expand::expand_vars;
pub use reconciler::{Reconciler, resolve_program};
pub use types::{
    CommandOutput, DesiredItem, DesiredSnapshot, InstallOutcome, ItemKind, PROGRAM_OVERRIDE_KEY,
    PassSummary, Probe, RunMode,
};
