//! Tool adapters for each item kind
//!
//! Each adapter wraps one external tool. The reconciler only sees them
//! through [`reconcile::ToolAdapter`].

use reconcile::{ItemKind, ToolAdapter};
use std::path::PathBuf;

pub mod git_clone;
pub mod vscode_extension;

pub use git_clone::GitClone;
pub use vscode_extension::VsCodeExtension;

/// One adapter per kind, in [`ItemKind::ALL`] order
pub fn registered(user_dir: PathBuf) -> Vec<Box<dyn ToolAdapter>> {
    ItemKind::ALL
        .into_iter()
        .map(|kind| -> Box<dyn ToolAdapter> {
            match kind {
                ItemKind::RepositoryClone => Box::new(GitClone::new(user_dir.clone())),
                ItemKind::EditorExtension => Box::new(VsCodeExtension::new()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_adapters_follow_item_kind_order() {
        let kinds: Vec<_> = registered(PathBuf::from("/tmp/talon-user"))
            .iter()
            .map(|adapter| adapter.kind())
            .collect();
        assert_eq!(kinds, ItemKind::ALL);
    }
}
