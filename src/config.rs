//! Registry file: the desired-state lists and run settings
//!
//! ```toml
//! [settings]
//! user_dir = "~/.talon/user"
//!
//! [lists."user.taip_git"]
//! program_pathname = "$HOME/bin/git"
//! "talonhub/community community" = "https://github.com/talonhub/community"
//!
//! [lists."user.taip_vscode"]
//! "pokey.cursorless" = "https://marketplace.visualstudio.com/items?itemName=pokey.cursorless"
//! ```
//!
//! Entries keep the order they are written in. A `.json` file with the same
//! shape is read the same way.

use anyhow::{Context, Result};
use reconcile::{DesiredSnapshot, DesiredStateSource};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// On-disk format of a registry file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryFormat {
    Toml,
    Json,
}

impl RegistryFormat {
    /// Pick the format from the file extension; anything but `.json` is TOML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

/// Settings that apply to the whole run
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Root directory clone destinations are relative to
    #[serde(default)]
    pub user_dir: Option<String>,
}

/// The parsed registry file
#[derive(Debug, Default, Deserialize)]
pub struct Registry {
    #[serde(default)]
    pub settings: Settings,

    /// Desired-state lists keyed by list identifier (e.g. `user.taip_git`)
    #[serde(default)]
    pub lists: HashMap<String, DesiredSnapshot>,
}

impl Registry {
    /// Load a registry file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).with_context(|| {
            format!(
                "Could not read registry file {} (create it or pass --config)",
                path.display()
            )
        })?;

        let registry = Self::parse(&content, RegistryFormat::from_path(path))
            .with_context(|| format!("Invalid registry file: {}", path.display()))?;

        log::debug!(
            "Loaded registry from {} ({} lists)",
            path.display(),
            registry.lists.len()
        );
        Ok(registry)
    }

    /// Parse registry content in the given format
    pub fn parse(content: &str, format: RegistryFormat) -> Result<Self> {
        match format {
            RegistryFormat::Toml => toml::from_str(content).context("Invalid TOML format"),
            RegistryFormat::Json => serde_json::from_str(content).context("Invalid JSON format"),
        }
    }

    /// Identifiers of all lists, sorted
    pub fn list_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.lists.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl DesiredStateSource for Registry {
    fn snapshot(&self, source_id: &str) -> Option<DesiredSnapshot> {
        self.lists.get(source_id).cloned()
    }
}

// ============================================================================
// Tests
// ============================================================================
