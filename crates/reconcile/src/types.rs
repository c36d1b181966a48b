//! Core types for reconciliation passes

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::process::Output;

/// Reserved snapshot key that overrides the tool executable for a kind
pub const PROGRAM_OVERRIDE_KEY: &str = "program_pathname";

/// A category of installable item, each driven by its own external tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// A git repository cloned under the user-data root
    RepositoryClone,
    /// A VS Code extension
    EditorExtension,
}

impl ItemKind {
    /// All kinds. The binary registers one adapter per kind in this order.
    pub const ALL: [ItemKind; 2] = [Self::RepositoryClone, Self::EditorExtension];

    /// Identifier of the desired-state list for this kind
    pub fn source_id(&self) -> &'static str {
        match self {
            Self::RepositoryClone => "user.taip_git",
            Self::EditorExtension => "user.taip_vscode",
        }
    }

    /// Executable used when the list carries no `program_pathname` override
    pub fn default_program(&self) -> &'static str {
        match self {
            Self::RepositoryClone => "git",
            Self::EditorExtension => "code",
        }
    }

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            Self::RepositoryClone => "git repository",
            Self::EditorExtension => "VS Code extension",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source_id())
    }
}

/// One desired entry: a key understood by the kind's adapter and a locator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredItem {
    pub key: String,
    pub locator: String,
}

impl DesiredItem {
    pub fn new(key: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            locator: locator.into(),
        }
    }
}

impl fmt::Display for DesiredItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.key, self.locator)
    }
}

/// Ordered `key -> locator` mapping for one item kind.
///
/// Iteration follows insertion order. Inserting an existing key replaces its
/// locator in place, so the first occurrence fixes the position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredSnapshot {
    items: Vec<DesiredItem>,
}

impl DesiredSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry, returning the previous locator
    pub fn insert(&mut self, key: impl Into<String>, locator: impl Into<String>) -> Option<String> {
        let key = key.into();
        let locator = locator.into();

        match self.items.iter_mut().find(|item| item.key == key) {
            Some(existing) => Some(std::mem::replace(&mut existing.locator, locator)),
            None => {
                self.items.push(DesiredItem { key, locator });
                None
            }
        }
    }

    /// Remove an entry by key
    pub fn remove(&mut self, key: &str) -> Option<DesiredItem> {
        let pos = self.items.iter().position(|item| item.key == key)?;
        Some(self.items.remove(pos))
    }

    /// Remove the reserved `program_pathname` entry and return its value
    pub fn take_program_override(&mut self) -> Option<String> {
        self.remove(PROGRAM_OVERRIDE_KEY).map(|item| item.locator)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|item| item.key == key)
            .map(|item| item.locator.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.items.iter().any(|item| item.key == key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DesiredItem> {
        self.items.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DesiredSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (key, locator) in iter {
            snapshot.insert(key, locator);
        }
        snapshot
    }
}

impl IntoIterator for DesiredSnapshot {
    type Item = DesiredItem;
    type IntoIter = std::vec::IntoIter<DesiredItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a DesiredSnapshot {
    type Item = &'a DesiredItem;
    type IntoIter = std::slice::Iter<'a, DesiredItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<'de> Deserialize<'de> for DesiredSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SnapshotVisitor;

        impl<'de> Visitor<'de> for SnapshotVisitor {
            type Value = DesiredSnapshot;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of item keys to locator strings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut snapshot = DesiredSnapshot::new();
                while let Some((key, locator)) = map.next_entry::<String, String>()? {
                    snapshot.insert(key, locator);
                }
                Ok(snapshot)
            }
        }

        deserializer.deserialize_map(SnapshotVisitor)
    }
}

/// What an adapter found when checking a single item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// Already installed; `detail` says where or how it was detected
    Present { detail: String },
    /// Not installed yet
    Missing,
}

impl Probe {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present { .. })
    }
}

/// Result of installing one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Already present, nothing was run
    Skipped { reason: String },
    /// The tool reported success
    Installed { output: Option<CommandOutput> },
    /// The tool failed, or reported that nothing was done
    Failed {
        error: String,
        output: Option<CommandOutput>,
    },
}

impl InstallOutcome {
    pub fn is_installed(&self) -> bool {
        matches!(self, Self::Installed { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Captured tool output, if a subprocess ran
    pub fn output(&self) -> Option<&CommandOutput> {
        match self {
            Self::Installed { output } | Self::Failed { output, .. } => output.as_ref(),
            Self::Skipped { .. } => None,
        }
    }
}

/// The two independent switches of a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunMode {
    /// Install missing items, or only report them
    pub install: bool,
    /// Exclude items recorded as previously installed
    pub latest: bool,
}

impl RunMode {
    pub const PRINT_LATEST: Self = Self {
        install: false,
        latest: true,
    };
    pub const PRINT_ALL: Self = Self {
        install: false,
        latest: false,
    };
    pub const INSTALL_LATEST: Self = Self {
        install: true,
        latest: true,
    };
    pub const INSTALL_ALL: Self = Self {
        install: true,
        latest: false,
    };

    /// Action label such as "Install latest" or "Print"
    pub fn action(&self) -> &'static str {
        match (self.install, self.latest) {
            (true, true) => "Install latest",
            (true, false) => "Install",
            (false, true) => "Print latest",
            (false, false) => "Print",
        }
    }
}

/// Captured output of an external tool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub success: bool,
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            stdout: output.stdout,
            stderr: output.stderr,
            success: output.status.success(),
        }
    }
}

impl CommandOutput {
    pub fn new(success: bool, stdout: impl Into<Vec<u8>>, stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            success,
        }
    }

    /// Get stdout as a string
    pub fn stdout_str(&self) -> String {
        String::from_utf8_lossy(&self.stdout).to_string()
    }

    /// Get stderr as a string
    pub fn stderr_str(&self) -> String {
        String::from_utf8_lossy(&self.stderr).to_string()
    }
}

/// Counts collected over one pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub installed: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Items listed in report-only mode
    pub reported: usize,
    /// Items pruned because they were recorded as previously installed
    pub previously_installed: usize,
    /// Kinds that could not be processed at all
    pub kind_errors: usize,
}

impl PassSummary {
    /// Whether at least one item was newly installed
    pub fn anything_installed(&self) -> bool {
        self.installed > 0
    }

    /// No item or kind failed
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.kind_errors == 0
    }

    /// Add an install outcome to the summary
    pub fn add_outcome(&mut self, outcome: &InstallOutcome) {
        match outcome {
            InstallOutcome::Skipped { .. } => self.skipped += 1,
            InstallOutcome::Installed { .. } => self.installed += 1,
            InstallOutcome::Failed { .. } => self.failed += 1,
        }
    }
}
