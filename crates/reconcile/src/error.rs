//! Error types for reconciliation.
//!
//! Every variant is scoped to one item kind or one item. The reconciler
//! reports them and moves on; none of them aborts a pass.

use thiserror::Error;

/// Errors raised while reconciling a kind or installing an item.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The desired-state list for a kind does not exist
    #[error("Could not find list: {source_id}")]
    ConfigurationMissing {
        /// Identifier of the missing list
        source_id: String,
    },

    /// The tool binary is missing or does not run
    #[error("Could not find program (from {source_id}): {program}")]
    ToolUnverifiable {
        /// Identifier of the list that selected the program
        source_id: String,
        /// Program path after expansion
        program: String,
    },

    /// An item key the adapter cannot interpret
    #[error("invalid item key `{key}`: {reason}")]
    InvalidItemKey {
        /// The offending key
        key: String,
        /// Why it was rejected
        reason: String,
    },

    /// A subprocess could not be started
    #[error("failed to execute {program}: {source}")]
    Command {
        /// Program that failed to start
        program: String,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// Filesystem error outside a subprocess
    #[error("{context}: {source}")]
    Io {
        /// What was being done
        context: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Result type for reconciliation operations.
pub type Result<T> = std::result::Result<T, ReconcileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_list_and_program() {
        let err = ReconcileError::ToolUnverifiable {
            source_id: "user.taip_vscode".into(),
            program: "/usr/bin/code".into(),
        };
        assert_eq!(
            err.to_string(),
            "Could not find program (from user.taip_vscode): /usr/bin/code"
        );
    }
}
