//! Error taxonomy
//!
//! Everything here is caught at the point of occurrence and rendered as
//! a user-visible message; a failed action never tears down the session.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolshedError {
    #[error("invalid input '{0}'")]
    InvalidMenuInput(String),

    #[error("unknown tool '{0}'")]
    ToolNotFound(String),

    #[error("no supported package manager detected on this system")]
    PackageManagerUnavailable,

    #[error("install of '{tool}' failed: {reason}")]
    InstallFailed { tool: String, reason: String },

    #[error("removal of '{tool}' failed: {reason}")]
    RemoveFailed { tool: String, reason: String },

    #[error("'{0}' is installed but its version output could not be parsed")]
    ProbeAmbiguous(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_tool() {
        let err = ToolshedError::InstallFailed {
            tool: "jq".to_string(),
            reason: "network unreachable".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("jq"));
        assert!(msg.contains("network unreachable"));

        assert!(
            ToolshedError::ToolNotFound("nope".to_string())
                .to_string()
                .contains("nope")
        );
    }
}
