//! Debugger Backend Port - The live debugging session behind the tools.
//!
//! The backend is a shared, serializing resource: implementations must be
//! safe to call from any task, and may run commands one at a time.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Port for running debugger commands against the open dump.
#[async_trait]
pub trait DebuggerBackend: Send + Sync {
    /// Runs a raw command and returns its text output.
    async fn execute(&self, command: &str) -> Result<String, BackendError>;

    /// Returns the call stack of one thread as text.
    async fn thread_stack(&self, thread_id: &str) -> Result<String, BackendError>;
}

/// Port for the object-inspection engine.
#[async_trait]
pub trait ObjectInspector: Send + Sync {
    /// Returns a structured summary of the object at `address`, expanding
    /// nested objects up to `max_depth` levels.
    async fn inspect(&self, address: &str, max_depth: u32) -> Result<Value, BackendError>;
}

/// Debugger backend errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The command ran but reported failure.
    #[error("command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },

    /// The thread id is not present in the dump.
    #[error("thread '{0}' not found")]
    ThreadNotFound(String),

    /// Nothing inspectable lives at the address.
    #[error("no object at address {0}")]
    InvalidAddress(String),

    /// No session is attached.
    #[error("debugger unavailable: {0}")]
    Unavailable(String),
}

impl BackendError {
    pub fn command_failed(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CommandFailed {
            command: command.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failed_names_command() {
        let err = BackendError::command_failed("!dumpheap -stat", "heap is corrupt");
        assert_eq!(err.to_string(), "command '!dumpheap -stat' failed: heap is corrupt");
    }
}
