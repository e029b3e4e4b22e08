//! Scripted debugger for tests and offline runs.
//!
//! Answers commands, thread stacks and object inspections from fixed tables
//! and records every command it is asked to run.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::ports::{BackendError, DebuggerBackend, ObjectInspector};

/// Debugger backend answering from prepared tables.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDebugger {
    outputs: HashMap<String, Result<String, String>>,
    stacks: HashMap<String, String>,
    objects: HashMap<String, Value>,
    executed: Arc<Mutex<Vec<String>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ScriptedDebugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the output for a command.
    pub fn with_output(mut self, command: impl Into<String>, output: impl Into<String>) -> Self {
        self.outputs.insert(command.into(), Ok(output.into()));
        self
    }

    /// Registers a command that fails.
    pub fn with_failure(mut self, command: impl Into<String>, message: impl Into<String>) -> Self {
        self.outputs.insert(command.into(), Err(message.into()));
        self
    }

    pub fn with_stack(mut self, thread_id: impl Into<String>, stack: impl Into<String>) -> Self {
        self.stacks.insert(thread_id.into(), stack.into());
        self
    }

    pub fn with_object(mut self, address: impl Into<String>, summary: Value) -> Self {
        self.objects.insert(address.into(), summary);
        self
    }

    /// Commands executed so far, in order.
    pub fn executed(&self) -> Vec<String> {
        lock(&self.executed).clone()
    }

    pub fn execution_count(&self) -> usize {
        lock(&self.executed).len()
    }
}

#[async_trait]
impl DebuggerBackend for ScriptedDebugger {
    async fn execute(&self, command: &str) -> Result<String, BackendError> {
        lock(&self.executed).push(command.to_string());
        match self.outputs.get(command) {
            Some(Ok(output)) => Ok(output.clone()),
            Some(Err(message)) => Err(BackendError::command_failed(command, message.clone())),
            None => Err(BackendError::command_failed(command, "unknown command")),
        }
    }

    async fn thread_stack(&self, thread_id: &str) -> Result<String, BackendError> {
        self.stacks
            .get(thread_id)
            .cloned()
            .ok_or_else(|| BackendError::ThreadNotFound(thread_id.to_string()))
    }
}

#[async_trait]
impl ObjectInspector for ScriptedDebugger {
    async fn inspect(&self, address: &str, max_depth: u32) -> Result<Value, BackendError> {
        let mut summary = self
            .objects
            .get(address)
            .cloned()
            .ok_or_else(|| BackendError::InvalidAddress(address.to_string()))?;
        if let Value::Object(map) = &mut summary {
            map.insert("maxDepth".to_string(), Value::from(max_depth));
        }
        Ok(summary)
    }
}
