//! Debugger Adapters - Implementations of the debugger ports.

mod scripted;

pub use scripted::ScriptedDebugger;
