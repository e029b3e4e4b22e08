//! Dump Analyst - Model-driven crash and dump analysis
//!
//! This crate lets a connected language model diagnose a crash or performance
//! dump by issuing structured tool calls (debugger commands, crash report
//! queries, object inspection) until it declares the analysis complete.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
