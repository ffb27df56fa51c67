//! Project delivery tracking.
//!
//! This module covers projects, their tasks and the time entries logged
//! against them: the status state machine with its cascades, date nesting
//! between tasks and projects, and the approval workflow that rolls hours up
//! from entries to tasks to projects. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
