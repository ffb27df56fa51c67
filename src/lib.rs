//! Worklog: project delivery and time tracking.
//!
//! This crate models projects, the tasks nested inside them and the time
//! entries employees log against those tasks. Approved hours roll up from
//! entries to tasks to projects, and status changes cascade from projects to
//! their tasks.
//!
//! # Architecture
//!
//! Worklog follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence
//! - **Adapters**: Concrete implementations of ports
//! - **Services**: Use-case orchestration over ports, with structured logging
//!
//! # Modules
//!
//! - [`delivery`]: Projects, tasks, time entries and their lifecycle rules

pub mod delivery;
