//! Shared world state for time approval BDD scenarios.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;
use worklog::delivery::{
    adapters::memory::InMemoryDeliveryRepository,
    domain::{ProjectId, TaskId, TimeEntry},
    services::{DeliveryService, DeliveryServiceError},
};

/// Clock pinned to the scenario's "now".
#[derive(Debug, Clone, Copy)]
pub struct ScenarioClock(pub DateTime<Utc>);

impl Clock for ScenarioClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Service type used by the BDD world.
pub type TestDeliveryService = DeliveryService<InMemoryDeliveryRepository, ScenarioClock>;

/// Scenario world for time approval behaviour tests.
pub struct ApprovalWorld {
    pub service: TestDeliveryService,
    pub now: DateTime<Utc>,
    pub project_id: Option<ProjectId>,
    pub task_id: Option<TaskId>,
    pub entry: Option<TimeEntry>,
    pub last_result: Option<Result<TimeEntry, DeliveryServiceError>>,
}

impl ApprovalWorld {
    /// Creates a world whose clock reads a fixed weekday morning.
    ///
    /// # Panics
    ///
    /// Never in practice; the timestamp is a valid calendar date.
    #[must_use]
    pub fn new() -> Self {
        let now = Utc
            .with_ymd_and_hms(2026, 6, 1, 9, 0, 0)
            .single()
            .expect("valid calendar date");
        let service = DeliveryService::new(
            Arc::new(InMemoryDeliveryRepository::new()),
            Arc::new(ScenarioClock(now)),
        );

        Self {
            service,
            now,
            project_id: None,
            task_id: None,
            entry: None,
            last_result: None,
        }
    }

    /// Returns the project created by the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error if no project has been created yet.
    pub fn project_id(&self) -> Result<&ProjectId, eyre::Report> {
        self.project_id
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing project in scenario world"))
    }

    /// Returns the entry created by the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error if no entry has been started yet.
    pub fn entry(&self) -> Result<&TimeEntry, eyre::Report> {
        self.entry
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing time entry in scenario world"))
    }
}

impl Default for ApprovalWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ApprovalWorld {
    ApprovalWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
