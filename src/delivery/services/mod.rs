//! Application services for delivery orchestration.

mod delivery;
mod portfolio;
mod requests;

pub use delivery::{DeliveryService, DeliveryServiceError, DeliveryServiceResult};
pub use requests::{AddTaskRequest, CreateProjectRequest, StartTimeEntryRequest};
