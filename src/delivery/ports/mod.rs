//! Port contracts for delivery persistence.

mod repository;

pub use repository::{DeliveryRepository, DeliveryRepositoryError, DeliveryRepositoryResult};
