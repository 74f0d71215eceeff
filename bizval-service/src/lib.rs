//! bizval-service - HTTP front end for the business valuation calculator.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod error;
pub mod notifier;
pub mod routes;
pub mod store;

pub use error::ServiceError;
pub use notifier::{notifier_from_config, ChannelsNotifier, LogNotifier, Notifier};
pub use routes::{build_router, AppState, CalculateResponse, SERVICE_NAME};
pub use store::{InMemoryStore, ValuationStore};
