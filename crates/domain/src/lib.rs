//! Domain-level building blocks shared across the API, gateway, and storage
//! crates: environment-driven configuration, the core contest/user/payment
//! models, the storage trait contracts, and the payment-counter sync service.

pub mod config;
pub mod model;
pub mod services;
pub mod storage;

pub use config::*;
pub use model::*;
pub use services::*;
pub use storage::*;
