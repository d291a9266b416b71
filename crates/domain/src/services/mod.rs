//! Shared service helpers such as payment-counter syncing and telemetry
//! wiring.

pub mod counter_sync;
pub mod telemetry;

pub use counter_sync::*;
pub use telemetry::*;
