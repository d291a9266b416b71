//! Trait contracts the storage crate implements and handlers depend on.

pub mod traits;

pub use traits::*;
