//! Domain layer - value objects and rules for property valuation.
//!
//! Nothing in here performs I/O. Ports and adapters handle the outside world.

pub mod foundation;
pub mod valuation;
