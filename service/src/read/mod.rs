//! Read models definitions.

pub mod metrics;
pub mod order;
pub mod supplier;
