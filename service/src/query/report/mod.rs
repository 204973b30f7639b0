//! Report [`Query`] definitions.
//!
//! [`Query`]: super::Query

pub mod kpi;
pub mod supplier_performance;

pub use self::{kpi::Kpi, supplier_performance::SupplierPerformance};
