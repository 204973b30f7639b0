//! Infrastructure layer.

pub mod api;
pub mod storage;

pub use self::{api::Api, storage::Storage};
