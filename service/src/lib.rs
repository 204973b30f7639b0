//! Service contains the business logic of the supply chain dashboard.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod export;
pub mod infra;
pub mod query;
pub mod read;

use common::money::Currency;
use smart_default::SmartDefault;

#[cfg(doc)]
use self::{
    domain::Order,
    infra::{Api, Storage},
};

pub use self::{command::Command, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// [`read::metrics::Weights`] of the supplier performance score.
    pub weights: read::metrics::Weights,

    /// [`Currency`] revenue is reported in.
    ///
    /// [`Order`]s in other currencies are not counted as revenue.
    #[default(Currency::Usd)]
    pub currency: Currency,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<A, S> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Api`] of this [`Service`].
    api: A,

    /// [`Storage`] of this [`Service`].
    storage: S,
}

impl<A, S> Service<A, S> {
    /// Creates a new [`Service`] with the provided parameters.
    #[must_use]
    pub const fn new(config: Config, api: A, storage: S) -> Self {
        Self {
            config,
            api,
            storage,
        }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Api`] of this [`Service`].
    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Returns [`Storage`] of this [`Service`].
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
pub(crate) mod spec {
    use crate::{
        infra::{api, storage},
        Config, Service,
    };

    /// [`Service`] backed by in-memory [`api::Memory`] and
    /// [`storage::Memory`].
    pub(crate) type TestService = Service<api::Memory, storage::Memory>;

    /// Creates a new [`TestService`] over the provided [`api::Memory`].
    pub(crate) fn service(api: api::Memory) -> TestService {
        Service::new(Config::default(), api, storage::Memory::default())
    }
}
