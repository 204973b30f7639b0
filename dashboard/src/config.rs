//! [`Config`]-related definitions.

use std::{path::PathBuf, time};

use common::money::Currency;
use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use rust_decimal::Decimal;
use serde::Deserialize;
use service::{infra::api::rest, read::metrics};
use smart_default::SmartDefault;

use crate::{define_error, Error};

/// Dashboard configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// API configuration.
    #[serde(default)]
    pub api: Api,

    /// Local storage configuration.
    #[serde(default)]
    pub storage: Storage,

    /// Metrics configuration.
    #[serde(default)]
    pub metrics: Metrics,

    /// Log configuration.
    #[serde(default)]
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }

    /// Returns the [`rest::Config`] of the API client.
    #[must_use]
    pub fn rest(&self) -> rest::Config {
        rest::Config {
            base_url: self.api.base_url.clone(),
            timeout: self.api.timeout,
            currency: self.metrics.currency,
        }
    }
}

/// API configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Api {
    /// Base URL every API path is relative to.
    #[default("http://127.0.0.1:5000/api".to_owned())]
    pub base_url: String,

    /// Timeout of a single request.
    #[default(time::Duration::from_secs(30))]
    #[serde(with = "humantime_serde")]
    pub timeout: time::Duration,
}

/// Local storage configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Storage {
    /// Path to the JSON file keeping the session and the cart.
    #[default(PathBuf::from(".dashboard/storage.json"))]
    pub path: PathBuf,
}

/// Metrics configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Metrics {
    /// Weights of the supplier performance score.
    pub weights: Weights,

    /// Currency revenue is reported in.
    #[default(Currency::Usd)]
    pub currency: Currency,
}

impl TryFrom<Metrics> for service::Config {
    type Error = Error;

    fn try_from(value: Metrics) -> Result<Self, Self::Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_WEIGHTS"]
                #[status = BAD_REQUEST]
                #[message = "Performance score weights must not be negative \
                             and must sum up to 1"]
                InvalidWeights,
            }
        }

        let Metrics {
            weights:
                Weights {
                    on_time,
                    quality,
                    cost_efficiency,
                },
            currency,
        } = value;

        Ok(Self {
            weights: metrics::Weights::new(on_time, quality, cost_efficiency)
                .ok_or(Error::InvalidWeights)?,
            currency,
        })
    }
}

/// Weights of the supplier performance score.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Weights {
    /// Weight of the on-time delivery percentage.
    #[default(Decimal::new(4, 1))]
    pub on_time: Decimal,

    /// Weight of the quality rating.
    #[default(Decimal::new(4, 1))]
    pub quality: Decimal,

    /// Weight of the cost efficiency rating.
    #[default(Decimal::new(2, 1))]
    pub cost_efficiency: Decimal,
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}
