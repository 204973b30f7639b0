//! [`Api`]-related implementations.

#[cfg(any(test, feature = "memory"))]
pub mod memory;
#[cfg(feature = "rest")]
pub mod rest;

use derive_more::{Display, Error as StdError, From};
use secrecy::SecretBox;

#[cfg(doc)]
use crate::domain::{Notification, Order, User};
use crate::domain::{
    notification,
    order::{self, Action},
    user::{self, session},
};

#[cfg(any(test, feature = "memory"))]
pub use self::memory::Memory;
#[cfg(feature = "rest")]
pub use self::rest::Rest;

/// Remote API operation.
pub use common::Handler as Api;

/// Operation signing a [`User`] in with their credentials.
#[derive(Debug)]
pub struct Login {
    /// [`user::Email`] of the [`User`].
    pub email: user::Email,

    /// [`user::Password`] of the [`User`].
    pub password: SecretBox<user::Password>,
}

/// Operation signing the current [`User`] out.
#[derive(Clone, Copy, Debug)]
pub struct Logout;

/// Operation setting the [`session::Token`] every following request is
/// authenticated with.
///
/// [`None`] makes the following requests anonymous.
#[derive(Clone, Debug)]
pub struct Authenticate(pub Option<session::Token>);

/// Operation requesting an [`Order`] status transition.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transition {
    /// ID of the [`Order`] to transit.
    pub order_id: order::Id,

    /// [`Action`] to perform.
    pub action: Action,

    /// [`order::Status`] the [`Order`] is expected to get.
    pub status: order::Status,

    /// Comment to leave in the [`order::History`].
    pub comment: Option<String>,
}

/// Operation marking a [`Notification`] as read.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarkRead(pub notification::Id);

/// [`Api`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// API responded with a non-successful status.
    #[display("API responded with `{status}` status: {message}")]
    #[from(ignore)]
    Response {
        /// HTTP status code of the response.
        status: u16,

        /// Message extracted from the response.
        message: String,
    },

    /// API returned data not fitting the domain.
    #[display("API returned malformed data: {_0}")]
    #[from(ignore)]
    InvalidData(#[error(not(source))] String),

    /// Configured base URL of the API is not a valid one.
    #[display("Invalid API base URL: `{_0}`")]
    #[from(ignore)]
    BaseUrl(#[error(not(source))] String),

    /// Request requires a signed-in [`User`], but there is none.
    #[display("Not signed in")]
    #[from(ignore)]
    Unauthenticated,

    /// Failed to perform an HTTP request.
    #[cfg(feature = "rest")]
    #[display("API request failed: {_0}")]
    Request(reqwest::Error),
}

impl Error {
    /// Creates a new [`Error::Response`] out of the provided parts.
    #[must_use]
    pub fn response(status: u16, message: impl Into<String>) -> Self {
        Self::Response {
            status,
            message: message.into(),
        }
    }

    /// Returns the HTTP status code the API responded with, if it did.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            Self::BaseUrl(_) | Self::InvalidData(_) | Self::Unauthenticated => {
                None
            }
            #[cfg(feature = "rest")]
            Self::Request(e) => e.status().map(|s| s.as_u16()),
        }
    }

    /// Indicates whether the API rejected the request as unauthenticated.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthenticated) || self.status() == Some(401)
    }

    /// Returns the message describing this [`Error`] to a [`User`].
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Response { message, .. } => message.clone(),
            Self::BaseUrl(_) | Self::InvalidData(_) | Self::Unauthenticated => {
                self.to_string()
            }
            #[cfg(feature = "rest")]
            Self::Request(e) if e.is_timeout() => {
                "API did not respond in time".to_owned()
            }
            #[cfg(feature = "rest")]
            Self::Request(e) if e.is_connect() => {
                "Cannot connect to the API".to_owned()
            }
            #[cfg(feature = "rest")]
            Self::Request(_) => self.to_string(),
        }
    }
}
