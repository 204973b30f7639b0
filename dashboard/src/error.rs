//! [`Error`]-related definitions.

use std::fmt;

use derive_more::Error as StdError;
use service::{export, infra::api, infra::storage};
use tracerr::{Trace, Traced};

/// Defines a new error type.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[status = $status_code:ident]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Error type.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        #[repr(u16)]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                match err {
                    $(
                        $name::$variant => Self {
                            code: $code,
                            status_code: ::http::StatusCode::$status_code,
                            message: $message.to_string(),
                            backtrace: None,
                        },
                    )*
                }
            }
        }
    };
}

/// User-facing notification [`Error`].
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// [`http::StatusCode`] classifying this [`Error`].
    pub status_code: http::StatusCode,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// [`Error`] message.
    pub message: String,
}

impl Error {
    /// Create a new [`Error`] representing an internal failure.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self {
            code: "INTERNAL_ERROR",
            status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            backtrace: None,
        }
    }

    /// Creates a new [`Error`] out of the provided API response
    /// `status_code` and `message`.
    #[must_use]
    pub fn api(status_code: http::StatusCode, message: String) -> Self {
        use http::StatusCode as S;

        let code = match status_code {
            S::BAD_REQUEST | S::UNPROCESSABLE_ENTITY => "BAD_REQUEST",
            S::UNAUTHORIZED => "UNAUTHORIZED",
            S::FORBIDDEN => "FORBIDDEN",
            S::NOT_FOUND => "NOT_FOUND",
            S::CONFLICT => "CONFLICT",
            s if s.is_server_error() => "API_UNAVAILABLE",
            _ => "API_ERROR",
        };
        Self {
            code,
            status_code,
            message,
            backtrace: None,
        }
    }

    /// Returns the process exit code to report this [`Error`] with.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        if self.status_code.is_client_error() {
            2
        } else {
            1
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { code, message, .. } = self;
        write!(f, "[{code}]: {message}")
    }
}

/// [`Error`] code.
pub type Code = &'static str;

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type cannot be converted into an [`Error`].
    fn try_as_error(&self) -> Option<Error>;

    /// Converts the type into an [`Error`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError + fmt::Display> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }

    fn as_error(&self) -> Error {
        let mut error = self.as_ref().as_error();
        error.backtrace = Some(self.trace().clone());
        error
    }
}

impl AsError for api::Error {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Response { status, message } => Some(Error::api(
                http::StatusCode::from_u16(*status)
                    .unwrap_or(http::StatusCode::BAD_GATEWAY),
                message.clone(),
            )),
            Self::Unauthenticated => Some(Error {
                code: "NOT_SIGNED_IN",
                status_code: http::StatusCode::UNAUTHORIZED,
                message: "Sign in first".to_owned(),
                backtrace: None,
            }),
            Self::InvalidData(_) => Some(Error::api(
                http::StatusCode::BAD_GATEWAY,
                self.message(),
            )),
            Self::Request(e) if e.is_timeout() || e.is_connect() => {
                Some(Error {
                    code: "API_UNAVAILABLE",
                    status_code: http::StatusCode::SERVICE_UNAVAILABLE,
                    message: self.message(),
                    backtrace: None,
                })
            }
            Self::BaseUrl(_) | Self::Request(_) => None,
        }
    }
}

impl AsError for storage::Error {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

impl AsError for export::Error {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

impl AsError for std::io::Error {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

#[cfg(test)]
mod spec {
    use service::infra::api;

    use super::{AsError as _, Error};

    #[test]
    fn keeps_api_message_and_status() {
        let err = api::Error::response(409, "Order already claimed").as_error();

        assert_eq!(err.code, "CONFLICT");
        assert_eq!(err.status_code, http::StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "[CONFLICT]: Order already claimed");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn reports_unknown_errors_as_internal() {
        let err = api::Error::BaseUrl("nope".into()).as_error();

        assert_eq!(err.code, "INTERNAL_ERROR");
        assert_eq!(err.message, "Invalid API base URL: `nope`");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn captures_trace_of_traced_errors() {
        let traced = tracerr::new!(api::Error::response(502, "Bad Gateway"));

        let err = traced.as_error();

        assert_eq!(err.code, "API_UNAVAILABLE");
        assert!(err.backtrace.is_some());
    }

    #[test]
    fn defines_errors_with_codes() {
        crate::define_error! {
            enum Sample {
                #[code = "WRONG_ROLE"]
                #[status = FORBIDDEN]
                #[message = "Screen is not available to the signed-in user"]
                WrongRole,
            }
        }

        let err = Error::from(Sample::WrongRole);

        assert_eq!(err.code, "WRONG_ROLE");
        assert_eq!(
            err.to_string(),
            "[WRONG_ROLE]: Screen is not available to the signed-in user",
        );
    }
}
