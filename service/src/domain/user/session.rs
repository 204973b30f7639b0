//! [`Session`] definitions.

use std::fmt;

use common::{unit, DateTime, DateTimeOf};
use serde::{Deserialize, Serialize};

use crate::domain::user::{self, User};

/// Claims of an authenticated [`User`] session, carried by its [`Token`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Session {
    /// ID of the [`User`] this [`Session`] belongs to.
    #[serde(alias = "id", alias = "userId", alias = "sub")]
    pub user_id: user::Id,

    /// [`user::Role`] the [`User`] acts with, if the token carries one.
    #[serde(default)]
    pub role: Option<user::Role>,

    /// [`DateTime`] when this [`Session`] expires.
    ///
    /// [`None`] means the token doesn't expire on its own.
    #[serde(
        rename = "exp",
        default,
        skip_serializing_if = "Option::is_none",
        with = "unix_timestamp_opt"
    )]
    pub expires_at: Option<ExpirationDateTime>,
}

impl Session {
    /// Decodes [`Session`] claims from the provided [`Token`].
    ///
    /// The signature is not verified: the API verifies tokens itself, while
    /// here the claims are only used to know when the [`Session`] expires.
    ///
    /// # Errors
    ///
    /// If the [`Token`] is not a well-formed [JWT].
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    pub fn decode(token: &Token) -> Result<Self, jsonwebtoken::errors::Error> {
        let mut validation = jsonwebtoken::Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        jsonwebtoken::decode::<Self>(
            token.expose(),
            &jsonwebtoken::DecodingKey::from_secret(&[]),
            &validation,
        )
        .map(|data| data.claims)
    }

    /// Indicates whether this [`Session`] is expired at the provided moment.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now.coerce())
    }
}

/// Access token of a [`Session`].
#[derive(Clone, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Creates a new [`Token`] if the provided value is not blank.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        (!token.trim().is_empty()).then_some(Self(token))
    }

    /// Exposes the raw value of this [`Token`].
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// Locally persisted credentials of the signed-in [`User`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Credentials {
    /// [`Token`] to authenticate API requests with.
    pub token: Token,

    /// Profile of the signed-in [`User`].
    pub user: User,
}

/// [`DateTime`] of a [`Session`] expiration.
pub type ExpirationDateTime = DateTimeOf<(Session, unit::Expiration)>;

mod unix_timestamp_opt {
    //! Optional Unix timestamp (de)serialization.

    use common::datetime::serde::unix_timestamp;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::ExpirationDateTime;

    /// Wrapper deserializing through [`unix_timestamp`].
    #[derive(Deserialize)]
    struct Wrapper(
        #[serde(with = "unix_timestamp")] ExpirationDateTime,
    );

    pub(super) fn serialize<S: Serializer>(
        dt: &Option<ExpirationDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match dt {
            Some(dt) => serializer.serialize_some(&dt.unix_timestamp()),
            None => serializer.serialize_none(),
        }
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<ExpirationDateTime>, D::Error> {
        Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|w| w.0))
    }
}

#[cfg(test)]
mod spec {
    use common::DateTime;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    use crate::domain::user::Role;

    use super::{Session, Token};

    fn token(claims: &serde_json::Value) -> Token {
        Token::new(
            encode(
                &Header::default(),
                claims,
                &EncodingKey::from_secret(b"server-side secret"),
            )
            .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn decodes_claims_without_verifying_signature() {
        let session = Session::decode(&token(&json!({
            "id": "u-42",
            "role": "employee",
            "iat": 1_700_000_000,
            "exp": 1_700_003_600,
        })))
        .unwrap();

        assert_eq!(session.user_id, "u-42".into());
        assert_eq!(session.role, Some(Role::Employee));
        assert_eq!(
            session.expires_at.map(|e| e.unix_timestamp()),
            Some(1_700_003_600),
        );
        assert!(session
            .is_expired_at(DateTime::from_unix_timestamp(1_700_003_600).unwrap()));
        assert!(!session
            .is_expired_at(DateTime::from_unix_timestamp(1_700_000_000).unwrap()));
    }

    #[test]
    fn never_expires_without_exp() {
        let session = Session::decode(&token(&json!({"sub": "u-1"}))).unwrap();

        assert_eq!(session.expires_at, None);
        assert!(!session.is_expired_at(DateTime::now()));
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert!(Session::decode(&Token::new("not-a-jwt").unwrap()).is_err());
        assert!(Token::new("  ").is_none());
    }

    #[test]
    fn hides_token_in_debug() {
        assert_eq!(format!("{:?}", Token::new("secret").unwrap()), "Token(***)");
    }
}
