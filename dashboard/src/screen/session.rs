//! Session and notifications screens.

use common::operations::By;
use secrecy::SecretBox;
use service::{
    command::{
        self, create_session, destroy_session, mark_notification_read,
    },
    domain::{
        notification,
        user::{Email, Password},
        Notification,
    },
    query::ApiQuery,
    Command as _,
};
use tracing as log;

use crate::{define_error, render, AsError, Context, Error};

/// Signs in with the provided `email` and `password`.
///
/// # Errors
///
/// If the credentials are malformed or don't match any user.
pub async fn login(
    ctx: &Context,
    email: String,
    password: String,
) -> Result<String, Error> {
    define_error! {
        enum Error {
            #[code = "INVALID_EMAIL"]
            #[status = BAD_REQUEST]
            #[message = "Email is not a valid one"]
            InvalidEmail,

            #[code = "INVALID_PASSWORD"]
            #[status = BAD_REQUEST]
            #[message = "Password must be 1 to 128 characters long"]
            InvalidPassword,
        }
    }

    let email = Email::new(email).ok_or(Error::InvalidEmail)?;
    let password = Password::new(password).ok_or(Error::InvalidPassword)?;

    let creds = ctx
        .service()
        .execute(command::CreateSession {
            email,
            password: SecretBox::init_with(move || password),
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(format!(
        "Signed in as {} ({}, {})\n",
        creds.user.name, creds.user.email, creds.user.role,
    ))
}

/// Signs out, keeping the cart of this device.
///
/// # Errors
///
/// If the stored session cannot be forgotten.
pub async fn logout(ctx: &Context) -> Result<String, Error> {
    ctx.service()
        .execute(command::DestroySession)
        .await
        .map_err(AsError::into_error)?;

    Ok("Signed out\n".to_owned())
}

/// Shows the signed-in user.
///
/// # Errors
///
/// If nobody is signed in, or the session has expired.
pub async fn whoami(ctx: &Context) -> Result<String, Error> {
    let creds = ctx.current_session().await?;
    let user = &creds.user;

    Ok(render::cards(&[
        ("ID", user.id.to_string()),
        ("Name", user.name.to_string()),
        ("Email", user.email.to_string()),
        ("Role", user.role.to_string()),
        (
            "Phone",
            user.phone
                .as_ref()
                .map_or_else(|| "-".to_owned(), ToString::to_string),
        ),
        ("Company", user.company.clone().unwrap_or_else(|| "-".to_owned())),
    ]))
}

/// Lists notifications of the signed-in user, marking the one with the
/// provided ID as read first.
///
/// # Errors
///
/// If nobody is signed in, or the API request fails.
pub async fn notifications(
    ctx: &Context,
    read: Option<String>,
) -> Result<String, Error> {
    _ = ctx.current_session().await?;

    if let Some(id) = read {
        ctx.service()
            .execute(command::MarkNotificationRead {
                id: notification::Id::from(id),
            })
            .await
            .map_err(AsError::into_error)?;
    }

    let mut list = ctx
        .service()
        .execute(ApiQuery::<By<Vec<Notification>, ()>>::all())
        .await
        .map_err(AsError::into_error)?;
    list.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut table = render::Table::new(["", "ID", "At", "Kind", "Title", "Message"]);
    for n in &list {
        if !n.is_read && n.kind == notification::Kind::Error {
            log::error!("{}: {}", n.title, n.message);
        }
        _ = table.row([
            if n.is_read { "" } else { "*" }.to_owned(),
            n.id.to_string(),
            n.created_at.to_rfc3339(),
            n.kind.to_string(),
            n.title.clone(),
            n.message.clone(),
        ]);
    }
    let unread = list.iter().filter(|n| !n.is_read).count();

    Ok(format!("{table}{unread} unread\n"))
}

impl AsError for create_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "WRONG_CREDENTIALS"]
                #[status = UNAUTHORIZED]
                #[message = "Provided credentials do not match any user"]
                WrongCredentials,
            }
        }

        match self {
            Self::Api(e) if e.is_unauthorized() => {
                Some(Error::WrongCredentials.into())
            }
            Self::Api(e) => e.try_as_error(),
            Self::Storage(e) => e.try_as_error(),
        }
    }
}

impl AsError for destroy_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Api(e) => e.try_as_error(),
            Self::Storage(e) => e.try_as_error(),
        }
    }
}

impl AsError for mark_notification_read::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Api(e) => e.try_as_error(),
        }
    }
}
