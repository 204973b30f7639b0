//! Employee screen.

use service::{
    domain::{order::Action, user::Role},
    read::order::Scope,
};

use crate::{args, Context, Error};

/// Runs the provided [`args::Employee`] command.
///
/// # Errors
///
/// If the signed-in user is not an employee, or the command fails.
pub async fn run(ctx: &Context, cmd: args::Employee) -> Result<String, Error> {
    use args::Employee as C;

    _ = ctx.require(&[Role::Employee]).await?;

    match cmd {
        C::Orders(opts) => {
            super::list_orders(ctx, Scope::All, opts, false).await
        }
        C::Confirm(opts) => super::transit(ctx, Action::Confirm, opts).await,
        C::Advance(opts) => super::transit(ctx, Action::Advance, opts).await,
        C::Cancel(opts) => super::transit(ctx, Action::Cancel, opts).await,
    }
}
