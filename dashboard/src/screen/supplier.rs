//! Supplier screen.

use service::{
    domain::{
        order::Action,
        user::{self, Role},
    },
    query::report,
    read::order::Scope,
    Query as _,
};

use crate::{args, render, AsError, Context, Error};

/// Runs the provided [`args::Supplier`] command.
///
/// # Errors
///
/// If the signed-in user is not a supplier, or the command fails.
pub async fn run(ctx: &Context, cmd: args::Supplier) -> Result<String, Error> {
    use args::Supplier as C;

    let me = ctx.require(&[Role::Supplier]).await?.user.id;

    match cmd {
        C::Available(opts) => {
            super::list_orders(ctx, Scope::Unclaimed, opts, true).await
        }
        C::Claim(opts) => super::transit(ctx, Action::Claim, opts).await,
        C::Orders(opts) => {
            super::list_orders(ctx, Scope::Supplier(me), opts, false).await
        }
        C::Performance => performance(ctx, me).await,
    }
}

/// Renders KPI cards over the orders of the signed-in supplier, along with
/// its performance score.
async fn performance(ctx: &Context, me: user::Id) -> Result<String, Error> {
    let (kpi, rows) = futures::try_join!(
        ctx.service().execute(report::Kpi {
            scope: Scope::Supplier(me.clone()),
        }),
        ctx.service().execute(report::SupplierPerformance),
    )
    .map_err(AsError::into_error)?;

    let mut out = render::kpi(&kpi);
    if let Some(p) = rows.iter().find(|p| p.supplier_id == me) {
        let rating = |r: Option<common::Percent>| {
            r.map_or_else(|| "-".to_owned(), |r| r.to_string())
        };
        out.push('\n');
        out.push_str(&render::cards(&[
            ("Company", p.company.clone()),
            ("On-time delivery", render::progress(p.on_time.percentage())),
            ("Quality", rating(p.quality)),
            ("Cost efficiency", rating(p.cost_efficiency)),
            ("Score", format!("{} ({})", p.score, p.source)),
        ]));
    }
    Ok(out)
}
