//! Admin screen.

use common::operations::By;
use service::{
    command::{self, delete_product, save_product},
    domain::{product, user::Role, Client, Contract, Product},
    export::Csv,
    query::{report, ApiQuery},
    read::order::Scope,
    Command as _,
};
use tokio::fs;
use tracing as log;

use crate::{args, define_error, render, AsError, Context, Error};

/// Runs the provided [`args::Admin`] command.
///
/// # Errors
///
/// If the signed-in user is not an admin, or the command fails.
pub async fn run(ctx: &Context, cmd: args::Admin) -> Result<String, Error> {
    use args::Admin as C;

    _ = ctx.require(&[Role::Admin]).await?;

    match cmd {
        C::Overview => overview(ctx).await,
        C::Orders(opts) => super::list_orders(ctx, Scope::All, opts, false).await,
        C::Suppliers { export } => suppliers(ctx, export).await,
        C::Products => products(ctx).await,
        C::ProductSave(fields) => save(ctx, fields).await,
        C::ProductDelete { id } => {
            ctx.service()
                .execute(command::DeleteProduct {
                    id: product::Id::from(id.clone()),
                })
                .await
                .map_err(AsError::into_error)?;
            Ok(format!("Deleted product {id}\n"))
        }
        C::Contracts => contracts(ctx).await,
        C::Clients => clients(ctx).await,
    }
}

/// Renders KPI cards over all orders.
async fn overview(ctx: &Context) -> Result<String, Error> {
    let kpi = ctx
        .service()
        .execute(report::Kpi { scope: Scope::All })
        .await
        .map_err(AsError::into_error)?;

    Ok(render::kpi(&kpi))
}

/// Renders supplier performance, exporting it if requested.
async fn suppliers(
    ctx: &Context,
    export: Option<std::path::PathBuf>,
) -> Result<String, Error> {
    let rows = ctx
        .service()
        .execute(report::SupplierPerformance)
        .await
        .map_err(AsError::into_error)?;

    let mut table = render::Table::new([
        "ID", "Company", "On time", "Late", "On-time %", "Quality", "Cost",
        "Score", "Source",
    ]);
    for p in &rows {
        let rating = |r: Option<common::Percent>| {
            r.map_or_else(|| "-".to_owned(), |r| r.to_string())
        };
        _ = table.row([
            p.supplier_id.to_string(),
            p.company.clone(),
            p.on_time.on_time.to_string(),
            p.on_time.late.to_string(),
            p.on_time.percentage().to_string(),
            rating(p.quality),
            rating(p.cost_efficiency),
            p.score.to_string(),
            p.source.to_string(),
        ]);
    }

    let mut out = table.to_string();
    if let Some(path) = export {
        let csv = Csv::to_string(&rows).map_err(AsError::into_error)?;
        fs::write(&path, csv).await.map_err(AsError::into_error)?;
        log::info!("exported {} suppliers to `{}`", rows.len(), path.display());
        out.push_str(&format!("Exported to {}\n", path.display()));
    }
    Ok(out)
}

/// Renders all products.
async fn products(ctx: &Context) -> Result<String, Error> {
    let products = ctx
        .service()
        .execute(ApiQuery::<By<Vec<Product>, ()>>::all())
        .await
        .map_err(AsError::into_error)?;

    Ok(super::client::products_table(&products).to_string())
}

/// Creates or updates a product out of the provided [`args::Product`].
async fn save(ctx: &Context, fields: args::Product) -> Result<String, Error> {
    define_error! {
        enum Error {
            #[code = "INVALID_PRODUCT_NAME"]
            #[status = BAD_REQUEST]
            #[message = "Product name must be 1 to 256 characters long \
                             without surrounding spaces"]
            InvalidName,
        }
    }

    let args::Product {
        id,
        name,
        description,
        category,
        price,
        stock,
        supplier,
    } = fields;
    let draft = product::Draft {
        name: product::Name::new(name).ok_or(Error::InvalidName)?,
        description,
        category,
        price,
        stock,
        supplier_id: supplier.map(Into::into),
    };
    let cmd = match id {
        Some(id) => command::SaveProduct::Update(draft.into_product(id.into())),
        None => command::SaveProduct::Create(draft),
    };

    let product = ctx
        .service()
        .execute(cmd)
        .await
        .map_err(AsError::into_error)?;

    Ok(format!("Saved product {} ({})\n", product.id, product.name))
}

/// Renders all contracts.
async fn contracts(ctx: &Context) -> Result<String, Error> {
    let contracts = ctx
        .service()
        .execute(ApiQuery::<By<Vec<Contract>, ()>>::all())
        .await
        .map_err(AsError::into_error)?;

    let mut table = render::Table::new([
        "ID", "Title", "Supplier", "Client", "Value", "Expires", "Status",
    ]);
    for c in &contracts {
        let id = |id: Option<&service::domain::user::Id>| {
            id.map_or_else(|| "-".to_owned(), ToString::to_string)
        };
        _ = table.row([
            c.id.to_string(),
            c.title.clone(),
            id(c.supplier_id.as_ref()),
            id(c.client_id.as_ref()),
            c.value
                .map_or_else(|| "-".to_owned(), |v| format!("{:.2}", v.round_dp(2))),
            c.expires_at
                .as_ref()
                .map_or_else(|| "-".to_owned(), |d| d.to_date_string()),
            c.status().to_string(),
        ]);
    }
    Ok(table.to_string())
}

/// Renders all clients.
async fn clients(ctx: &Context) -> Result<String, Error> {
    let clients = ctx
        .service()
        .execute(ApiQuery::<By<Vec<Client>, ()>>::all())
        .await
        .map_err(AsError::into_error)?;

    let mut table =
        render::Table::new(["ID", "Name", "Company", "Email", "Orders"]);
    for c in &clients {
        _ = table.row([
            c.id.to_string(),
            c.name.clone(),
            c.company.clone().unwrap_or_else(|| "-".to_owned()),
            c.email
                .as_ref()
                .map_or_else(|| "-".to_owned(), ToString::to_string),
            c.total_orders.to_string(),
        ]);
    }
    Ok(table.to_string())
}

impl AsError for save_product::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "NOT_ADMIN"]
                #[status = FORBIDDEN]
                #[message = "Only admins can manage products"]
                NotAdmin,

                #[code = "NEGATIVE_PRICE"]
                #[status = BAD_REQUEST]
                #[message = "Price cannot be negative"]
                NegativePrice,
            }
        }

        match self {
            Self::Api(e) => e.try_as_error(),
            Self::Storage(e) => e.try_as_error(),
            Self::NotAdmin => Some(Error::NotAdmin.into()),
            Self::NegativePrice => Some(Error::NegativePrice.into()),
        }
    }
}

impl AsError for delete_product::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "NOT_ADMIN"]
                #[status = FORBIDDEN]
                #[message = "Only admins can manage products"]
                NotAdmin,
            }
        }

        match self {
            Self::Api(e) => e.try_as_error(),
            Self::Storage(e) => e.try_as_error(),
            Self::NotAdmin => Some(Error::NotAdmin.into()),
        }
    }
}
