//! Role screens of the dashboard.
//!
//! Every screen renders into a [`String`] printed by the binary.

pub mod admin;
pub mod client;
pub mod employee;
pub mod session;
pub mod supplier;

use common::pagination;
use service::{
    command::{self, transit_order},
    domain::{
        order::{self, Action, TransitionError},
    },
    export::Csv,
    query::orders,
    read::order::{list::Filter, Scope},
    Command as _,
};
use tokio::fs;
use tracing as log;

use crate::{args, define_error, render, AsError, Context, Error};

/// Default number of [`Order`]s per page.
///
/// [`Order`]: service::domain::Order
pub const DEFAULT_PER_PAGE: usize = 20;

/// Runs the provided [`args::Command`] in the provided [`Context`].
///
/// # Errors
///
/// If the command fails.
pub async fn run(ctx: &Context, cmd: args::Command) -> Result<String, Error> {
    use args::Command as C;

    match cmd {
        C::Login { email, password } => {
            session::login(ctx, email, password).await
        }
        C::Logout => session::logout(ctx).await,
        C::Whoami => session::whoami(ctx).await,
        C::Notifications { read } => session::notifications(ctx, read).await,
        C::Admin(cmd) => admin::run(ctx, cmd).await,
        C::Employee(cmd) => employee::run(ctx, cmd).await,
        C::Supplier(cmd) => supplier::run(ctx, cmd).await,
        C::Client(cmd) => client::run(ctx, cmd).await,
    }
}

/// Lists a [`Scope`] of orders with the provided [`args::Orders`] options,
/// exporting the listed page if requested.
async fn list_orders(
    ctx: &Context,
    scope: Scope,
    opts: args::Orders,
    unclaimed_only: bool,
) -> Result<String, Error> {
    define_error! {
        enum Error {
            #[code = "INVALID_PAGE"]
            #[status = BAD_REQUEST]
            #[message = "Page must be positive and per page must be within \
                         [1, 500]"]
            InvalidPage,
        }
    }

    let args::Orders {
        status,
        search,
        page,
        per_page,
        export,
    } = opts;

    let page = pagination::Arguments::new(page, per_page, DEFAULT_PER_PAGE)
        .ok_or(Error::InvalidPage)?;
    let page = ctx
        .service()
        .execute(orders::List {
            scope,
            filter: Filter {
                status,
                search,
                unclaimed_only,
            },
            page,
        })
        .await
        .map_err(AsError::into_error)?;

    let mut out = render::orders(&page);
    if let Some(path) = export {
        let csv = Csv::to_string(&page.items).map_err(AsError::into_error)?;
        fs::write(&path, csv).await.map_err(AsError::into_error)?;
        log::info!("exported {} orders to `{}`", page.items.len(), path.display());
        out.push_str(&format!("Exported to {}\n", path.display()));
    }
    Ok(out)
}

/// Performs the [`Action`] on the order, on behalf of the signed-in user.
async fn transit(
    ctx: &Context,
    action: Action,
    opts: args::Transition,
) -> Result<String, Error> {
    let args::Transition { id, comment } = opts;
    let order = ctx
        .service()
        .execute(command::TransitOrder {
            order_id: order::Id::from(id),
            action,
            comment,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(render::order(&order))
}

impl AsError for transit_order::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "NOT_SIGNED_IN"]
                #[status = UNAUTHORIZED]
                #[message = "Sign in first"]
                NotSignedIn,

                #[code = "ORDER_NOT_FOUND"]
                #[status = NOT_FOUND]
                #[message = "Order does not exist"]
                OrderNotExists,

                #[code = "ORDER_CLAIMED"]
                #[status = CONFLICT]
                #[message = "Order is claimed by another supplier already"]
                AlreadyClaimed,

                #[code = "FORBIDDEN_ACTION"]
                #[status = FORBIDDEN]
                #[message = "Signed-in user is not allowed to do this"]
                Forbidden,

                #[code = "ILLEGAL_TRANSITION"]
                #[status = CONFLICT]
                #[message = "Order status does not allow this"]
                Illegal,
            }
        }

        match self {
            Self::Api(e) => e.try_as_error(),
            Self::Storage(e) => e.try_as_error(),
            Self::NotSignedIn => Some(Error::NotSignedIn.into()),
            Self::OrderNotExists(_) => Some(Error::OrderNotExists.into()),
            Self::Transition(e) => Some(match e {
                TransitionError::AlreadyClaimed => Error::AlreadyClaimed,
                TransitionError::Forbidden { .. }
                | TransitionError::NotOwner => Error::Forbidden,
                TransitionError::Illegal { .. }
                | TransitionError::Terminal(_) => Error::Illegal,
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod spec {
    use std::{path::PathBuf, time::Duration};

    use common::{money::Currency, operations::Update};
    use serde_json::json;
    use service::{
        domain::{
            user::{
                session::{Credentials, Token},
                Role,
            },
            User,
        },
        infra::{
            api::{rest, Rest},
            storage::File,
            Storage as _,
        },
    };
    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use crate::{args, Context, Service};

    use super::run;

    fn tmp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("dashboard-{}", uuid::Uuid::new_v4()))
            .join("storage.json")
    }

    async fn context(server: &MockServer, role: Option<Role>) -> Context {
        let storage = File::new(tmp_path());
        if let Some(role) = role {
            storage
                .execute(Update(Credentials {
                    token: Token::new("opaque").unwrap(),
                    user: User {
                        id: "user-1".into(),
                        name: "Jane Doe".parse().unwrap(),
                        email: "jane@acme.io".parse().unwrap(),
                        role,
                        phone: None,
                        company: None,
                    },
                }))
                .await
                .unwrap();
        }
        let api = Rest::new(rest::Config {
            base_url: format!("{}/api", server.uri()),
            timeout: Duration::from_secs(5),
            currency: Currency::Usd,
        })
        .unwrap();

        Context::new(Service::new(service::Config::default(), api, storage))
    }

    fn order_json(id: &str, date: &str, status: &str) -> serde_json::Value {
        json!({
            "id": id,
            "items": [{"productId": "chair", "quantity": 2, "price": 500}],
            "orderDate": date,
            "status": status,
            "shippingAddress": {"street": "1 Main St", "city": "Springfield",
                                "zipCode": "12345", "country": "US"},
            "paymentMethod": "Credit Card",
            "shippingMethod": "Standard",
            "clientId": "client-1",
        })
    }

    async fn mount_orders(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/orders"))
            .and(header("authorization", "Bearer opaque"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    order_json("o-1", "2024-05-01T09:00:00Z", "Shipped"),
                    order_json("o-2", "2024-05-03T09:00:00Z", "Created"),
                ],
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn lists_orders_recent_first() {
        let server = MockServer::start().await;
        mount_orders(&server).await;
        let ctx = context(&server, Some(Role::Employee)).await;

        let out = run(
            &ctx,
            args::Command::Employee(args::Employee::Orders(
                args::Orders::default(),
            )),
        )
        .await
        .unwrap();

        let o1 = out.find("o-1").unwrap();
        let o2 = out.find("o-2").unwrap();
        assert!(o2 < o1, "most recent order goes first:\n{out}");
        assert!(out.contains("1000.00 USD"));
        assert!(out.ends_with("Page 1 of 1 (2 orders)\n"));
    }

    #[tokio::test]
    async fn exports_listed_orders() {
        let server = MockServer::start().await;
        mount_orders(&server).await;
        let ctx = context(&server, Some(Role::Admin)).await;
        let export = tmp_path().with_file_name("orders.csv");
        std::fs::create_dir_all(export.parent().unwrap()).unwrap();

        let out = run(
            &ctx,
            args::Command::Admin(args::Admin::Orders(args::Orders {
                status: Some("Created".parse().unwrap()),
                export: Some(export.clone()),
                ..args::Orders::default()
            })),
        )
        .await
        .unwrap();

        assert!(out.contains("Exported to"));
        let csv = std::fs::read_to_string(&export).unwrap();
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.lines().nth(1).unwrap().starts_with("o-2,2024-05-03,"));
    }

    #[tokio::test]
    async fn rejects_screens_of_other_roles() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let ctx = context(&server, Some(Role::Client)).await;

        let err = run(&ctx, args::Command::Admin(args::Admin::Overview))
            .await
            .unwrap_err();

        assert_eq!(err.code, "WRONG_ROLE");
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn requires_sign_in() {
        let server = MockServer::start().await;
        let ctx = context(&server, None).await;

        let err = run(&ctx, args::Command::Whoami).await.unwrap_err();

        assert_eq!(err.code, "NOT_SIGNED_IN");
        assert_eq!(err.to_string(), "[NOT_SIGNED_IN]: Sign in first");
    }

    #[tokio::test]
    async fn rejects_illegal_transition_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/orders/o-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                order_json("o-1", "2024-05-01T09:00:00Z", "Received"),
            ))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let ctx = context(&server, Some(Role::Employee)).await;

        let err = run(
            &ctx,
            args::Command::Employee(args::Employee::Advance(args::Transition {
                id: "o-1".into(),
                comment: None,
            })),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, "ILLEGAL_TRANSITION");
    }

    #[tokio::test]
    async fn surfaces_api_messages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/orders/o-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                order_json("o-1", "2024-05-01T09:00:00Z", "Created"),
            ))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/orders/o-1/status"))
            .respond_with(
                ResponseTemplate::new(409)
                    .set_body_json(json!({"message": "Order changed meanwhile"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        let ctx = context(&server, Some(Role::Employee)).await;

        let err = run(
            &ctx,
            args::Command::Employee(args::Employee::Confirm(args::Transition {
                id: "o-1".into(),
                comment: None,
            })),
        )
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "[CONFLICT]: Order changed meanwhile");
    }
}
