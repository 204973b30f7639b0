//! In-[`Memory`] [`Api`] implementation.

use std::{sync::Arc, time::Duration};

use common::{
    operations::{By, Delete, Insert, Perform, Select, Update},
    DateTime,
};
use secrecy::ExposeSecret as _;
use tokio::sync::{Mutex, RwLock};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        order::{self, history, Initiator, ShippingMethod, Status},
        product,
        user::{
            self,
            session::{self, Credentials, Session},
        },
        Client, Contract, Notification, Order, Product, Supplier, User,
    },
    read::order::Scope,
};

use super::{Api, Authenticate, Error, Login, Logout, MarkRead, Transition};

/// Secret the [`Memory`] API signs its [`session::Token`]s with.
const SECRET: &[u8] = b"in-memory";

/// Lifetime of the [`session::Token`]s issued by the [`Memory`] API.
const SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Registered [`User`] along with their [`user::Password`].
#[derive(Clone, Debug)]
pub struct Account {
    /// Profile of the [`User`].
    pub user: User,

    /// [`user::Password`] the [`User`] signs in with.
    pub password: user::Password,
}

/// Data served by the [`Memory`] API.
#[derive(Clone, Debug, Default)]
pub struct State {
    /// Registered [`Account`]s.
    pub accounts: Vec<Account>,

    /// Placed [`Order`]s.
    pub orders: Vec<Order>,

    /// Catalog of [`Product`]s.
    pub products: Vec<Product>,

    /// Known [`Supplier`]s.
    pub suppliers: Vec<Supplier>,

    /// Known [`Client`]s.
    pub clients: Vec<Client>,

    /// Signed [`Contract`]s.
    pub contracts: Vec<Contract>,

    /// Issued [`Notification`]s.
    pub notifications: Vec<Notification>,
}

/// [`Api`] serving a [`State`] kept in memory, behaving like the remote API
/// does.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// Served [`State`].
    state: Arc<Mutex<State>>,

    /// [`session::Token`] to authenticate requests with.
    token: Arc<RwLock<Option<session::Token>>>,
}

impl Memory {
    /// Creates a new [`Memory`] API serving the provided [`State`].
    #[must_use]
    pub fn new(state: State) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            token: Arc::default(),
        }
    }

    /// Returns a copy of the currently served [`State`].
    pub async fn snapshot(&self) -> State {
        self.state.lock().await.clone()
    }

    /// Resolves the [`Initiator`] of the current request.
    async fn initiator(&self) -> Result<Initiator, Traced<Error>> {
        let token = self.token.read().await.clone();
        let token = token.ok_or_else(|| tracerr::new!(Error::Unauthenticated))?;

        let session = jsonwebtoken::decode::<Session>(
            token.expose(),
            &jsonwebtoken::DecodingKey::from_secret(SECRET),
            &jsonwebtoken::Validation::default(),
        )
        .map_err(|e| {
            log::debug!("rejecting token: {e}");
            tracerr::new!(Error::response(401, "Invalid or expired token"))
        })?
        .claims;

        let role = match session.role {
            Some(role) => role,
            None => self
                .state
                .lock()
                .await
                .accounts
                .iter()
                .find(|a| a.user.id == session.user_id)
                .map(|a| a.user.role)
                .ok_or_else(|| {
                    tracerr::new!(Error::response(401, "Unknown user"))
                })?,
        };
        Ok(Initiator {
            id: session.user_id,
            role,
        })
    }

    /// Ensures the current request is made by an admin or an employee.
    async fn staff(&self) -> Result<Initiator, Traced<Error>> {
        let initiator = self.initiator().await.map_err(tracerr::wrap!())?;
        match initiator.role {
            user::Role::Admin | user::Role::Employee => Ok(initiator),
            user::Role::Supplier | user::Role::Client => {
                Err(tracerr::new!(Error::response(403, "Access denied")))
            }
        }
    }
}

/// Returns the number of days an [`Order`] shipped with the provided
/// [`ShippingMethod`] takes to arrive.
const fn delivery_days(method: ShippingMethod) -> u64 {
    match method {
        ShippingMethod::Overnight => 1,
        ShippingMethod::Express => 3,
        ShippingMethod::Standard => 7,
    }
}

/// Generates a new unique ID.
fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl Api<Perform<Login>> for Memory {
    type Ok = Credentials;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Perform(login): Perform<Login>,
    ) -> Result<Self::Ok, Self::Err> {
        let user = self
            .state
            .lock()
            .await
            .accounts
            .iter()
            .find(|a| {
                a.user.email == login.email
                    && a.password == *login.password.expose_secret()
            })
            .map(|a| a.user.clone())
            .ok_or_else(|| {
                tracerr::new!(Error::response(401, "Invalid credentials"))
            })?;

        let session = Session {
            user_id: user.id.clone(),
            role: Some(user.role),
            expires_at: Some((DateTime::now() + SESSION_TTL).coerce()),
        };
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &session,
            &jsonwebtoken::EncodingKey::from_secret(SECRET),
        )
        .map_err(|e| tracerr::new!(Error::InvalidData(e.to_string())))?;

        Ok(Credentials {
            token: session::Token::new(token).ok_or_else(|| {
                tracerr::new!(Error::InvalidData("blank token".into()))
            })?,
            user,
        })
    }
}

impl Api<Perform<Logout>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(&self, _: Perform<Logout>) -> Result<Self::Ok, Self::Err> {
        _ = self.initiator().await.map_err(tracerr::wrap!())?;
        Ok(())
    }
}

impl Api<Perform<Authenticate>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Perform(Authenticate(token)): Perform<Authenticate>,
    ) -> Result<Self::Ok, Self::Err> {
        *self.token.write().await = token;
        Ok(())
    }
}

impl Api<Select<By<Vec<Order>, Scope>>> for Memory {
    type Ok = Vec<Order>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Order>, Scope>>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self.initiator().await.map_err(tracerr::wrap!())?;
        let scope = by.into_inner();
        Ok(self
            .state
            .lock()
            .await
            .orders
            .iter()
            .filter(|o| scope.contains(o))
            .cloned()
            .collect())
    }
}

impl Api<Select<By<Option<Order>, order::Id>>> for Memory {
    type Ok = Option<Order>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Order>, order::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self.initiator().await.map_err(tracerr::wrap!())?;
        Ok(self
            .state
            .lock()
            .await
            .orders
            .iter()
            .find(|o| &o.id == by.inner())
            .cloned())
    }
}

impl Api<Insert<order::Draft>> for Memory {
    type Ok = Order;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Insert(draft): Insert<order::Draft>,
    ) -> Result<Self::Ok, Self::Err> {
        let initiator = self.initiator().await.map_err(tracerr::wrap!())?;
        if initiator.role != user::Role::Client
            || initiator.id != draft.client_id
        {
            return Err(tracerr::new!(Error::response(
                403,
                "Only clients can place orders",
            )));
        }
        if draft.items.is_empty() {
            return Err(tracerr::new!(Error::response(
                400,
                "Order has no items",
            )));
        }

        let now = DateTime::now();
        let days = delivery_days(draft.shipping_method);
        let order = Order {
            id: new_id().into(),
            items: draft.items,
            currency: draft.currency,
            ordered_at: now.coerce(),
            status: Status::Created,
            shipping_address: draft.shipping_address,
            payment_method: draft.payment_method,
            shipping_method: draft.shipping_method,
            estimated_delivery: Some(
                (now + Duration::from_secs(days * 24 * 60 * 60)).coerce(),
            ),
            history: order::History::from_entries(vec![history::Entry {
                status: Status::Created,
                at: now.coerce(),
                comment: Some("Order placed".into()),
            }]),
            employee_id: None,
            supplier_id: None,
            client_id: draft.client_id,
        };
        self.state.lock().await.orders.push(order.clone());
        Ok(order)
    }
}

impl Api<Perform<Transition>> for Memory {
    type Ok = Order;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Perform(transition): Perform<Transition>,
    ) -> Result<Self::Ok, Self::Err> {
        let initiator = self.initiator().await.map_err(tracerr::wrap!())?;

        let mut state = self.state.lock().await;
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.id == transition.order_id)
            .ok_or_else(|| {
                tracerr::new!(Error::response(404, "Order not found"))
            })?;

        let updated = order
            .transit(
                transition.action,
                &initiator,
                DateTime::now(),
                transition.comment,
            )
            .map_err(|e| {
                use crate::domain::order::TransitionError as E;

                let status = match e {
                    E::Forbidden { .. } | E::NotOwner => 403,
                    E::AlreadyClaimed => 409,
                    E::Illegal { .. } | E::Terminal(_) => 400,
                };
                tracerr::new!(Error::response(status, e.to_string()))
            })?;
        if updated.status != transition.status {
            return Err(tracerr::new!(Error::response(
                409,
                format!(
                    "Order is now `{}`, not `{}`",
                    updated.status, transition.status,
                ),
            )));
        }

        *order = updated.clone();
        Ok(updated)
    }
}

impl Api<Select<By<Vec<Product>, ()>>> for Memory {
    type Ok = Vec<Product>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Product>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self.initiator().await.map_err(tracerr::wrap!())?;
        Ok(self.state.lock().await.products.clone())
    }
}

impl Api<Select<By<Option<Product>, product::Id>>> for Memory {
    type Ok = Option<Product>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Product>, product::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self.initiator().await.map_err(tracerr::wrap!())?;
        Ok(self
            .state
            .lock()
            .await
            .products
            .iter()
            .find(|p| &p.id == by.inner())
            .cloned())
    }
}

impl Api<Insert<product::Draft>> for Memory {
    type Ok = Product;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Insert(draft): Insert<product::Draft>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self.staff().await.map_err(tracerr::wrap!())?;
        let product = draft.into_product(new_id().into());
        self.state.lock().await.products.push(product.clone());
        Ok(product)
    }
}

impl Api<Update<Product>> for Memory {
    type Ok = Product;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Update(product): Update<Product>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self.staff().await.map_err(tracerr::wrap!())?;
        let mut state = self.state.lock().await;
        let stored = state
            .products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or_else(|| {
                tracerr::new!(Error::response(404, "Product not found"))
            })?;
        *stored = product.clone();
        Ok(product)
    }
}

impl Api<Delete<product::Id>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Delete(id): Delete<product::Id>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self.staff().await.map_err(tracerr::wrap!())?;
        let mut state = self.state.lock().await;
        let before = state.products.len();
        state.products.retain(|p| p.id != id);
        if state.products.len() == before {
            return Err(tracerr::new!(Error::response(
                404,
                "Product not found",
            )));
        }
        Ok(())
    }
}

impl Api<Select<By<Vec<Supplier>, ()>>> for Memory {
    type Ok = Vec<Supplier>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Supplier>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self.initiator().await.map_err(tracerr::wrap!())?;
        Ok(self.state.lock().await.suppliers.clone())
    }
}

impl Api<Select<By<Vec<Client>, ()>>> for Memory {
    type Ok = Vec<Client>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Client>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self.staff().await.map_err(tracerr::wrap!())?;
        Ok(self.state.lock().await.clients.clone())
    }
}

impl Api<Select<By<Vec<Contract>, ()>>> for Memory {
    type Ok = Vec<Contract>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Contract>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let initiator = self.initiator().await.map_err(tracerr::wrap!())?;
        Ok(self
            .state
            .lock()
            .await
            .contracts
            .iter()
            .filter(|c| match initiator.role {
                user::Role::Admin | user::Role::Employee => true,
                user::Role::Supplier => {
                    c.supplier_id.as_ref() == Some(&initiator.id)
                }
                user::Role::Client => {
                    c.client_id.as_ref() == Some(&initiator.id)
                }
            })
            .cloned()
            .collect())
    }
}

impl Api<Select<By<Vec<Notification>, ()>>> for Memory {
    type Ok = Vec<Notification>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Notification>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let initiator = self.initiator().await.map_err(tracerr::wrap!())?;
        Ok(self
            .state
            .lock()
            .await
            .notifications
            .iter()
            .filter(|n| n.user_id.as_ref().is_none_or(|id| *id == initiator.id))
            .cloned()
            .collect())
    }
}

impl Api<Perform<MarkRead>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Perform(MarkRead(id)): Perform<MarkRead>,
    ) -> Result<Self::Ok, Self::Err> {
        let initiator = self.initiator().await.map_err(tracerr::wrap!())?;
        let mut state = self.state.lock().await;
        let notification = state
            .notifications
            .iter_mut()
            .find(|n| {
                n.id == id
                    && n.user_id.as_ref().is_none_or(|u| *u == initiator.id)
            })
            .ok_or_else(|| {
                tracerr::new!(Error::response(404, "Notification not found"))
            })?;
        notification.is_read = true;
        Ok(())
    }
}
