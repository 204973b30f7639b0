//! REST [`Api`] implementation.

mod dto;

use std::{sync::Arc, time::Duration};

use common::{
    money::Currency,
    operations::{By, Delete, Insert, Perform, Select, Update},
};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use secrecy::ExposeSecret as _;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        order::{self, Action},
        product,
        user::session::{self, Credentials},
        Client, Contract, Notification, Order, Product, Supplier, User,
    },
    read::order::Scope,
};

use self::dto::Payload;
use super::{Api, Authenticate, Error, Login, Logout, MarkRead, Transition};

/// Configuration of a [`Rest`] client.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL every API path is relative to.
    pub base_url: String,

    /// Timeout of a single request.
    pub timeout: Duration,

    /// [`Currency`] of the [`Order`]s the API doesn't specify one for.
    pub currency: Currency,
}

/// [`Api`] client talking JSON over HTTP.
///
/// Every request, except signing in, carries the bearer [`session::Token`]
/// set by the last [`Authenticate`] operation.
#[derive(Clone, Debug)]
pub struct Rest {
    /// Underlying HTTP client.
    client: reqwest::Client,

    /// Base URL every API path is relative to.
    base_url: Url,

    /// [`Currency`] of the [`Order`]s the API doesn't specify one for.
    currency: Currency,

    /// [`session::Token`] to authenticate requests with.
    token: Arc<RwLock<Option<session::Token>>>,
}

impl Rest {
    /// Creates a new [`Rest`] client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If the base URL is invalid, or the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self, Traced<Error>> {
        let base_url = Url::parse(&config.base_url)
            .ok()
            .filter(|u| !u.cannot_be_a_base())
            .ok_or_else(|| {
                tracerr::new!(Error::BaseUrl(config.base_url.clone()))
            })?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(tracerr::from_and_wrap!(=> Error))?;

        Ok(Self {
            client,
            base_url,
            currency: config.currency,
            token: Arc::default(),
        })
    }

    /// Builds the URL of the provided path `segments`.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            _ = path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Starts an authenticated request to the provided path `segments`.
    async fn request(
        &self,
        method: Method,
        segments: &[&str],
    ) -> Result<RequestBuilder, Traced<Error>> {
        let token = self.token.read().await.clone();
        let token = token.ok_or_else(|| tracerr::new!(Error::Unauthenticated))?;
        Ok(self
            .client
            .request(method, self.url(segments))
            .bearer_auth(token.expose()))
    }

    /// Sends the provided request, turning non-successful responses into an
    /// [`Error::Response`].
    async fn send(
        &self,
        request: RequestBuilder,
    ) -> Result<Response, Traced<Error>> {
        let request = request.build().map_err(tracerr::from_and_wrap!(=> Error))?;
        let (method, path) =
            (request.method().clone(), request.url().path().to_owned());

        let response = self
            .client
            .execute(request)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;
        let status = response.status();
        log::debug!("{method} {path} -> {status}");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(tracerr::new!(Error::response(
            status.as_u16(),
            error_message(status, &body),
        )))
    }

    /// Sends the provided request and parses its JSON response.
    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, Traced<Error>> {
        self.send(request)
            .await
            .map_err(tracerr::wrap!())?
            .json::<Payload<T>>()
            .await
            .map(Payload::into_inner)
            .map_err(tracerr::from_and_wrap!(=> Error))
    }

    /// Fetches the [`Order`] from the provided request.
    async fn fetch_order(
        &self,
        request: RequestBuilder,
    ) -> Result<Order, Traced<Error>> {
        self.fetch::<dto::OrderDto>(request)
            .await
            .map_err(tracerr::wrap!())?
            .into_order(self.currency)
            .map_err(tracerr::wrap!())
    }

    /// Fetches a list by the provided path `segments`, converting each of its
    /// elements with the provided function.
    async fn list<D, T>(
        &self,
        segments: &[&str],
        convert: impl FnMut(D) -> Result<T, Error>,
    ) -> Result<Vec<T>, Traced<Error>>
    where
        D: DeserializeOwned,
    {
        let request = self
            .request(Method::GET, segments)
            .await
            .map_err(tracerr::wrap!())?;
        self.fetch::<Vec<D>>(request)
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(convert)
            .collect::<Result<_, _>>()
            .map_err(tracerr::wrap!())
    }

    /// Fetches a single `T` by the provided path `segments`.
    ///
    /// [`None`] is returned if the API doesn't know it.
    async fn find<D, T>(
        &self,
        segments: &[&str],
    ) -> Result<Option<T>, Traced<Error>>
    where
        D: DeserializeOwned,
        T: TryFrom<D, Error = Error>,
    {
        let request = self
            .request(Method::GET, segments)
            .await
            .map_err(tracerr::wrap!())?;
        match self.fetch::<D>(request).await {
            Ok(dto) => T::try_from(dto).map(Some).map_err(tracerr::wrap!()),
            Err(e) if e.as_ref().status() == Some(404) => Ok(None),
            Err(e) => Err(tracerr::wrap!()(e)),
        }
    }
}

/// Extracts a human-readable message out of an error response `body`.
///
/// The `message` field is preferred, then the `error` one, and then the
/// reason phrase of the `status`.
fn error_message(status: StatusCode, body: &str) -> String {
    let json = serde_json::from_str::<serde_json::Value>(body).ok();
    let field = |name: &str| {
        let value = json.as_ref()?.get(name)?;
        value
            .as_str()
            .or_else(|| value.get("message")?.as_str())
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(ToOwned::to_owned)
    };

    field("message")
        .or_else(|| field("error"))
        .or_else(|| status.canonical_reason().map(ToOwned::to_owned))
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

impl Api<Perform<Login>> for Rest {
    type Ok = Credentials;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Perform(login): Perform<Login>,
    ) -> Result<Self::Ok, Self::Err> {
        let request = self
            .client
            .post(self.url(&["auth", "login"]))
            .json(&dto::LoginRequest {
                email: login.email.as_ref(),
                password: login.password.expose_secret().as_str(),
            });
        let resp = self
            .fetch::<dto::LoginResponse>(request)
            .await
            .map_err(tracerr::wrap!())?;

        Ok(Credentials {
            token: session::Token::new(resp.token).ok_or_else(|| {
                tracerr::new!(Error::InvalidData("blank token".into()))
            })?,
            user: User::try_from(resp.user).map_err(tracerr::wrap!())?,
        })
    }
}

impl Api<Perform<Logout>> for Rest {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(&self, _: Perform<Logout>) -> Result<Self::Ok, Self::Err> {
        let request = self
            .request(Method::POST, &["auth", "logout"])
            .await
            .map_err(tracerr::wrap!())?;
        drop(self.send(request).await.map_err(tracerr::wrap!())?);
        Ok(())
    }
}

impl Api<Perform<Authenticate>> for Rest {
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

impl Api<Select<By<Vec<Order>, Scope>>> for Rest {
    type Ok = Vec<Order>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Order>, Scope>>,
    ) -> Result<Self::Ok, Self::Err> {
        let request = self
            .request(Method::GET, &["orders"])
            .await
            .map_err(tracerr::wrap!())?;
        let request = match by.into_inner() {
            Scope::All => request,
            Scope::Client(id) => request.query(&[("clientId", id.as_ref())]),
            Scope::Supplier(id) => {
                request.query(&[("supplierId", id.as_ref())])
            }
            Scope::Employee(id) => {
                request.query(&[("employeeId", id.as_ref())])
            }
            Scope::Unclaimed => request.query(&[("unclaimed", "true")]),
        };

        self.fetch::<Vec<dto::OrderDto>>(request)
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|o| o.into_order(self.currency))
            .collect::<Result<_, _>>()
            .map_err(tracerr::wrap!())
    }
}

impl Api<Select<By<Option<Order>, order::Id>>> for Rest {
    type Ok = Option<Order>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Order>, order::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let request = self
            .request(Method::GET, &["orders", id.as_ref()])
            .await
            .map_err(tracerr::wrap!())?;
        match self.fetch_order(request).await {
            Ok(order) => Ok(Some(order)),
            Err(e) if e.as_ref().status() == Some(404) => Ok(None),
            Err(e) => Err(tracerr::wrap!()(e)),
        }
    }
}

impl Api<Insert<order::Draft>> for Rest {
    type Ok = Order;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Insert(draft): Insert<order::Draft>,
    ) -> Result<Self::Ok, Self::Err> {
        let request = self
            .request(Method::POST, &["orders"])
            .await
            .map_err(tracerr::wrap!())?
            .json(&dto::NewOrderRequest::from(&draft));
        self.fetch_order(request).await.map_err(tracerr::wrap!())
    }
}

impl Api<Perform<Transition>> for Rest {
    type Ok = Order;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Perform(transition): Perform<Transition>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = transition.order_id.as_ref();
        let endpoint = match transition.action {
            Action::Claim => "claim",
            Action::Confirm
            | Action::Cancel
            | Action::Advance
            | Action::ConfirmReceipt => "status",
        };
        let request = self
            .request(Method::PUT, &["orders", id, endpoint])
            .await
            .map_err(tracerr::wrap!())?
            .json(&dto::StatusRequest {
                status: transition.status,
                comment: transition.comment.as_deref(),
            });
        self.fetch_order(request).await.map_err(tracerr::wrap!())
    }
}

impl Api<Select<By<Vec<Product>, ()>>> for Rest {
    type Ok = Vec<Product>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Product>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.list(&["products"], |d: dto::ProductDto| Product::try_from(d))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl Api<Select<By<Option<Product>, product::Id>>> for Rest {
    type Ok = Option<Product>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Product>, product::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.find::<dto::ProductDto, _>(&["products", by.inner().as_ref()])
            .await
            .map_err(tracerr::wrap!())
    }
}

impl Api<Insert<product::Draft>> for Rest {
    type Ok = Product;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Insert(draft): Insert<product::Draft>,
    ) -> Result<Self::Ok, Self::Err> {
        let request = self
            .request(Method::POST, &["products"])
            .await
            .map_err(tracerr::wrap!())?
            .json(&dto::ProductRequest::from(&draft));
        let dto = self
            .fetch::<dto::ProductDto>(request)
            .await
            .map_err(tracerr::wrap!())?;
        Product::try_from(dto).map_err(tracerr::wrap!())
    }
}

impl Api<Update<Product>> for Rest {
    type Ok = Product;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Update(product): Update<Product>,
    ) -> Result<Self::Ok, Self::Err> {
        let request = self
            .request(Method::PUT, &["products", product.id.as_ref()])
            .await
            .map_err(tracerr::wrap!())?
            .json(&dto::ProductRequest::from(&product));
        let dto = self
            .fetch::<dto::ProductDto>(request)
            .await
            .map_err(tracerr::wrap!())?;
        Product::try_from(dto).map_err(tracerr::wrap!())
    }
}

impl Api<Delete<product::Id>> for Rest {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Delete(id): Delete<product::Id>,
    ) -> Result<Self::Ok, Self::Err> {
        let request = self
            .request(Method::DELETE, &["products", id.as_ref()])
            .await
            .map_err(tracerr::wrap!())?;
        drop(self.send(request).await.map_err(tracerr::wrap!())?);
        Ok(())
    }
}

impl Api<Select<By<Vec<Supplier>, ()>>> for Rest {
    type Ok = Vec<Supplier>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Supplier>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.list(&["suppliers"], |d: dto::SupplierDto| {
            Supplier::try_from(d)
        })
            .await
            .map_err(tracerr::wrap!())
    }
}

impl Api<Select<By<Vec<Client>, ()>>> for Rest {
    type Ok = Vec<Client>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Client>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.list(&["clients"], |d: dto::ClientDto| Ok(d.into()))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl Api<Select<By<Vec<Contract>, ()>>> for Rest {
    type Ok = Vec<Contract>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Contract>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.list(&["contracts"], |d: dto::ContractDto| Ok(d.into()))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl Api<Select<By<Vec<Notification>, ()>>> for Rest {
    type Ok = Vec<Notification>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Notification>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.list(&["notifications"], |d: dto::NotificationDto| {
            Ok(d.into())
        })
            .await
            .map_err(tracerr::wrap!())
    }
}

impl Api<Perform<MarkRead>> for Rest {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Perform(MarkRead(id)): Perform<MarkRead>,
    ) -> Result<Self::Ok, Self::Err> {
        let request = self
            .request(Method::PUT, &["notifications", id.as_ref(), "read"])
            .await
            .map_err(tracerr::wrap!())?;
        drop(self.send(request).await.map_err(tracerr::wrap!())?);
        Ok(())
    }
}
