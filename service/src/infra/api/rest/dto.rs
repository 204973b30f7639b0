//! JSON shapes of the REST API and their mapping into the domain.

use common::{
    datetime::serde::rfc3339, money::Currency, DateTime, Percent,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing as log;

use crate::{
    domain::{
        contract,
        notification::{self, Kind},
        order::{
            self, history, Address, LineItem, PaymentMethod, Quantity,
            ShippingMethod, Status,
        },
        product, user, Client, Contract, Notification, Order, Product,
        Supplier, User,
    },
    infra::api::Error,
};

/// Payload either returned as is or wrapped into a `data` field.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum Payload<T> {
    /// Wrapped payload.
    Wrapped {
        /// Payload itself.
        data: T,
    },

    /// Bare payload.
    Bare(T),
}

impl<T> Payload<T> {
    /// Unwraps this [`Payload`].
    pub(super) fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

/// Creates a new [`Error::InvalidData`] describing the invalid `what`.
fn invalid(what: impl Into<String>) -> Error {
    Error::InvalidData(what.into())
}

/// Keeps the non-blank `value` only.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parses an optional [`user::Email`], dropping the invalid one.
fn lenient_email(value: Option<String>) -> Option<user::Email> {
    non_blank(value).and_then(|v| {
        let email = user::Email::new(v.trim());
        if email.is_none() {
            log::warn!("ignoring malformed email `{v}` returned by API");
        }
        email
    })
}

/// Parses an optional [`user::Phone`], dropping the invalid one.
fn lenient_phone(value: Option<String>) -> Option<user::Phone> {
    non_blank(value).and_then(|v| {
        let phone = user::Phone::new(v.trim());
        if phone.is_none() {
            log::warn!("ignoring malformed phone `{v}` returned by API");
        }
        phone
    })
}

/// Parses an optional [`Percent`] rating.
fn percent(
    value: Option<Decimal>,
    what: &str,
) -> Result<Option<Percent>, Error> {
    value
        .map(|v| {
            Percent::new(v).ok_or_else(|| invalid(format!("{what} `{v}`")))
        })
        .transpose()
}

/// Credentials to sign in with.
#[derive(Debug, Serialize)]
pub(super) struct LoginRequest<'a> {
    /// Email of the user.
    pub(super) email: &'a str,

    /// Password of the user.
    pub(super) password: &'a str,
}

/// Response to a successful sign in.
#[derive(Debug, Deserialize)]
pub(super) struct LoginResponse {
    /// Issued access token.
    #[serde(alias = "accessToken")]
    pub(super) token: String,

    /// Profile of the signed-in user.
    pub(super) user: UserDto,
}

/// [`User`] profile.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UserDto {
    #[serde(alias = "_id")]
    id: String,
    name: String,
    email: String,
    role: user::Role,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    company: Option<String>,
}

impl TryFrom<UserDto> for User {
    type Error = Error;

    fn try_from(dto: UserDto) -> Result<Self, Self::Error> {
        Ok(Self {
            id: dto.id.into(),
            name: user::Name::new(dto.name.trim())
                .ok_or_else(|| invalid(format!("user name `{}`", dto.name)))?,
            email: user::Email::new(dto.email.trim())
                .ok_or_else(|| invalid(format!("user email `{}`", dto.email)))?,
            role: dto.role,
            phone: lenient_phone(dto.phone),
            company: non_blank(dto.company),
        })
    }
}

/// [`Address`] as the API shapes it.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct AddressDto {
    street: String,
    city: String,
    state: String,
    #[serde(alias = "postalCode")]
    zip_code: String,
    country: String,
}

impl From<AddressDto> for Address {
    fn from(dto: AddressDto) -> Self {
        Self {
            street: dto.street,
            city: dto.city,
            state: dto.state,
            postal_code: dto.zip_code,
            country: dto.country,
        }
    }
}

impl From<&Address> for AddressDto {
    fn from(address: &Address) -> Self {
        Self {
            street: address.street.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            zip_code: address.postal_code.clone(),
            country: address.country.clone(),
        }
    }
}

/// Ordered item.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ItemDto {
    #[serde(alias = "product")]
    product_id: String,
    #[serde(default)]
    name: String,
    quantity: u32,
    #[serde(
        alias = "unitPrice",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    price: Decimal,
}

impl TryFrom<ItemDto> for LineItem {
    type Error = Error;

    fn try_from(dto: ItemDto) -> Result<Self, Self::Error> {
        if dto.price.is_sign_negative() {
            return Err(invalid(format!(
                "negative price of `{}` product",
                dto.product_id,
            )));
        }
        let item = Self {
            quantity: Quantity::new(dto.quantity).ok_or_else(|| {
                invalid(format!("zero quantity of `{}` product", dto.product_id))
            })?,
            product_id: dto.product_id.into(),
            name: dto.name,
            unit_price: dto.price,
        };
        if item.checked_subtotal().is_none() {
            return Err(invalid(format!(
                "unrepresentable subtotal of `{}` product",
                item.product_id,
            )));
        }
        Ok(item)
    }
}

impl From<&LineItem> for ItemDto {
    fn from(item: &LineItem) -> Self {
        Self {
            product_id: item.product_id.to_string(),
            name: item.name.clone(),
            quantity: item.quantity.into(),
            price: item.unit_price,
        }
    }
}

/// Single status change of an [`Order`].
#[derive(Debug, Deserialize)]
pub(super) struct HistoryDto {
    status: Status,
    #[serde(alias = "date", with = "rfc3339")]
    timestamp: DateTime,
    #[serde(default)]
    comment: Option<String>,
}

/// [`Order`] as the API returns it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct OrderDto {
    #[serde(alias = "_id")]
    id: String,
    items: Vec<ItemDto>,
    #[serde(default)]
    currency: Option<Currency>,
    #[serde(alias = "createdAt", with = "rfc3339")]
    order_date: DateTime,
    status: Status,
    #[serde(default)]
    shipping_address: AddressDto,
    payment_method: PaymentMethod,
    shipping_method: ShippingMethod,
    #[serde(default, with = "rfc3339::option")]
    estimated_delivery: Option<DateTime>,
    #[serde(default)]
    status_history: Vec<HistoryDto>,
    #[serde(default)]
    employee_id: Option<String>,
    #[serde(default)]
    supplier_id: Option<String>,
    client_id: String,
}

impl OrderDto {
    /// Maps this [`OrderDto`] into an [`Order`], using the provided
    /// [`Currency`] when the API omits one.
    pub(super) fn into_order(self, currency: Currency) -> Result<Order, Error> {
        let mut history = self
            .status_history
            .into_iter()
            .map(|h| history::Entry {
                status: h.status,
                at: h.timestamp.coerce(),
                comment: non_blank(h.comment),
            })
            .collect::<Vec<_>>();
        if history.is_empty() {
            history.push(history::Entry {
                status: self.status,
                at: self.order_date.coerce(),
                comment: None,
            });
        }

        let items = self
            .items
            .into_iter()
            .map(LineItem::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        if items
            .iter()
            .try_fold(Decimal::ZERO, |sum, i| {
                sum.checked_add(i.checked_subtotal()?)
            })
            .is_none()
        {
            return Err(invalid(format!(
                "unrepresentable total of `{}` order",
                self.id,
            )));
        }

        Ok(Order {
            id: self.id.into(),
            items,
            currency: self.currency.unwrap_or(currency),
            ordered_at: self.order_date.coerce(),
            status: self.status,
            shipping_address: self.shipping_address.into(),
            payment_method: self.payment_method,
            shipping_method: self.shipping_method,
            estimated_delivery: self.estimated_delivery.map(DateTime::coerce),
            history: order::History::from_entries(history),
            employee_id: non_blank(self.employee_id).map(Into::into),
            supplier_id: non_blank(self.supplier_id).map(Into::into),
            client_id: self.client_id.into(),
        })
    }
}

/// New [`Order`] to place.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct NewOrderRequest {
    items: Vec<ItemDto>,
    currency: Currency,
    shipping_address: AddressDto,
    payment_method: PaymentMethod,
    shipping_method: ShippingMethod,
    client_id: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    total_amount: Decimal,
}

impl From<&order::Draft> for NewOrderRequest {
    fn from(draft: &order::Draft) -> Self {
        Self {
            items: draft.items.iter().map(Into::into).collect(),
            currency: draft.currency,
            shipping_address: (&draft.shipping_address).into(),
            payment_method: draft.payment_method,
            shipping_method: draft.shipping_method,
            client_id: draft.client_id.to_string(),
            total_amount: draft.total().amount,
        }
    }
}

/// Requested [`Order`] status change.
#[derive(Debug, Serialize)]
pub(super) struct StatusRequest<'a> {
    /// New [`Status`].
    pub(super) status: Status,

    /// Comment to leave in the history.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) comment: Option<&'a str>,
}

/// [`Product`] as the API shapes it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ProductDto {
    #[serde(alias = "_id")]
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category: Option<String>,
    price: Decimal,
    #[serde(default, alias = "quantity")]
    stock: u32,
    #[serde(default)]
    supplier_id: Option<String>,
}

impl TryFrom<ProductDto> for Product {
    type Error = Error;

    fn try_from(dto: ProductDto) -> Result<Self, Self::Error> {
        if dto.price.is_sign_negative() {
            return Err(invalid(format!("negative price of `{}`", dto.id)));
        }
        Ok(Self {
            name: product::Name::new(dto.name.trim()).ok_or_else(|| {
                invalid(format!("product name `{}`", dto.name))
            })?,
            id: dto.id.into(),
            description: non_blank(dto.description),
            category: non_blank(dto.category),
            price: dto.price,
            stock: dto.stock,
            supplier_id: non_blank(dto.supplier_id).map(Into::into),
        })
    }
}

/// [`Product`] attributes to store.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ProductRequest<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a str>,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    price: Decimal,
    stock: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    supplier_id: Option<&'a str>,
}

impl<'a> From<&'a product::Draft> for ProductRequest<'a> {
    fn from(draft: &'a product::Draft) -> Self {
        Self {
            name: draft.name.as_ref(),
            description: draft.description.as_deref(),
            category: draft.category.as_deref(),
            price: draft.price,
            stock: draft.stock,
            supplier_id: draft.supplier_id.as_ref().map(AsRef::as_ref),
        }
    }
}

impl<'a> From<&'a Product> for ProductRequest<'a> {
    fn from(product: &'a Product) -> Self {
        Self {
            name: product.name.as_ref(),
            description: product.description.as_deref(),
            category: product.category.as_deref(),
            price: product.price,
            stock: product.stock,
            supplier_id: product.supplier_id.as_ref().map(AsRef::as_ref),
        }
    }
}

/// [`Supplier`] as the API shapes it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SupplierDto {
    #[serde(alias = "_id", alias = "userId")]
    id: String,
    #[serde(alias = "companyName", alias = "name")]
    company: String,
    #[serde(default)]
    contact_person: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    on_time_deliveries: u64,
    #[serde(default)]
    late_deliveries: u64,
    #[serde(default, alias = "qualityRating")]
    quality: Option<Decimal>,
    #[serde(default)]
    cost_efficiency: Option<Decimal>,
    #[serde(default)]
    performance_score: Option<Decimal>,
}

impl TryFrom<SupplierDto> for Supplier {
    type Error = Error;

    fn try_from(dto: SupplierDto) -> Result<Self, Self::Error> {
        Ok(Self {
            quality: percent(dto.quality, "quality rating")?,
            cost_efficiency: percent(dto.cost_efficiency, "cost efficiency")?,
            performance_score: percent(
                dto.performance_score,
                "performance score",
            )?,
            id: dto.id.into(),
            company: dto.company,
            contact: non_blank(dto.contact_person),
            email: lenient_email(dto.email),
            on_time_deliveries: dto.on_time_deliveries,
            late_deliveries: dto.late_deliveries,
        })
    }
}

/// [`Client`] as the API shapes it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ClientDto {
    #[serde(alias = "_id", alias = "userId")]
    id: String,
    name: String,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    address: Option<AddressDto>,
    #[serde(default)]
    total_orders: u64,
}

impl From<ClientDto> for Client {
    fn from(dto: ClientDto) -> Self {
        Self {
            id: dto.id.into(),
            name: dto.name,
            company: non_blank(dto.company),
            email: lenient_email(dto.email),
            phone: lenient_phone(dto.phone),
            address: dto.address.map(Into::into),
            total_orders: dto.total_orders,
        }
    }
}

/// [`Contract`] as the API shapes it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ContractDto {
    #[serde(alias = "_id")]
    id: String,
    #[serde(alias = "name")]
    title: String,
    #[serde(default)]
    supplier_id: Option<String>,
    #[serde(default)]
    client_id: Option<String>,
    #[serde(default)]
    value: Option<Decimal>,
    #[serde(with = "rfc3339")]
    created_at: DateTime,
    #[serde(default, alias = "startDate", with = "rfc3339::option")]
    starts_at: Option<DateTime>,
    #[serde(default, alias = "endDate", with = "rfc3339::option")]
    expires_at: Option<DateTime>,
    #[serde(default, with = "rfc3339::option")]
    terminated_at: Option<DateTime>,
}

impl From<ContractDto> for Contract {
    fn from(dto: ContractDto) -> Self {
        Self {
            id: contract::Id::from(dto.id),
            title: dto.title,
            supplier_id: non_blank(dto.supplier_id).map(Into::into),
            client_id: non_blank(dto.client_id).map(Into::into),
            value: dto.value,
            created_at: dto.created_at.coerce(),
            starts_at: dto.starts_at.map(DateTime::coerce),
            expires_at: dto.expires_at.map(DateTime::coerce),
            terminated_at: dto.terminated_at.map(DateTime::coerce),
        }
    }
}

/// [`Notification`] as the API shapes it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct NotificationDto {
    #[serde(alias = "_id")]
    id: String,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<Kind>,
    #[serde(default)]
    title: String,
    message: String,
    #[serde(with = "rfc3339")]
    created_at: DateTime,
    #[serde(default, alias = "read")]
    is_read: bool,
}

impl From<NotificationDto> for Notification {
    fn from(dto: NotificationDto) -> Self {
        Self {
            id: notification::Id::from(dto.id),
            user_id: non_blank(dto.user_id).map(Into::into),
            kind: dto.kind.unwrap_or(Kind::Info),
            title: dto.title,
            message: dto.message,
            created_at: dto.created_at.coerce(),
            is_read: dto.is_read,
        }
    }
}

#[cfg(test)]
mod spec {
    use common::money::Currency;
    use rust_decimal::Decimal;
    use serde_json::json;

    use crate::{
        domain::{order::Status, Supplier},
        infra::api::Error,
    };

    use super::{OrderDto, Payload, SupplierDto};

    #[test]
    fn maps_order_and_sorts_history() {
        let dto: OrderDto = serde_json::from_value(json!({
            "_id": "ORD-7",
            "items": [
                {"product": "chair", "name": "Chair", "quantity": 2, "price": 500},
                {"productId": "desk", "quantity": 1, "unitPrice": "300.00"},
            ],
            "orderDate": "2024-05-01T09:00:00Z",
            "status": "In Transit",
            "shippingAddress": {"street": "1 Main St", "city": "Springfield",
                                "zipCode": "12345", "country": "US"},
            "paymentMethod": "PayPal",
            "shippingMethod": "Express",
            "estimatedDelivery": "2024-05-04",
            "statusHistory": [
                {"status": "Confirmed", "timestamp": "2024-05-02T00:00:00Z"},
                {"status": "Created", "timestamp": "2024-05-01T09:00:00Z"},
                {"status": "In Transit", "date": "2024-05-03T00:00:00Z",
                 "comment": ""},
            ],
            "supplierId": "",
            "clientId": "client-1",
            "totalAmount": 999,
        }))
        .unwrap();

        let order = dto.into_order(Currency::Eur).unwrap();

        assert_eq!(order.total().amount, Decimal::from(1300));
        assert_eq!(order.currency, Currency::Eur);
        assert_eq!(order.status, Status::InTransit);
        assert_eq!(order.supplier_id, None);
        assert_eq!(order.shipping_address.postal_code, "12345");
        assert_eq!(
            order.history.iter().map(|e| e.status).collect::<Vec<_>>(),
            vec![Status::Created, Status::Confirmed, Status::InTransit],
        );
        assert_eq!(order.history.last().unwrap().comment, None);
    }

    #[test]
    fn rejects_unrepresentable_amounts() {
        let order = |items: serde_json::Value| {
            serde_json::from_value::<OrderDto>(json!({
                "id": "ORD-9",
                "items": items,
                "orderDate": "2024-05-01T09:00:00Z",
                "status": "Created",
                "paymentMethod": "PayPal",
                "shippingMethod": "Express",
                "clientId": "client-1",
            }))
            .unwrap()
            .into_order(Currency::Usd)
        };

        let subtotal = order(json!([{
            "productId": "chair",
            "quantity": 100_000,
            "price": "10000000000000000000000000",
        }]));
        assert!(matches!(subtotal, Err(Error::InvalidData(_))));

        let total = order(json!([
            {"productId": "chair", "quantity": 1,
             "price": "50000000000000000000000000000"},
            {"productId": "desk", "quantity": 1,
             "price": "50000000000000000000000000000"},
        ]));
        assert!(matches!(total, Err(Error::InvalidData(_))));
    }

    #[test]
    fn rejects_unknown_status_label() {
        let res = serde_json::from_value::<OrderDto>(json!({
            "id": "ORD-8",
            "items": [],
            "orderDate": "2024-05-01",
            "status": "Lost",
            "paymentMethod": "PayPal",
            "shippingMethod": "Express",
            "clientId": "client-1",
        }));

        assert!(res.is_err());
    }

    #[test]
    fn rejects_zero_quantity() {
        let dto: OrderDto = serde_json::from_value(json!({
            "id": "ORD-9",
            "items": [{"productId": "chair", "quantity": 0, "price": 1}],
            "orderDate": "2024-05-01",
            "status": "Created",
            "paymentMethod": "PayPal",
            "shippingMethod": "Express",
            "clientId": "client-1",
        }))
        .unwrap();

        assert!(dto.into_order(Currency::Usd).is_err());
    }

    #[test]
    fn maps_supplier_ratings() {
        let dto: Payload<SupplierDto> = serde_json::from_value(json!({
            "data": {
                "_id": "sup-1",
                "companyName": "Acme",
                "email": "not an email",
                "onTimeDeliveries": 9,
                "qualityRating": 80,
                "costEfficiency": "70.5",
            },
        }))
        .unwrap();

        let supplier = Supplier::try_from(dto.into_inner()).unwrap();

        assert_eq!(supplier.company, "Acme");
        assert_eq!(supplier.email, None);
        assert_eq!(supplier.late_deliveries, 0);
        assert_eq!(
            supplier.cost_efficiency.map(|p| p.value()),
            Some(Decimal::new(705, 1)),
        );
        assert_eq!(supplier.performance_score, None);

        let out_of_range: SupplierDto = serde_json::from_value(json!({
            "id": "sup-2",
            "name": "Bolt",
            "qualityRating": 180,
        }))
        .unwrap();
        assert!(Supplier::try_from(out_of_range).is_err());
    }
}
