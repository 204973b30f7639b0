//! [`Order`] definitions.

pub mod history;
pub mod status;

use std::fmt;

use common::{define_kind, money::Currency, unit, DateTime, DateTimeOf, Money};
use derive_more::{AsRef, Display, Error, From, FromStr, Into};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{product, user};
#[cfg(doc)]
use crate::domain::{Product, User};

pub use self::{
    history::History,
    status::{Action, Status, TransitionError},
};

/// Purchase request of a client, tracked through fulfillment [`Status`]es.
#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    /// ID of this [`Order`].
    pub id: Id,

    /// Ordered [`LineItem`]s.
    pub items: Vec<LineItem>,

    /// [`Currency`] of the [`LineItem`] prices.
    pub currency: Currency,

    /// [`DateTime`] when this [`Order`] was placed.
    pub ordered_at: CreationDateTime,

    /// Current [`Status`] of this [`Order`].
    pub status: Status,

    /// [`Address`] to ship this [`Order`] to.
    pub shipping_address: Address,

    /// [`PaymentMethod`] chosen by the client.
    pub payment_method: PaymentMethod,

    /// [`ShippingMethod`] chosen by the client.
    pub shipping_method: ShippingMethod,

    /// [`DateTime`] this [`Order`] is expected to be delivered at, if known.
    pub estimated_delivery: Option<EstimatedDeliveryDateTime>,

    /// [`History`] of [`Status`] changes.
    pub history: History,

    /// ID of the employee [`User`] handling this [`Order`], if any.
    pub employee_id: Option<user::Id>,

    /// ID of the supplier [`User`] fulfilling this [`Order`], if any.
    pub supplier_id: Option<user::Id>,

    /// ID of the client [`User`] who placed this [`Order`].
    pub client_id: user::Id,
}

impl Order {
    /// Returns the total value of this [`Order`]: the sum of every
    /// [`LineItem`] quantity multiplied by its unit price.
    ///
    /// Saturates at [`Decimal::MAX`].
    #[must_use]
    pub fn total(&self) -> Money {
        Money::new(sum_subtotals(&self.items), self.currency)
    }

    /// Indicates whether a supplier has claimed this [`Order`].
    #[must_use]
    pub fn is_claimed(&self) -> bool {
        self.supplier_id.is_some()
    }

    /// Returns the [`DateTime`] this [`Order`] was delivered at, if it was.
    #[must_use]
    pub fn delivered_at(&self) -> Option<history::ChangeDateTime> {
        self.history.last_of(Status::Delivered).map(|e| e.at)
    }

    /// Indicates whether this [`Order`] was delivered no later than its
    /// estimated delivery date.
    ///
    /// [`None`] is returned if the [`Order`] is not delivered yet or has no
    /// estimate to compare against.
    #[must_use]
    pub fn is_delivered_on_time(&self) -> Option<bool> {
        let delivered = self.delivered_at()?;
        let estimated = self.estimated_delivery?;
        // Estimates are calendar dates, so the whole day counts.
        Some(delivered.to_date_string() <= estimated.to_date_string())
    }

    /// Produces a copy of this [`Order`] with the provided [`Action`]
    /// applied by the provided [`Initiator`] at the provided moment.
    ///
    /// This [`Order`] is left untouched, so a rejected transition never
    /// changes its [`Status`].
    ///
    /// # Errors
    ///
    /// If the [`Action`] is illegal for the current [`Status`], or the
    /// [`Initiator`] is not allowed to perform it.
    pub fn transit(
        &self,
        action: Action,
        initiator: &Initiator,
        at: DateTime,
        comment: Option<String>,
    ) -> Result<Self, TransitionError> {
        let status =
            self.status
                .transit(action, initiator.role, self.is_claimed())?;

        let is_client = initiator.role == user::Role::Client;
        if is_client && initiator.id != self.client_id {
            return Err(TransitionError::NotOwner);
        }

        let mut order = self.clone();
        order.status = status;
        match action {
            Action::Claim => order.supplier_id = Some(initiator.id.clone()),
            Action::Confirm | Action::Advance => {
                if order.employee_id.is_none() {
                    order.employee_id = Some(initiator.id.clone());
                }
            }
            Action::Cancel | Action::ConfirmReceipt => {}
        }

        // Never go back in time, even with a skewed local clock.
        let at = order
            .history
            .last()
            .map_or(at.coerce(), |last| last.at.max(at.coerce()));
        order
            .history
            .push(history::Entry {
                status,
                at,
                comment: Some(
                    comment.unwrap_or_else(|| default_comment(action, status)),
                ),
            })
            .unwrap_or_else(|e| unreachable!("`at` is not older: {e}"));

        Ok(order)
    }
}

/// Client's request to place a new [`Order`], before the API assigns it an
/// ID.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Draft {
    /// [`LineItem`]s to order.
    pub items: Vec<LineItem>,

    /// [`Currency`] of the [`LineItem`] prices.
    pub currency: Currency,

    /// [`Address`] to ship the [`Order`] to.
    pub shipping_address: Address,

    /// Chosen [`PaymentMethod`].
    pub payment_method: PaymentMethod,

    /// Chosen [`ShippingMethod`].
    pub shipping_method: ShippingMethod,

    /// ID of the client [`User`] placing the [`Order`].
    pub client_id: user::Id,
}

impl Draft {
    /// Returns the total value of this [`Draft`].
    ///
    /// Saturates at [`Decimal::MAX`].
    #[must_use]
    pub fn total(&self) -> Money {
        Money::new(sum_subtotals(&self.items), self.currency)
    }
}

/// Sums subtotals of the provided [`LineItem`]s, saturating at
/// [`Decimal::MAX`].
fn sum_subtotals(items: &[LineItem]) -> Decimal {
    items
        .iter()
        .map(LineItem::subtotal)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Returns the default [`history::Entry`] comment for the provided
/// [`Action`].
fn default_comment(action: Action, status: Status) -> String {
    match action {
        Action::Claim => "Order claimed by supplier".to_owned(),
        Action::Cancel => "Order cancelled".to_owned(),
        Action::ConfirmReceipt => {
            "Order receipt confirmed by client".to_owned()
        }
        Action::Confirm | Action::Advance => {
            format!("Order status updated to {status}")
        }
    }
}

/// [`User`] initiating an [`Order`] transition.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Initiator {
    /// ID of the [`User`].
    pub id: user::Id,

    /// [`user::Role`] of the [`User`].
    pub role: user::Role,
}

/// ID of an [`Order`].
#[derive(
    AsRef,
    Clone,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[as_ref(str)]
#[from(&str, String)]
pub struct Id(String);

/// Ordered [`Product`] along with its quantity and price.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LineItem {
    /// ID of the ordered [`Product`].
    pub product_id: product::Id,

    /// Name of the [`Product`] at the time of ordering.
    pub name: String,

    /// Ordered [`Quantity`].
    pub quantity: Quantity,

    /// Price of a single unit.
    pub unit_price: Decimal,
}

impl LineItem {
    /// Returns the quantity multiplied by the unit price, saturating at
    /// [`Decimal::MAX`].
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        Decimal::from(u32::from(self.quantity)).saturating_mul(self.unit_price)
    }

    /// Returns the quantity multiplied by the unit price, if representable.
    #[must_use]
    pub fn checked_subtotal(&self) -> Option<Decimal> {
        Decimal::from(u32::from(self.quantity)).checked_mul(self.unit_price)
    }
}

/// Positive quantity of units.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// Creates a new [`Quantity`] if the provided value is positive.
    #[must_use]
    pub const fn new(value: u32) -> Option<Self> {
        if value == 0 {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Adds the provided [`Quantity`], saturating at [`u32::MAX`].
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl TryFrom<u32> for Quantity {
    type Error = &'static str;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or("`Quantity` must be positive")
    }
}

/// Shipping address of an [`Order`].
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct Address {
    /// Street and building.
    pub street: String,

    /// City.
    pub city: String,

    /// State or region.
    pub state: String,

    /// Postal code.
    pub postal_code: String,

    /// Country.
    pub country: String,
}

impl Address {
    /// Checks whether this [`Address`] is complete enough to ship to.
    ///
    /// # Errors
    ///
    /// With the name of the first missing required field.
    pub fn validate(&self) -> Result<(), IncompleteAddressError> {
        [
            ("street", &self.street),
            ("city", &self.city),
            ("country", &self.country),
        ]
        .into_iter()
        .find(|(_, v)| v.trim().is_empty())
        .map_or(Ok(()), |(field, _)| Err(IncompleteAddressError { field }))
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [
            &self.street,
            &self.city,
            &self.state,
            &self.postal_code,
            &self.country,
        ];
        let mut first = true;
        for part in parts.into_iter().filter(|p| !p.trim().is_empty()) {
            if !first {
                f.write_str(", ")?;
            }
            f.write_str(part.trim())?;
            first = false;
        }
        Ok(())
    }
}

/// Error of an [`Address`] missing a required field.
#[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
#[display("shipping address `{field}` is required")]
pub struct IncompleteAddressError {
    /// Name of the missing field.
    #[error(not(source))]
    pub field: &'static str,
}

define_kind! {
    #[doc = "Payment method of an [`Order`]."]
    enum PaymentMethod {
        #[doc = "Credit or debit card."]
        #[label = "Credit Card"]
        CreditCard = 1,

        #[doc = "Bank transfer."]
        #[label = "Bank Transfer"]
        BankTransfer = 2,

        #[doc = "PayPal."]
        #[label = "PayPal"]
        PayPal = 3,

        #[doc = "Cash paid on delivery."]
        #[label = "Cash on Delivery"]
        CashOnDelivery = 4,
    }
}

define_kind! {
    #[doc = "Shipping method of an [`Order`]."]
    enum ShippingMethod {
        #[doc = "Regular delivery."]
        #[label = "Standard"]
        Standard = 1,

        #[doc = "Faster delivery."]
        #[label = "Express"]
        Express = 2,

        #[doc = "Next day delivery."]
        #[label = "Overnight"]
        Overnight = 3,
    }
}

/// [`DateTime`] when an [`Order`] was placed.
pub type CreationDateTime = DateTimeOf<(Order, unit::Creation)>;

/// [`DateTime`] an [`Order`] is expected to be delivered at.
pub type EstimatedDeliveryDateTime = DateTimeOf<(Order, unit::Estimation)>;

#[cfg(test)]
pub(crate) mod spec {
    use common::{money::Currency, DateTime};
    use rust_decimal::Decimal;

    use crate::domain::user;

    use super::{
        history, Action, Address, History, Initiator, LineItem, Order,
        PaymentMethod, Quantity, ShippingMethod, Status, TransitionError,
    };

    pub(crate) fn item(product: &str, quantity: u32, price: i64) -> LineItem {
        LineItem {
            product_id: product.into(),
            name: product.to_uppercase(),
            quantity: Quantity::new(quantity).unwrap(),
            unit_price: Decimal::from(price),
        }
    }

    pub(crate) fn order(id: &str, status: Status) -> Order {
        let at = DateTime::parse("2024-05-01T09:00:00Z").unwrap();
        Order {
            id: id.into(),
            items: vec![item("chair", 2, 500), item("desk", 1, 300)],
            currency: Currency::Usd,
            ordered_at: at.coerce(),
            status,
            shipping_address: Address {
                street: "1 Main St".into(),
                city: "Springfield".into(),
                country: "US".into(),
                ..Address::default()
            },
            payment_method: PaymentMethod::CreditCard,
            shipping_method: ShippingMethod::Standard,
            estimated_delivery: Some(
                DateTime::parse("2024-05-10").unwrap().coerce(),
            ),
            history: History::from_entries(vec![history::Entry {
                status,
                at: at.coerce(),
                comment: None,
            }]),
            employee_id: None,
            supplier_id: None,
            client_id: "client-1".into(),
        }
    }

    fn initiator(id: &str, role: user::Role) -> Initiator {
        Initiator {
            id: id.into(),
            role,
        }
    }

    fn now() -> DateTime {
        DateTime::parse("2024-05-11T12:00:00Z").unwrap()
    }

    #[test]
    fn computes_total() {
        let order = order("o1", Status::Created);

        assert_eq!(order.total().amount, Decimal::from(1300));
        assert_eq!(order.total().currency, Currency::Usd);
    }

    #[test]
    fn displays_address_without_blank_parts() {
        let address = Address {
            street: "1 Main St".into(),
            city: " Springfield ".into(),
            state: "  ".into(),
            postal_code: "12345".into(),
            country: "US".into(),
        };

        assert_eq!(address.to_string(), "1 Main St, Springfield, 12345, US");
    }

    #[test]
    fn saturates_total_instead_of_overflowing() {
        let mut order = order("o1", Status::Created);
        order.items[0].unit_price = Decimal::MAX;

        assert_eq!(order.items[0].checked_subtotal(), None);
        assert_eq!(order.items[0].subtotal(), Decimal::MAX);
        assert_eq!(order.total().amount, Decimal::MAX);
    }

    #[test]
    fn confirms_receipt() {
        let order = order("o1", Status::Delivered);
        let client = initiator("client-1", user::Role::Client);

        let received = order
            .transit(Action::ConfirmReceipt, &client, now(), None)
            .unwrap();

        assert_eq!(received.status, Status::Received);
        assert_eq!(received.history.len(), order.history.len() + 1);
        let last = received.history.last().unwrap();
        assert_eq!(last.status, Status::Received);
        assert_eq!(last.at, now().coerce());
        assert_eq!(order.status, Status::Delivered);
    }

    #[test]
    fn blocks_everything_after_cancel() {
        let order = order("o1", Status::Created);
        let client = initiator("client-1", user::Role::Client);
        let employee = initiator("emp-1", user::Role::Employee);
        let supplier = initiator("sup-1", user::Role::Supplier);

        let cancelled = order.transit(Action::Cancel, &client, now(), None);
        let cancelled = cancelled.unwrap();
        assert_eq!(cancelled.status, Status::Cancelled);

        for (action, who) in [
            (Action::Confirm, &employee),
            (Action::Advance, &employee),
            (Action::Cancel, &client),
            (Action::Claim, &supplier),
            (Action::ConfirmReceipt, &client),
        ] {
            assert_eq!(
                cancelled.transit(action, who, now(), None),
                Err(TransitionError::Terminal(Status::Cancelled)),
            );
        }
    }

    #[test]
    fn rejects_foreign_client() {
        let order = order("o1", Status::Created);
        let stranger = initiator("client-2", user::Role::Client);

        assert_eq!(
            order.transit(Action::Cancel, &stranger, now(), None),
            Err(TransitionError::NotOwner),
        );
    }

    #[test]
    fn claim_assigns_supplier() {
        let order = order("o1", Status::Created);
        let supplier = initiator("sup-1", user::Role::Supplier);

        let claimed =
            order.transit(Action::Claim, &supplier, now(), None).unwrap();

        assert_eq!(claimed.status, Status::Created);
        assert_eq!(claimed.supplier_id, Some("sup-1".into()));
        assert_eq!(
            claimed.history.last().unwrap().comment.as_deref(),
            Some("Order claimed by supplier"),
        );
        assert_eq!(
            claimed.transit(Action::Claim, &supplier, now(), None),
            Err(TransitionError::AlreadyClaimed),
        );
    }

    #[test]
    fn keeps_history_monotonic_with_skewed_clock() {
        let order = order("o1", Status::Created);
        let employee = initiator("emp-1", user::Role::Employee);
        let past = DateTime::parse("2020-01-01T00:00:00Z").unwrap();

        let confirmed =
            order.transit(Action::Confirm, &employee, past, None).unwrap();

        assert_eq!(
            confirmed.history.last().unwrap().at,
            order.history.last().unwrap().at,
        );
        assert_eq!(confirmed.employee_id, Some("emp-1".into()));
    }

    #[test]
    fn detects_on_time_delivery() {
        let mut order = order("o1", Status::Delivered);
        order.history = History::from_entries(vec![history::Entry {
            status: Status::Delivered,
            at: DateTime::parse("2024-05-10T23:00:00Z").unwrap().coerce(),
            comment: None,
        }]);
        assert_eq!(order.is_delivered_on_time(), Some(true));

        order.history = History::from_entries(vec![history::Entry {
            status: Status::Delivered,
            at: DateTime::parse("2024-05-11T01:00:00Z").unwrap().coerce(),
            comment: None,
        }]);
        assert_eq!(order.is_delivered_on_time(), Some(false));

        order.estimated_delivery = None;
        assert_eq!(order.is_delivered_on_time(), None);
    }

    #[test]
    fn validates_address() {
        let mut address = order("o1", Status::Created).shipping_address;
        assert!(address.validate().is_ok());
        assert_eq!(address.to_string(), "1 Main St, Springfield, US");

        address.city = "  ".into();
        assert_eq!(address.validate().unwrap_err().field, "city");
    }
}
