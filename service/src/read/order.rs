//! [`Order`] read models definitions.

use std::collections::BTreeMap;

use common::{money::Currency, Money};
use rust_decimal::Decimal;

use crate::domain::{order::Status, user, Order};
#[cfg(doc)]
use crate::domain::User;

/// Set of [`Order`]s the API is asked for.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Scope {
    /// Every [`Order`].
    #[default]
    All,

    /// [`Order`]s placed by the client [`User`].
    Client(user::Id),

    /// [`Order`]s claimed by the supplier [`User`].
    Supplier(user::Id),

    /// [`Order`]s handled by the employee [`User`].
    Employee(user::Id),

    /// [`Order`]s no supplier has claimed yet.
    Unclaimed,
}

impl Scope {
    /// Indicates whether the provided [`Order`] belongs to this [`Scope`].
    #[must_use]
    pub fn contains(&self, order: &Order) -> bool {
        match self {
            Self::All => true,
            Self::Client(id) => &order.client_id == id,
            Self::Supplier(id) => order.supplier_id.as_ref() == Some(id),
            Self::Employee(id) => order.employee_id.as_ref() == Some(id),
            Self::Unclaimed => {
                !order.is_claimed() && order.status == Status::Created
            }
        }
    }
}

pub mod list {
    //! [`Order`]s list definitions.

    use crate::domain::{order::Status, Order};

    /// Filter narrowing a list of [`Order`]s.
    #[derive(Clone, Debug, Default, Eq, PartialEq)]
    pub struct Filter {
        /// [`Status`] the [`Order`]s must have.
        pub status: Option<Status>,

        /// Case-insensitive substring to search for in the [`Order`] ID,
        /// client ID, item names and shipping address.
        pub search: Option<String>,

        /// Indicator whether only [`Order`]s no supplier has claimed should
        /// be kept.
        pub unclaimed_only: bool,
    }

    impl Filter {
        /// Indicates whether the provided [`Order`] passes this [`Filter`].
        #[must_use]
        pub fn matches(&self, order: &Order) -> bool {
            if self.status.is_some_and(|s| s != order.status) {
                return false;
            }
            if self.unclaimed_only && order.is_claimed() {
                return false;
            }
            let Some(needle) = self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
            else {
                return true;
            };
            let needle = needle.to_lowercase();
            let contains = |s: &str| s.to_lowercase().contains(&needle);

            contains(order.id.as_ref())
                || contains(order.client_id.as_ref())
                || order.items.iter().any(|i| contains(&i.name))
                || contains(&order.shipping_address.to_string())
        }
    }
}

/// Number of [`Order`]s per [`Status`], in display order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StatusBreakdown(Vec<(Status, usize)>);

impl StatusBreakdown {
    /// Counts the provided [`Order`]s per [`Status`].
    ///
    /// Every [`Status`] is present, even if no [`Order`] has it.
    #[must_use]
    pub fn of<'o>(orders: impl IntoIterator<Item = &'o Order>) -> Self {
        let mut counts = Status::ALL.iter().map(|s| (*s, 0)).collect::<Vec<_>>();
        for order in orders {
            if let Some((_, n)) = counts.iter_mut().find(|(s, _)| *s == order.status)
            {
                *n += 1;
            }
        }
        Self(counts)
    }

    /// Returns the number of [`Order`]s having the provided [`Status`].
    #[must_use]
    pub fn count(&self, status: Status) -> usize {
        self.0
            .iter()
            .find_map(|(s, n)| (*s == status).then_some(*n))
            .unwrap_or_default()
    }

    /// Returns an iterator over the [`Status`]es and their counts.
    pub fn iter(&self) -> impl Iterator<Item = (Status, usize)> + '_ {
        self.0.iter().copied()
    }
}

/// [`Order`]s volume of a single calendar month.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Month {
    /// Month as `YYYY-MM`.
    pub month: String,

    /// Number of [`Order`]s placed in this [`Month`].
    pub orders: usize,

    /// Revenue of the [`Order`]s placed in this [`Month`].
    pub revenue: Money,
}

/// [`Order`]s volume per calendar month, oldest first.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MonthlyVolume(Vec<Month>);

impl MonthlyVolume {
    /// Groups the provided [`Order`]s by the month they were placed in.
    ///
    /// Only [`Order`]s that [`count_as_revenue()`] in the provided
    /// [`Currency`] contribute to the revenue.
    #[must_use]
    pub fn of<'o>(
        orders: impl IntoIterator<Item = &'o Order>,
        currency: Currency,
    ) -> Self {
        let mut months = BTreeMap::<String, (usize, Decimal)>::new();
        for order in orders {
            let (count, revenue) =
                months.entry(order.ordered_at.to_month_string()).or_default();
            *count += 1;
            if count_as_revenue(order, currency) {
                *revenue = revenue.saturating_add(order.total().amount);
            }
        }
        Self(
            months
                .into_iter()
                .map(|(month, (orders, revenue))| Month {
                    month,
                    orders,
                    revenue: Money::new(revenue, currency),
                })
                .collect(),
        )
    }

    /// Returns the [`Month`]s, oldest first.
    #[must_use]
    pub fn months(&self) -> &[Month] {
        &self.0
    }
}

/// Indicates whether the provided [`Order`] contributes to the revenue in
/// the provided [`Currency`].
///
/// Cancelled and returned [`Order`]s never do.
#[must_use]
pub fn count_as_revenue(order: &Order, currency: Currency) -> bool {
    order.currency == currency
        && !matches!(order.status, Status::Cancelled | Status::Returned)
}

/// Sorts the provided [`Order`]s from the most recent to the oldest.
pub fn sort_recent_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| {
        b.ordered_at.cmp(&a.ordered_at).then_with(|| a.id.cmp(&b.id))
    });
}
