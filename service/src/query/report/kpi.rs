//! [`Kpi`] definition.

use common::{
    money::Currency,
    operations::{By, Select},
    Money,
};
use rust_decimal::{Decimal, RoundingStrategy};
use tracerr::Traced;

use crate::{
    domain::{order::Status, Order},
    infra::{api, Api},
    read::{
        metrics::OnTimeDelivery,
        order::{count_as_revenue, MonthlyVolume, Scope, StatusBreakdown},
    },
    Query, Service,
};

/// [`Query`] of the key performance indicators over the [`Order`]s of the
/// provided [`Scope`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Kpi {
    /// [`Scope`] of the [`Order`]s to report on.
    pub scope: Scope,
}

/// Output of the [`Kpi`] [`Query`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Output {
    /// Total number of [`Order`]s.
    pub orders: usize,

    /// Number of [`Order`]s still on their way to the client.
    pub pending: usize,

    /// Number of delivered or received [`Order`]s.
    pub delivered: usize,

    /// Number of cancelled [`Order`]s.
    pub cancelled: usize,

    /// Total value of the [`Order`]s counting as revenue.
    pub revenue: Money,

    /// Average value of the [`Order`]s counting as revenue.
    pub average_order_value: Money,

    /// On-time deliveries of the delivered [`Order`]s.
    pub on_time: OnTimeDelivery,

    /// Number of [`Order`]s per [`Status`].
    pub breakdown: StatusBreakdown,

    /// Number of [`Order`]s and revenue per month.
    pub monthly: MonthlyVolume,
}

impl Output {
    /// Calculates the [`Output`] over the provided [`Order`]s, counting
    /// revenue in the provided [`Currency`].
    #[must_use]
    pub fn of(orders: &[Order], currency: Currency) -> Self {
        let breakdown = StatusBreakdown::of(orders);
        let count = |statuses: &[Status]| {
            statuses.iter().map(|s| breakdown.count(*s)).sum::<usize>()
        };

        let (revenue, paid) = orders
            .iter()
            .filter(|o| count_as_revenue(o, currency))
            .fold((Decimal::ZERO, 0_u32), |(sum, n), o| {
                (sum.saturating_add(o.total().amount), n + 1)
            });
        let average = if paid == 0 {
            Decimal::ZERO
        } else {
            (revenue / Decimal::from(paid))
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        };

        Self {
            orders: orders.len(),
            pending: count(&[
                Status::Created,
                Status::Confirmed,
                Status::Processing,
                Status::Shipped,
                Status::InTransit,
            ]),
            delivered: count(&[Status::Delivered, Status::Received]),
            cancelled: count(&[Status::Cancelled]),
            revenue: Money::new(revenue, currency),
            average_order_value: Money::new(average, currency),
            on_time: OnTimeDelivery::from_orders(orders),
            monthly: MonthlyVolume::of(orders, currency),
            breakdown,
        }
    }
}

impl<A, S> Query<Kpi> for Service<A, S>
where
    A: Api<Select<By<Vec<Order>, Scope>>, Ok = Vec<Order>, Err = Traced<api::Error>>,
{
    type Ok = Output;
    type Err = Traced<api::Error>;

    async fn execute(&self, Kpi { scope }: Kpi) -> Result<Self::Ok, Self::Err> {
        let orders = self
            .api()
            .execute(Select(By::new(scope)))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(Output::of(&orders, self.config().currency))
    }
}

#[cfg(test)]
mod spec {
    use common::{money::Currency, Percent};
    use rust_decimal::Decimal;

    use crate::domain::order::{self, Status};

    use super::Output;

    #[test]
    fn reports_cards() {
        let mut euro = order::spec::order("o-4", Status::Shipped);
        euro.currency = Currency::Eur;
        let orders = [
            order::spec::order("o-1", Status::Delivered),
            order::spec::order("o-2", Status::Created),
            order::spec::order("o-3", Status::Cancelled),
            euro,
        ];

        let kpi = Output::of(&orders, Currency::Usd);

        assert_eq!(kpi.orders, 4);
        assert_eq!(kpi.pending, 2);
        assert_eq!(kpi.delivered, 1);
        assert_eq!(kpi.cancelled, 1);
        assert_eq!(kpi.revenue.amount, Decimal::from(2600));
        assert_eq!(kpi.average_order_value.amount, Decimal::from(1300));
        assert_eq!(kpi.on_time.percentage(), Percent::FULL);
        assert_eq!(kpi.breakdown.count(Status::Shipped), 1);
        assert_eq!(kpi.monthly.months().len(), 1);
        assert_eq!(kpi.monthly.months()[0].orders, 4);
    }

    #[test]
    fn saturates_revenue() {
        let mut huge = order::spec::order("o-1", Status::Delivered);
        huge.items[0].unit_price = Decimal::MAX;
        let orders = [huge.clone(), huge];

        let kpi = Output::of(&orders, Currency::Usd);

        assert_eq!(kpi.revenue.amount, Decimal::MAX);
        assert_eq!(kpi.monthly.months()[0].revenue.amount, Decimal::MAX);
    }

    #[test]
    fn reports_zeroes_without_orders() {
        let kpi = Output::of(&[], Currency::Usd);

        assert_eq!(kpi.orders, 0);
        assert_eq!(kpi.average_order_value.amount, Decimal::ZERO);
        assert_eq!(kpi.on_time.percentage(), Percent::ZERO);
    }
}
