//! Derived metrics definitions.

use common::Percent;
use rust_decimal::{Decimal, RoundingStrategy};
use smart_default::SmartDefault;

use crate::domain::{Order, Supplier};

/// Counts of deliveries made on time and late.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct OnTimeDelivery {
    /// Number of deliveries made no later than promised.
    pub on_time: u64,

    /// Number of deliveries made later than promised.
    pub late: u64,
}

impl OnTimeDelivery {
    /// Counts on-time and late deliveries among the provided [`Order`]s.
    ///
    /// [`Order`]s that are not delivered yet, or have no estimated delivery
    /// date, are not counted.
    #[must_use]
    pub fn from_orders<'o>(orders: impl IntoIterator<Item = &'o Order>) -> Self {
        orders.into_iter().filter_map(Order::is_delivered_on_time).fold(
            Self::default(),
            |mut acc, on_time| {
                if on_time {
                    acc.on_time += 1;
                } else {
                    acc.late += 1;
                }
                acc
            },
        )
    }

    /// Takes the delivery counters reported for the provided [`Supplier`].
    #[must_use]
    pub const fn from_counters(supplier: &Supplier) -> Self {
        Self {
            on_time: supplier.on_time_deliveries,
            late: supplier.late_deliveries,
        }
    }

    /// Returns the total number of counted deliveries, saturating at
    /// [`u64::MAX`].
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.on_time.saturating_add(self.late)
    }

    /// Indicates whether no deliveries were counted.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.on_time == 0 && self.late == 0
    }

    /// Returns the rounded share of on-time deliveries.
    ///
    /// Zero when nothing was counted.
    #[must_use]
    pub fn percentage(&self) -> Percent {
        Percent::share(self.on_time, self.late)
    }
}

/// Weights blending a performance score out of its components.
#[derive(Clone, Copy, Debug, Eq, PartialEq, SmartDefault)]
pub struct Weights {
    /// Weight of the on-time delivery percentage.
    #[default(Decimal::new(4, 1))]
    on_time: Decimal,

    /// Weight of the quality rating.
    #[default(Decimal::new(4, 1))]
    quality: Decimal,

    /// Weight of the cost efficiency rating.
    #[default(Decimal::new(2, 1))]
    cost_efficiency: Decimal,
}

impl Weights {
    /// Creates new [`Weights`] if none of them is negative and they sum up
    /// to exactly one.
    #[must_use]
    pub fn new(
        on_time: Decimal,
        quality: Decimal,
        cost_efficiency: Decimal,
    ) -> Option<Self> {
        let all = [on_time, quality, cost_efficiency];
        (all.iter().all(|w| !w.is_sign_negative())
            && all.iter().sum::<Decimal>() == Decimal::ONE)
            .then_some(Self {
                on_time,
                quality,
                cost_efficiency,
            })
    }

    /// Returns the weight of the on-time delivery percentage.
    #[must_use]
    pub const fn on_time(&self) -> Decimal {
        self.on_time
    }

    /// Returns the weight of the quality rating.
    #[must_use]
    pub const fn quality(&self) -> Decimal {
        self.quality
    }

    /// Returns the weight of the cost efficiency rating.
    #[must_use]
    pub const fn cost_efficiency(&self) -> Decimal {
        self.cost_efficiency
    }
}

/// Blends a performance score out of its components using the provided
/// [`Weights`], rounded to one decimal place.
#[must_use]
pub fn performance_score(
    on_time: Percent,
    quality: Percent,
    cost_efficiency: Percent,
    weights: &Weights,
) -> Percent {
    let score = weights.on_time * on_time.value()
        + weights.quality * quality.value()
        + weights.cost_efficiency * cost_efficiency.value();
    Percent::saturating(
        score.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero),
    )
}

#[cfg(test)]
mod spec {
    use common::Percent;
    use rust_decimal::Decimal;

    use crate::domain::{
        order::{self, history, Status},
        Order,
    };

    use super::{performance_score, OnTimeDelivery, Weights};

    fn pct(v: i64) -> Percent {
        Percent::new(Decimal::from(v)).unwrap()
    }

    fn delivered(id: &str, at: &str) -> Order {
        let mut order = order::spec::order(id, Status::Delivered);
        order.history = order::History::from_entries(vec![history::Entry {
            status: Status::Delivered,
            at: common::DateTime::parse(at).unwrap().coerce(),
            comment: None,
        }]);
        order
    }

    #[test]
    fn guards_division_by_zero() {
        let empty = OnTimeDelivery::default();

        assert!(empty.is_empty());
        assert_eq!(empty.percentage(), Percent::ZERO);
    }

    #[test]
    fn rounds_percentage() {
        let counts = OnTimeDelivery {
            on_time: 2,
            late: 1,
        };
        assert_eq!(counts.percentage(), pct(67));

        let counts = OnTimeDelivery {
            on_time: 1,
            late: 7,
        };
        assert_eq!(counts.percentage(), pct(13));
    }

    #[test]
    fn stays_within_range() {
        for on_time in 0..20 {
            for late in 0..20 {
                let p = OnTimeDelivery { on_time, late }.percentage();
                assert!(p >= Percent::ZERO && p <= Percent::FULL);
            }
        }
        assert_eq!(
            OnTimeDelivery {
                on_time: u64::MAX,
                late: u64::MAX,
            }
            .percentage(),
            pct(50),
        );
    }

    #[test]
    fn counts_delivered_orders_only() {
        let orders = [
            delivered("o1", "2024-05-09T10:00:00Z"),
            delivered("o2", "2024-05-10T22:00:00Z"),
            delivered("o3", "2024-05-12T08:00:00Z"),
            order::spec::order("o4", Status::Shipped),
        ];

        let counts = OnTimeDelivery::from_orders(&orders);

        assert_eq!(
            counts,
            OnTimeDelivery {
                on_time: 2,
                late: 1,
            },
        );
        assert_eq!(counts.percentage(), pct(67));
    }

    #[test]
    fn validates_weights() {
        assert_eq!(
            Weights::new(Decimal::new(4, 1), Decimal::new(4, 1), Decimal::new(2, 1)),
            Some(Weights::default()),
        );
        assert!(Weights::new(Decimal::ONE, Decimal::ONE, Decimal::ZERO).is_none());
        assert!(Weights::new(
            Decimal::new(12, 1),
            Decimal::new(-2, 1),
            Decimal::ZERO,
        )
        .is_none());
    }

    #[test]
    fn blends_score_with_default_weights() {
        let score =
            performance_score(pct(90), pct(80), pct(70), &Weights::default());

        assert_eq!(score, Percent::new(Decimal::from(82)).unwrap());
        assert_eq!(
            performance_score(
                Percent::FULL,
                Percent::FULL,
                Percent::FULL,
                &Weights::default(),
            ),
            Percent::FULL,
        );
    }
}
