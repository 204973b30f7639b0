//! [`Supplier`] read models definitions.

use common::{define_kind, Percent};

use crate::{
    domain::{user, Order, Supplier},
    read::metrics::{self, OnTimeDelivery, Weights},
};

define_kind! {
    #[doc = "Source a [`Performance`] score was taken from."]
    enum ScoreSource {
        #[doc = "Blended out of on-time delivery, quality and cost \
                 efficiency with the configured [`Weights`]."]
        #[label = "weighted"]
        Weighted = 1,

        #[doc = "Reported by the API as is."]
        #[label = "reported"]
        Reported = 2,

        #[doc = "On-time delivery percentage only, since nothing else is \
                 known."]
        #[label = "on-time"]
        OnTimeOnly = 3,
    }
}

/// Performance of a [`Supplier`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Performance {
    /// ID of the [`Supplier`].
    pub supplier_id: user::Id,

    /// Company name of the [`Supplier`].
    pub company: String,

    /// On-time deliveries of the [`Supplier`].
    pub on_time: OnTimeDelivery,

    /// Quality rating of the [`Supplier`], if rated.
    pub quality: Option<Percent>,

    /// Cost efficiency rating of the [`Supplier`], if rated.
    pub cost_efficiency: Option<Percent>,

    /// Resulting performance score.
    pub score: Percent,

    /// [`ScoreSource`] the `score` was taken from.
    pub source: ScoreSource,
}

impl Performance {
    /// Calculates the [`Performance`] of the provided [`Supplier`].
    ///
    /// On-time deliveries are counted over the provided [`Order`]s claimed by
    /// the [`Supplier`] when any of them is delivered, and taken from the
    /// [`Supplier`] counters otherwise. The score is blended with the
    /// provided [`Weights`] when both quality and cost efficiency ratings
    /// are known, falls back to the score reported by the API, and then to
    /// the on-time delivery percentage alone.
    #[must_use]
    pub fn of<'o>(
        supplier: &Supplier,
        orders: impl IntoIterator<Item = &'o Order>,
        weights: &Weights,
    ) -> Self {
        let counted = OnTimeDelivery::from_orders(
            orders
                .into_iter()
                .filter(|o| o.supplier_id.as_ref() == Some(&supplier.id)),
        );
        let on_time = if counted.is_empty() {
            OnTimeDelivery::from_counters(supplier)
        } else {
            counted
        };

        let (score, source) = match (
            supplier.quality,
            supplier.cost_efficiency,
            supplier.performance_score,
        ) {
            (Some(quality), Some(cost), _) => (
                metrics::performance_score(
                    on_time.percentage(),
                    quality,
                    cost,
                    weights,
                ),
                ScoreSource::Weighted,
            ),
            (_, _, Some(reported)) => (reported, ScoreSource::Reported),
            (_, _, None) => (on_time.percentage(), ScoreSource::OnTimeOnly),
        };

        Self {
            supplier_id: supplier.id.clone(),
            company: supplier.company.clone(),
            on_time,
            quality: supplier.quality,
            cost_efficiency: supplier.cost_efficiency,
            score,
            source,
        }
    }
}
