//! [`SupplierPerformance`] definition.

use common::operations::{By, Select};
use tracerr::Traced;

#[cfg(doc)]
use crate::read::metrics::Weights;
use crate::{
    domain::{Order, Supplier},
    infra::{api, Api},
    read::{order::Scope, supplier::Performance},
    Query, Service,
};

/// [`Query`] of the [`Performance`] of every [`Supplier`], the best first.
///
/// Scores are blended with the configured [`Weights`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SupplierPerformance;

impl<A, S> Query<SupplierPerformance> for Service<A, S>
where
    A: Api<Select<By<Vec<Supplier>, ()>>, Ok = Vec<Supplier>, Err = Traced<api::Error>>
        + Api<Select<By<Vec<Order>, Scope>>, Ok = Vec<Order>, Err = Traced<api::Error>>,
{
    type Ok = Vec<Performance>;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        _: SupplierPerformance,
    ) -> Result<Self::Ok, Self::Err> {
        let (suppliers, orders) = futures::try_join!(
            self.api().execute(Select(By::<Vec<Supplier>, _>::unit())),
            self.api().execute(Select(By::<Vec<Order>, _>::new(Scope::All))),
        )
        .map_err(tracerr::wrap!())?;

        let weights = self.config().weights;
        let mut rows = suppliers
            .iter()
            .map(|s| Performance::of(s, &orders, &weights))
            .collect::<Vec<_>>();
        rows.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.company.cmp(&b.company))
        });

        Ok(rows)
    }
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::order::{self, Status},
        infra::api::{
            self,
            memory::{spec::sign_in, State},
        },
        query::Query as _,
        read::supplier::spec::supplier,
        spec::service,
    };

    use super::SupplierPerformance;

    #[tokio::test]
    async fn ranks_suppliers_by_score() {
        let mut unrated = supplier("sup-2");
        unrated.company = "Bolt".into();
        unrated.quality = None;
        unrated.performance_score = None;
        let mut claimed = order::spec::order("o-1", Status::Delivered);
        claimed.supplier_id = Some("sup-2".into());

        let api = api::Memory::new(State {
            suppliers: vec![supplier("sup-1"), unrated],
            orders: vec![claimed],
            ..api::memory::spec::api(vec![]).snapshot().await
        });
        sign_in(&api, "admin-1").await;

        let rows = service(api).execute(SupplierPerformance).await.unwrap();

        assert_eq!(
            rows.iter().map(|r| r.supplier_id.to_string()).collect::<Vec<_>>(),
            ["sup-2", "sup-1"],
        );
        assert_eq!(rows[0].score.to_string(), "100%");
        assert_eq!(rows[0].on_time.total(), 1);
    }
}
