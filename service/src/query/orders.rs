//! [`Query`] collection related to the multiple [`Order`]s.

use common::{
    operations::{By, Select},
    pagination::{self, Page},
};
use tracerr::Traced;

use crate::{
    domain::Order,
    infra::{api, Api},
    read::order::{list::Filter, sort_recent_first, Scope},
    Service,
};

use super::Query;

/// [`Query`] of a [`Page`] of [`Order`]s, the most recent first.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct List {
    /// [`Scope`] of the [`Order`]s to request from the [`Api`].
    pub scope: Scope,

    /// [`Filter`] to apply to the requested [`Order`]s.
    pub filter: Filter,

    /// [`pagination::Arguments`] of the requested [`Page`].
    pub page: pagination::Arguments,
}

impl<A, S> Query<List> for Service<A, S>
where
    A: Api<Select<By<Vec<Order>, Scope>>, Ok = Vec<Order>, Err = Traced<api::Error>>,
{
    type Ok = Page<Order>;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        List {
            scope,
            filter,
            page,
        }: List,
    ) -> Result<Self::Ok, Self::Err> {
        let mut orders = self
            .api()
            .execute(Select(By::new(scope)))
            .await
            .map_err(tracerr::wrap!())?;
        orders.retain(|o| filter.matches(o));
        sort_recent_first(&mut orders);

        Ok(Page::paginate(orders, page))
    }
}

#[cfg(test)]
mod spec {
    use common::{pagination, DateTime};

    use crate::{
        domain::order::{self, Status},
        infra::api::memory::spec::{api, sign_in},
        query::Query as _,
        read::order::{list::Filter, Scope},
        spec::service,
    };

    use super::List;

    #[tokio::test]
    async fn filters_sorts_and_paginates() {
        let orders = (1..=5)
            .map(|n| {
                let status =
                    if n % 2 == 0 { Status::Shipped } else { Status::Created };
                let mut order = order::spec::order(&format!("o-{n}"), status);
                order.ordered_at =
                    DateTime::parse(&format!("2024-05-0{n}")).unwrap().coerce();
                order
            })
            .collect();
        let api = api(orders);
        sign_in(&api, "admin-1").await;
        let svc = service(api);

        let page = svc
            .execute(List {
                scope: Scope::All,
                filter: Filter {
                    status: Some(Status::Created),
                    ..Filter::default()
                },
                page: pagination::Arguments::new(Some(1), Some(2), 10)
                    .unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages(), 2);
        assert!(page.has_next_page());
        assert_eq!(
            page.items.iter().map(|o| o.id.to_string()).collect::<Vec<_>>(),
            ["o-5", "o-3"],
        );
    }
}
