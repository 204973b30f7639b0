//! Text rendering of tables and KPI cards.

use std::fmt;

use common::{pagination::Page, Percent};
use itertools::Itertools as _;
use rust_decimal::{prelude::ToPrimitive as _, Decimal};
use service::{
    domain::{order::Status, Order},
    query::report::kpi,
};

/// Text table with left-aligned columns.
#[derive(Clone, Debug, Default)]
pub struct Table {
    /// Column names.
    header: Vec<String>,

    /// Rows of cells, one cell per column.
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates a new empty [`Table`] with the provided column names.
    #[must_use]
    pub fn new<I>(header: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row to this [`Table`].
    ///
    /// Missing cells are left blank, extra ones are dropped.
    pub fn row<I>(&mut self, cells: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: ToString,
    {
        let mut row = cells
            .into_iter()
            .take(self.header.len())
            .map(|c| c.to_string())
            .collect::<Vec<_>>();
        row.resize(self.header.len(), String::new());
        self.rows.push(row);
        self
    }

    /// Indicates whether this [`Table`] has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns display widths of the columns.
    fn widths(&self) -> Vec<usize> {
        self.header
            .iter()
            .enumerate()
            .map(|(i, h)| {
                self.rows
                    .iter()
                    .map(|r| r[i].chars().count())
                    .chain([h.chars().count()])
                    .max()
                    .unwrap_or_default()
            })
            .collect()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();
        let line = |cells: &[String]| {
            cells
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!("{c:<w$}"))
                .join("  ")
                .trim_end()
                .to_owned()
        };

        writeln!(f, "{}", line(&self.header))?;
        writeln!(f, "{}", widths.iter().map(|w| "-".repeat(*w)).join("  "))?;
        for row in &self.rows {
            writeln!(f, "{}", line(row))?;
        }
        if self.rows.is_empty() {
            writeln!(f, "(nothing to show)")?;
        }
        Ok(())
    }
}

/// Renders the provided labeled values as KPI cards, one per line.
#[must_use]
pub fn cards(cards: &[(&str, String)]) -> String {
    let width = cards
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or_default();
    cards
        .iter()
        .format_with("", |(label, value), f| {
            f(&format_args!("{label:>width$}: {value}\n"))
        })
        .to_string()
}

/// Renders a progress bar of the provided [`Percent`].
#[must_use]
pub fn progress(percent: Percent) -> String {
    const WIDTH: usize = 10;

    let filled = (percent.value() * Decimal::from(WIDTH) / Decimal::ONE_HUNDRED)
        .round()
        .to_usize()
        .unwrap_or_default()
        .min(WIDTH);
    format!("[{}{}] {percent}", "#".repeat(filled), "-".repeat(WIDTH - filled))
}

/// Renders the provided [`Status`] with its lifecycle progress, if any.
#[must_use]
pub fn status(status: Status) -> String {
    if status.step().is_some() {
        format!("{status} {}", progress(status.progress()))
    } else {
        status.to_string()
    }
}

/// Renders a [`Page`] of [`Order`]s.
#[must_use]
pub fn orders(page: &Page<Order>) -> String {
    let mut table = Table::new([
        "ID", "Date", "Client", "Supplier", "Items", "Total", "Status",
    ]);
    for o in &page.items {
        _ = table.row([
            o.id.to_string(),
            o.ordered_at.to_date_string(),
            o.client_id.to_string(),
            o.supplier_id
                .as_ref()
                .map_or_else(|| "-".to_owned(), ToString::to_string),
            o.items.len().to_string(),
            o.total().to_string(),
            status(o.status),
        ]);
    }
    format!(
        "{table}Page {} of {} ({} orders)\n",
        page.arguments.page(),
        page.total_pages().max(1),
        page.total,
    )
}

/// Renders a single [`Order`] with its history.
#[must_use]
pub fn order(order: &Order) -> String {
    let mut history = Table::new(["Status", "At", "Comment"]);
    for e in order.history.iter() {
        _ = history.row([
            e.status.to_string(),
            e.at.to_rfc3339(),
            e.comment.clone().unwrap_or_default(),
        ]);
    }
    format!(
        "{}{history}",
        cards(&[
            ("Order", order.id.to_string()),
            ("Status", status(order.status)),
            ("Total", order.total().to_string()),
            (
                "Estimated delivery",
                order
                    .estimated_delivery
                    .as_ref()
                    .map_or_else(|| "-".to_owned(), |d| d.to_date_string()),
            ),
        ]),
    )
}

/// Renders the [`kpi::Output`] cards with the status breakdown and the
/// monthly volume.
#[must_use]
pub fn kpi(kpi: &kpi::Output) -> String {
    let mut breakdown = Table::new(["Status", "Orders"]);
    for (status, count) in kpi.breakdown.iter() {
        _ = breakdown.row([status.to_string(), count.to_string()]);
    }

    let mut monthly = Table::new(["Month", "Orders", "Revenue"]);
    for m in kpi.monthly.months() {
        _ = monthly.row([
            m.month.clone(),
            m.orders.to_string(),
            m.revenue.to_string(),
        ]);
    }

    format!(
        "{}\n{breakdown}\n{monthly}",
        cards(&[
            ("Orders", kpi.orders.to_string()),
            ("Pending", kpi.pending.to_string()),
            ("Delivered", kpi.delivered.to_string()),
            ("Cancelled", kpi.cancelled.to_string()),
            ("Revenue", kpi.revenue.to_string()),
            ("Average order", kpi.average_order_value.to_string()),
            ("On time", progress(kpi.on_time.percentage())),
        ]),
    )
}

#[cfg(test)]
mod spec {
    use common::Percent;
    use rust_decimal::Decimal;
    use service::domain::order::Status;

    use super::{cards, progress, status, Table};

    #[test]
    fn aligns_columns() {
        let mut table = Table::new(["ID", "Status"]);
        _ = table.row(["o-1", "Created"]).row(["order-22", "In Transit"]);

        assert_eq!(
            table.to_string(),
            "ID        Status\n\
             --------  ----------\n\
             o-1       Created\n\
             order-22  In Transit\n",
        );
    }

    #[test]
    fn pads_short_rows() {
        let mut table = Table::new(["A", "B"]);
        _ = table.row(["x"]);

        assert_eq!(table.to_string(), "A  B\n-  -\nx\n");
    }

    #[test]
    fn marks_empty_tables() {
        let table = Table::new(["A"]);

        assert!(table.is_empty());
        assert_eq!(table.to_string(), "A\n-\n(nothing to show)\n");
    }

    #[test]
    fn aligns_card_labels() {
        assert_eq!(
            cards(&[("Orders", "3".into()), ("On time", "90%".into())]),
            " Orders: 3\nOn time: 90%\n",
        );
    }

    #[test]
    fn draws_progress() {
        assert_eq!(
            progress(Percent::new(Decimal::from(50)).unwrap()),
            "[#####-----] 50%",
        );
        assert_eq!(status(Status::Cancelled), "Cancelled");
        assert!(status(Status::Received).ends_with("[##########] 100%"));
    }
}
