//! CSV export of report rows.

use std::{io, string::FromUtf8Error};

use derive_more::{Display, Error as StdError, From};
use tracerr::Traced;

use crate::{domain::Order, read::supplier::Performance};

/// Row exportable as a CSV [`Record`].
pub trait Record {
    /// Names of the columns.
    const HEADER: &'static [&'static str];

    /// Formatted fields of this [`Record`], one per [`Record::HEADER`]
    /// column.
    fn fields(&self) -> Vec<String>;
}

/// CSV export error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Failed to write a CSV record.
    #[display("Failed to write CSV: {_0}")]
    Csv(csv::Error),

    /// Failed to flush the written CSV.
    #[display("Failed to flush CSV: {_0}")]
    Io(io::Error),

    /// Written CSV is not valid UTF-8.
    #[display("Written CSV is not UTF-8: {_0}")]
    Utf8(FromUtf8Error),
}

/// CSV writer of [`Record`]s.
#[derive(Clone, Copy, Debug)]
pub struct Csv;

impl Csv {
    /// Writes the header and the provided `rows` into the provided `writer`,
    /// so `N` rows produce `N + 1` lines.
    ///
    /// # Errors
    ///
    /// If writing into the `writer` fails.
    pub fn write<'r, R, W>(
        writer: W,
        rows: impl IntoIterator<Item = &'r R>,
    ) -> Result<W, Traced<Error>>
    where
        R: Record + 'r,
        W: io::Write,
    {
        let mut csv = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);

        csv.write_record(R::HEADER)
            .map_err(tracerr::from_and_wrap!(=> Error))?;
        for row in rows {
            csv.write_record(row.fields())
                .map_err(tracerr::from_and_wrap!(=> Error))?;
        }

        csv.into_inner()
            .map_err(|e| tracerr::new!(Error::Io(e.into_error())))
    }

    /// Writes the header and the provided `rows` into a [`String`].
    ///
    /// # Errors
    ///
    /// If the rows cannot be written.
    pub fn to_string<'r, R>(
        rows: impl IntoIterator<Item = &'r R>,
    ) -> Result<String, Traced<Error>>
    where
        R: Record + 'r,
    {
        let bytes = Self::write(Vec::new(), rows).map_err(tracerr::wrap!())?;
        String::from_utf8(bytes).map_err(tracerr::from_and_wrap!(=> Error))
    }
}

impl Record for Order {
    const HEADER: &'static [&'static str] = &[
        "Order ID",
        "Order Date",
        "Client",
        "Supplier",
        "Status",
        "Items",
        "Total",
        "Currency",
        "Estimated Delivery",
        "On Time",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.ordered_at.to_date_string(),
            self.client_id.to_string(),
            self.supplier_id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            self.status.to_string(),
            self.items.len().to_string(),
            format!("{:.2}", self.total().amount.round_dp(2)),
            self.currency.to_string(),
            self.estimated_delivery
                .map(|d| d.to_date_string())
                .unwrap_or_default(),
            match self.is_delivered_on_time() {
                Some(true) => "Yes",
                Some(false) => "No",
                None => "",
            }
            .to_owned(),
        ]
    }
}

impl Record for Performance {
    const HEADER: &'static [&'static str] = &[
        "Supplier ID",
        "Company",
        "On-Time Deliveries",
        "Late Deliveries",
        "On-Time %",
        "Quality",
        "Cost Efficiency",
        "Score",
        "Score Source",
    ];

    fn fields(&self) -> Vec<String> {
        let rating = |p: Option<common::Percent>| {
            p.map(|p| p.to_string()).unwrap_or_default()
        };
        vec![
            self.supplier_id.to_string(),
            self.company.clone(),
            self.on_time.on_time.to_string(),
            self.on_time.late.to_string(),
            self.on_time.percentage().to_string(),
            rating(self.quality),
            rating(self.cost_efficiency),
            self.score.to_string(),
            self.source.to_string(),
        ]
    }
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::{
            order::{self, Status},
            Order,
        },
        read::{metrics::Weights, supplier},
    };

    use super::{Csv, Record as _};

    #[test]
    fn writes_header_and_one_line_per_row() {
        let mut shipped = order::spec::order("o-2", Status::Shipped);
        shipped.supplier_id = Some("sup-1".into());
        let orders = [order::spec::order("o-1", Status::Delivered), shipped];

        let csv = Csv::to_string(&orders).unwrap();
        let lines = csv.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), orders.len() + 1);
        assert_eq!(lines[0], Order::HEADER.join(","));
        assert_eq!(
            lines[1],
            "o-1,2024-05-01,client-1,,Delivered,2,1300.00,USD,2024-05-10,Yes",
        );
        assert_eq!(
            lines[2],
            "o-2,2024-05-01,client-1,sup-1,Shipped,2,1300.00,USD,2024-05-10,",
        );
    }

    #[test]
    fn quotes_fields_with_separators() {
        let mut perf = supplier::Performance::of(
            &supplier::spec::supplier("sup-1"),
            std::iter::empty(),
            &Weights::default(),
        );
        perf.company = "Acme, Inc.".into();

        let csv = Csv::to_string([&perf]).unwrap();

        assert_eq!(csv.lines().count(), 2);
        assert!(csv.contains("sup-1,\"Acme, Inc.\",9,1,90%,80%,70%,82.0%,weighted"));
    }

    #[test]
    fn writes_header_only_without_rows() {
        let csv = Csv::to_string::<Order>([]).unwrap();

        assert_eq!(csv, format!("{}\n", Order::HEADER.join(",")));
    }
}
